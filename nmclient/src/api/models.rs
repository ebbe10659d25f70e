use bitflags::bitflags;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use thiserror::Error;
use zvariant::{OwnedObjectPath, OwnedValue};

use crate::dbus::members::Member;
use crate::types::constants::{
    DEFAULT_NOTIFICATION_CAPACITY, ROOT_PATH, SERVICE, device_type, nm_state, wifi_mode,
};

/// Overall networking state as reported by the NetworkManager daemon.
///
/// Mirrors the daemon's `NMState` codes. Codes this crate does not know
/// (for instance ones added by a newer daemon) decode to
/// [`NmState::Unknown`] instead of failing.
///
/// # Example
///
/// ```rust
/// use nmclient::NmState;
///
/// assert_eq!(NmState::from(70), NmState::ConnectedGlobal);
/// assert_eq!(NmState::from(1234), NmState::Unknown);
/// assert_eq!(NmState::ConnectedGlobal.to_string(), "connected");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NmState {
    /// State is unknown, or the daemon reported a code outside the known set.
    Unknown,
    /// Networking is disabled (system sleeping or networking turned off).
    Asleep,
    /// No active network connection.
    Disconnected,
    /// Network connections are being cleaned up.
    Disconnecting,
    /// A network connection is being started.
    Connecting,
    /// Only local IPv4 and/or IPv6 connectivity.
    ConnectedLocal,
    /// Site-wide connectivity, but no default route to the Internet.
    ConnectedSite,
    /// Global connectivity.
    ConnectedGlobal,
}

impl NmState {
    /// Returns the raw NetworkManager code for this state.
    pub fn to_code(self) -> u32 {
        match self {
            Self::Unknown => nm_state::UNKNOWN,
            Self::Asleep => nm_state::ASLEEP,
            Self::Disconnected => nm_state::DISCONNECTED,
            Self::Disconnecting => nm_state::DISCONNECTING,
            Self::Connecting => nm_state::CONNECTING,
            Self::ConnectedLocal => nm_state::CONNECTED_LOCAL,
            Self::ConnectedSite => nm_state::CONNECTED_SITE,
            Self::ConnectedGlobal => nm_state::CONNECTED_GLOBAL,
        }
    }

    /// Returns `true` for any of the connected states.
    pub fn is_connected(self) -> bool {
        matches!(
            self,
            Self::ConnectedLocal | Self::ConnectedSite | Self::ConnectedGlobal
        )
    }
}

impl From<u32> for NmState {
    fn from(code: u32) -> Self {
        match code {
            nm_state::ASLEEP => Self::Asleep,
            nm_state::DISCONNECTED => Self::Disconnected,
            nm_state::DISCONNECTING => Self::Disconnecting,
            nm_state::CONNECTING => Self::Connecting,
            nm_state::CONNECTED_LOCAL => Self::ConnectedLocal,
            nm_state::CONNECTED_SITE => Self::ConnectedSite,
            nm_state::CONNECTED_GLOBAL => Self::ConnectedGlobal,
            _ => Self::Unknown,
        }
    }
}

impl Display for NmState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Asleep => write!(f, "asleep"),
            Self::Disconnected => write!(f, "disconnected"),
            Self::Disconnecting => write!(f, "disconnecting"),
            Self::Connecting => write!(f, "connecting"),
            Self::ConnectedLocal => write!(f, "connected (local only)"),
            Self::ConnectedSite => write!(f, "connected (site only)"),
            Self::ConnectedGlobal => write!(f, "connected"),
        }
    }
}

/// NetworkManager active connection state.
///
/// These values represent the lifecycle states of an active connection
/// as reported by the NM D-Bus API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveConnectionState {
    /// Connection state is unknown.
    Unknown,
    /// Connection is activating (connecting).
    Activating,
    /// Connection is fully activated (connected).
    Activated,
    /// Connection is deactivating (disconnecting).
    Deactivating,
    /// Connection is fully deactivated (disconnected).
    Deactivated,
    /// Unknown state code not mapped to a specific variant.
    Other(u32),
}

impl From<u32> for ActiveConnectionState {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Activating,
            2 => Self::Activated,
            3 => Self::Deactivating,
            4 => Self::Deactivated,
            v => Self::Other(v),
        }
    }
}

impl Display for ActiveConnectionState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Activating => write!(f, "activating"),
            Self::Activated => write!(f, "activated"),
            Self::Deactivating => write!(f, "deactivating"),
            Self::Deactivated => write!(f, "deactivated"),
            Self::Other(v) => write!(f, "unknown state ({v})"),
        }
    }
}

/// NetworkManager device types.
///
/// Represents the type of network hardware managed by NetworkManager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// Wired Ethernet device.
    Ethernet,
    /// Wi-Fi (802.11) wireless device.
    Wifi,
    /// Bluetooth device.
    Bluetooth,
    /// Generic device (e.g. a virtual interface NM does not model).
    Generic,
    /// WireGuard tunnel device.
    WireGuard,
    /// Wi-Fi P2P (peer-to-peer) device.
    WifiP2P,
    /// Loopback device (localhost).
    Loopback,
    /// Unknown or unsupported device type with raw code.
    Other(u32),
}

impl DeviceType {
    /// Returns the raw NetworkManager type code for this device.
    pub fn to_code(self) -> u32 {
        match self {
            Self::Ethernet => device_type::ETHERNET,
            Self::Wifi => device_type::WIFI,
            Self::Bluetooth => device_type::BLUETOOTH,
            Self::Generic => device_type::GENERIC,
            Self::WireGuard => device_type::WIREGUARD,
            Self::WifiP2P => device_type::WIFI_P2P,
            Self::Loopback => device_type::LOOPBACK,
            Self::Other(code) => code,
        }
    }
}

impl From<u32> for DeviceType {
    fn from(value: u32) -> Self {
        match value {
            device_type::ETHERNET => DeviceType::Ethernet,
            device_type::WIFI => DeviceType::Wifi,
            device_type::BLUETOOTH => DeviceType::Bluetooth,
            device_type::GENERIC => DeviceType::Generic,
            device_type::WIREGUARD => DeviceType::WireGuard,
            device_type::WIFI_P2P => DeviceType::WifiP2P,
            device_type::LOOPBACK => DeviceType::Loopback,
            v => DeviceType::Other(v),
        }
    }
}

impl Display for DeviceType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceType::Ethernet => write!(f, "Ethernet"),
            DeviceType::Wifi => write!(f, "Wi-Fi"),
            DeviceType::Bluetooth => write!(f, "Bluetooth"),
            DeviceType::Generic => write!(f, "Generic"),
            DeviceType::WireGuard => write!(f, "WireGuard"),
            DeviceType::WifiP2P => write!(f, "Wi-Fi P2P"),
            DeviceType::Loopback => write!(f, "Loopback"),
            DeviceType::Other(v) => write!(f, "Other({v})"),
        }
    }
}

/// NetworkManager device states.
///
/// Represents the current operational state of a network device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceState {
    /// Device is not managed by NetworkManager.
    Unmanaged,
    /// Device is managed but not yet available (e.g., Wi-Fi disabled).
    Unavailable,
    /// Device is available but not connected.
    Disconnected,
    /// Device is preparing to connect.
    Prepare,
    /// Device is being configured (IP, etc.).
    Config,
    /// Device is waiting for secrets.
    NeedAuth,
    /// Device is fully connected and operational.
    Activated,
    /// Device is disconnecting.
    Deactivating,
    /// Device connection failed.
    Failed,
    /// Unknown or unsupported state with raw code.
    Other(u32),
}

impl From<u32> for DeviceState {
    fn from(value: u32) -> Self {
        match value {
            10 => DeviceState::Unmanaged,
            20 => DeviceState::Unavailable,
            30 => DeviceState::Disconnected,
            40 => DeviceState::Prepare,
            50 => DeviceState::Config,
            60 => DeviceState::NeedAuth,
            100 => DeviceState::Activated,
            110 => DeviceState::Deactivating,
            120 => DeviceState::Failed,
            v => DeviceState::Other(v),
        }
    }
}

impl Display for DeviceState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceState::Unmanaged => write!(f, "Unmanaged"),
            DeviceState::Unavailable => write!(f, "Unavailable"),
            DeviceState::Disconnected => write!(f, "Disconnected"),
            DeviceState::Prepare => write!(f, "Preparing"),
            DeviceState::Config => write!(f, "Configuring"),
            DeviceState::NeedAuth => write!(f, "Waiting for secrets"),
            DeviceState::Activated => write!(f, "Activated"),
            DeviceState::Deactivating => write!(f, "Deactivating"),
            DeviceState::Failed => write!(f, "Failed"),
            DeviceState::Other(v) => write!(f, "Other({v})"),
        }
    }
}

/// Operating mode of a Wi-Fi access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiMode {
    /// Mode is unknown.
    Unknown,
    /// Ad-hoc (IBSS) network.
    Adhoc,
    /// Infrastructure network (a regular access point).
    Infra,
    /// The device itself acts as an access point.
    Ap,
    /// 802.11s mesh network.
    Mesh,
    /// Unmapped mode code.
    Other(u32),
}

impl From<u32> for WifiMode {
    fn from(code: u32) -> Self {
        match code {
            0 => Self::Unknown,
            wifi_mode::ADHOC => Self::Adhoc,
            wifi_mode::INFRA => Self::Infra,
            wifi_mode::AP => Self::Ap,
            wifi_mode::MESH => Self::Mesh,
            v => Self::Other(v),
        }
    }
}

impl Display for WifiMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Adhoc => write!(f, "Adhoc"),
            Self::Infra => write!(f, "Infra"),
            Self::Ap => write!(f, "AP"),
            Self::Mesh => write!(f, "Mesh"),
            Self::Other(v) => write!(f, "Other({v})"),
        }
    }
}

bitflags! {
    /// General capability flags of an access point (`NM80211ApFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ApFlags: u32 {
        /// Access point supports some form of privacy (WEP or better).
        const PRIVACY = 0x1;
        /// Access point supports WPS.
        const WPS = 0x2;
        /// Access point supports push-button WPS.
        const WPS_PBC = 0x4;
        /// Access point supports PIN-based WPS.
        const WPS_PIN = 0x8;
    }
}

bitflags! {
    /// Security capabilities advertised in an access point's WPA or RSN
    /// information element (`NM80211ApSecurityFlags`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ApSecurityFlags: u32 {
        const PAIR_WEP40 = 0x1;
        const PAIR_WEP104 = 0x2;
        const PAIR_TKIP = 0x4;
        const PAIR_CCMP = 0x8;
        const GROUP_WEP40 = 0x10;
        const GROUP_WEP104 = 0x20;
        const GROUP_TKIP = 0x40;
        const GROUP_CCMP = 0x80;
        /// Pre-shared key authentication (WPA-Personal).
        const KEY_MGMT_PSK = 0x100;
        /// 802.1X authentication (WPA-Enterprise).
        const KEY_MGMT_802_1X = 0x200;
        /// WPA3-Personal (SAE).
        const KEY_MGMT_SAE = 0x400;
        /// Opportunistic wireless encryption.
        const KEY_MGMT_OWE = 0x800;
        const KEY_MGMT_OWE_TM = 0x1000;
        const KEY_MGMT_EAP_SUITE_B_192 = 0x2000;
    }
}

impl ApSecurityFlags {
    /// Returns `true` if a password (PSK or SAE) is enough to join.
    pub fn is_personal(self) -> bool {
        self.intersects(Self::KEY_MGMT_PSK | Self::KEY_MGMT_SAE)
    }

    /// Returns `true` if 802.1X credentials are required.
    pub fn is_enterprise(self) -> bool {
        self.intersects(Self::KEY_MGMT_802_1X | Self::KEY_MGMT_EAP_SUITE_B_192)
    }
}

/// An asynchronous signal delivered by the daemon.
///
/// The payload shape depends on the member: `StateChanged` on a device
/// carries `(new_state, old_state, reason)`, on the root object a single
/// state code, and so on. Consumers decode `args` per member.
#[derive(Debug)]
pub struct Notification {
    /// Object that emitted the signal.
    pub path: OwnedObjectPath,
    /// Interface the signal belongs to.
    pub interface: String,
    /// Signal name.
    pub member: String,
    /// Positional signal arguments.
    pub args: Vec<OwnedValue>,
}

impl Notification {
    /// Returns `true` if this notification is `member` of `interface`.
    pub fn is(&self, member: Member) -> bool {
        self.interface == member.interface && self.member == member.name
    }

    /// Returns the fully-qualified signal name (`interface.member`).
    pub fn qualified_member(&self) -> String {
        format!("{}.{}", self.interface, self.member)
    }
}

/// Point-in-time description of the daemon, for display or logging.
///
/// Serializes as `{"NetworkState": "...", "Devices": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Snapshot {
    /// Human-readable aggregate state (see [`NmState`]'s `Display`).
    pub network_state: String,
    /// Every device, in the order the daemon listed them.
    pub devices: Vec<DeviceSnapshot>,
}

/// Point-in-time description of one device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeviceSnapshot {
    /// D-Bus object path.
    pub path: String,
    /// Interface name (e.g., "wlan0", "eth0").
    pub interface: String,
    /// Human-readable device type.
    pub device_type: String,
    /// Human-readable device state.
    pub state: String,
    /// Kernel driver name.
    pub driver: String,
    /// Hardware (MAC) address.
    pub hw_address: String,
    /// Whether NetworkManager manages this device.
    pub managed: bool,
}

/// Which message bus to connect to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BusKind {
    /// The system bus, where NetworkManager normally lives.
    #[default]
    System,
    /// The current user's session bus.
    Session,
    /// An explicit bus address (e.g. `unix:path=/run/dbus/test_socket`).
    Address(String),
}

impl Display for BusKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Session => write!(f, "session"),
            Self::Address(address) => write!(f, "{address}"),
        }
    }
}

/// Client configuration.
///
/// Defaults address the stock NetworkManager daemon on the system bus:
///
/// - `bus`: [`BusKind::System`]
/// - `service`: `org.freedesktop.NetworkManager`
/// - `root_path`: `/org/freedesktop/NetworkManager`
/// - `notification_capacity`: 10
///
/// # Example
///
/// ```rust
/// use nmclient::{BusKind, ClientConfig};
///
/// let config = ClientConfig::new()
///     .with_bus(BusKind::Session)
///     .with_notification_capacity(32);
///
/// assert_eq!(config.notification_capacity, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Bus to connect to.
    pub bus: BusKind,
    /// Well-known service name of the daemon.
    pub service: String,
    /// Path of the daemon's root object; also the signal namespace.
    pub root_path: OwnedObjectPath,
    /// Buffer size of the notification channel (at least 1).
    pub notification_capacity: usize,
}

impl ClientConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the bus to connect to.
    pub fn with_bus(mut self, bus: BusKind) -> Self {
        self.bus = bus;
        self
    }

    /// Sets the service name calls are addressed to.
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    /// Sets the root object path.
    pub fn with_root_path(mut self, root_path: OwnedObjectPath) -> Self {
        self.root_path = root_path;
        self
    }

    /// Sets the notification buffer size. Zero is raised to one.
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity.max(1);
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            bus: BusKind::System,
            service: SERVICE.to_string(),
            root_path: OwnedObjectPath::from(zvariant::ObjectPath::from_static_str_unchecked(
                ROOT_PATH,
            )),
            notification_capacity: DEFAULT_NOTIFICATION_CAPACITY,
        }
    }
}

/// A D-Bus error returned by the daemon.
///
/// Keeps the error name (e.g.
/// `org.freedesktop.NetworkManager.PermissionDenied`) alongside the
/// human-readable message, so callers can match on the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFault {
    /// D-Bus error name.
    pub name: String,
    /// Message supplied by the daemon, if any.
    pub message: Option<String>,
}

impl RemoteFault {
    /// Creates a fault with a name and message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: Some(message.into()),
        }
    }
}

impl Display for RemoteFault {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Errors that can occur while talking to NetworkManager.
///
/// # Example
///
/// ```no_run
/// use nmclient::{BusError, NetworkManager};
///
/// # async fn example() -> nmclient::Result<()> {
/// let nm = NetworkManager::new().await?;
///
/// match nm.state().await {
///     Ok(state) => println!("NetworkManager is {state}"),
///     Err(BusError::Transport(e)) => eprintln!("bus unreachable: {e}"),
///     Err(BusError::Remote(fault)) => eprintln!("daemon refused: {}", fault.name),
///     Err(e) => eprintln!("Error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Error)]
pub enum BusError {
    /// The bus could not be reached, or the connection failed mid-call.
    #[error("D-Bus transport error: {0}")]
    Transport(zbus::Error),

    /// The daemon rejected the call.
    #[error("NetworkManager returned an error: {0}")]
    Remote(RemoteFault),

    /// The reply did not have the expected shape.
    #[error("unexpected reply from {member}: {reason}")]
    Decode {
        /// Qualified member whose reply failed to decode.
        member: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Arguments could not be marshalled.
    #[error("failed to encode call: {0}")]
    Encode(String),
}

impl BusError {
    pub(crate) fn decode(member: Member, reason: impl Display) -> Self {
        Self::Decode {
            member: member.qualified(),
            reason: reason.to_string(),
        }
    }

    /// Returns the remote fault, if the daemon rejected the call.
    pub fn remote_fault(&self) -> Option<&RemoteFault> {
        match self {
            Self::Remote(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<zbus::Error> for BusError {
    fn from(err: zbus::Error) -> Self {
        use zbus::DBusError;

        match err {
            zbus::Error::MethodError(name, message, _) => Self::Remote(RemoteFault {
                name: name.to_string(),
                message,
            }),
            zbus::Error::FDO(fdo) => match *fdo {
                zbus::fdo::Error::ZBus(inner) => inner.into(),
                other => Self::Remote(RemoteFault {
                    name: other.name().to_string(),
                    message: other.description().map(str::to_owned),
                }),
            },
            zbus::Error::Variant(e) => Self::Decode {
                member: "reply".into(),
                reason: e.to_string(),
            },
            other => Self::Transport(other),
        }
    }
}
