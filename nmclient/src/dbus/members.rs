//! Remote members (methods and properties) consumed by this crate.
//!
//! A [`Member`] pairs an interface name with a member name. Its qualified
//! form, `interface.name`, is the identifier NetworkManager documents for
//! each method and property, e.g. `org.freedesktop.NetworkManager.GetDevices`.

use std::fmt::{Display, Formatter};

use crate::types::constants::interface;

/// A method or property on a D-Bus interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Member {
    /// Interface that declares the member.
    pub interface: &'static str,
    /// Member name within the interface.
    pub name: &'static str,
}

impl Member {
    /// Creates a member reference.
    pub const fn new(interface: &'static str, name: &'static str) -> Self {
        Self { interface, name }
    }

    /// Returns the fully-qualified identifier (`interface.name`).
    pub fn qualified(&self) -> String {
        format!("{}.{}", self.interface, self.name)
    }
}

impl Display for Member {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.interface, self.name)
    }
}

/// Members of the root `org.freedesktop.NetworkManager` object.
pub mod network_manager {
    use super::{Member, interface::NETWORK_MANAGER};

    /// `GetDevices() -> ao`
    pub const GET_DEVICES: Member = Member::new(NETWORK_MANAGER, "GetDevices");
    /// `ActivateConnection(o connection, o device, o specific_object) -> o`
    pub const ACTIVATE_CONNECTION: Member = Member::new(NETWORK_MANAGER, "ActivateConnection");
    /// `AddAndActivateConnection(a{sa{sv}} connection, o device, o specific_object) -> (o, o)`
    pub const ADD_AND_ACTIVATE_CONNECTION: Member =
        Member::new(NETWORK_MANAGER, "AddAndActivateConnection");
    /// `DeactivateConnection(o active_connection)`
    pub const DEACTIVATE_CONNECTION: Member =
        Member::new(NETWORK_MANAGER, "DeactivateConnection");

    /// Aggregate networking state (`u`, see `NmState`).
    pub const STATE: Member = Member::new(NETWORK_MANAGER, "State");
    /// Paths of all active connections (`ao`).
    pub const ACTIVE_CONNECTIONS: Member = Member::new(NETWORK_MANAGER, "ActiveConnections");
    /// Global Wi-Fi switch (`b`, read/write).
    pub const WIRELESS_ENABLED: Member = Member::new(NETWORK_MANAGER, "WirelessEnabled");

    /// Signal: `StateChanged(u state)`
    pub const STATE_CHANGED: Member = Member::new(NETWORK_MANAGER, "StateChanged");
    /// Signal: `DeviceAdded(o device_path)`
    pub const DEVICE_ADDED: Member = Member::new(NETWORK_MANAGER, "DeviceAdded");
    /// Signal: `DeviceRemoved(o device_path)`
    pub const DEVICE_REMOVED: Member = Member::new(NETWORK_MANAGER, "DeviceRemoved");
}

/// Members of `org.freedesktop.NetworkManager.Device`.
pub mod device {
    use super::{Member, interface::DEVICE};

    pub const DEVICE_TYPE: Member = Member::new(DEVICE, "DeviceType");
    pub const INTERFACE: Member = Member::new(DEVICE, "Interface");
    pub const STATE: Member = Member::new(DEVICE, "State");
    pub const DRIVER: Member = Member::new(DEVICE, "Driver");
    pub const MANAGED: Member = Member::new(DEVICE, "Managed");
    pub const HW_ADDRESS: Member = Member::new(DEVICE, "HwAddress");
    pub const ACTIVE_CONNECTION: Member = Member::new(DEVICE, "ActiveConnection");

    /// Signal: `StateChanged(u new_state, u old_state, u reason)`
    pub const STATE_CHANGED: Member = Member::new(DEVICE, "StateChanged");
}

/// Members of `org.freedesktop.NetworkManager.Device.Wireless`.
pub mod wireless {
    use super::{Member, interface::WIRELESS};

    /// `GetAllAccessPoints() -> ao`
    pub const GET_ALL_ACCESS_POINTS: Member = Member::new(WIRELESS, "GetAllAccessPoints");
    /// `RequestScan(a{sv} options)`
    pub const REQUEST_SCAN: Member = Member::new(WIRELESS, "RequestScan");
    pub const ACTIVE_ACCESS_POINT: Member = Member::new(WIRELESS, "ActiveAccessPoint");
}

/// Members of `org.freedesktop.NetworkManager.AccessPoint`.
pub mod access_point {
    use super::{Member, interface::ACCESS_POINT};

    pub const SSID: Member = Member::new(ACCESS_POINT, "Ssid");
    pub const STRENGTH: Member = Member::new(ACCESS_POINT, "Strength");
    pub const HW_ADDRESS: Member = Member::new(ACCESS_POINT, "HwAddress");
    pub const FREQUENCY: Member = Member::new(ACCESS_POINT, "Frequency");
    pub const MAX_BITRATE: Member = Member::new(ACCESS_POINT, "MaxBitrate");
    pub const MODE: Member = Member::new(ACCESS_POINT, "Mode");
    pub const FLAGS: Member = Member::new(ACCESS_POINT, "Flags");
    pub const WPA_FLAGS: Member = Member::new(ACCESS_POINT, "WpaFlags");
    pub const RSN_FLAGS: Member = Member::new(ACCESS_POINT, "RsnFlags");
}

/// Members of `org.freedesktop.NetworkManager.Connection.Active`.
pub mod active_connection {
    use super::{Member, interface::ACTIVE_CONNECTION};

    pub const ID: Member = Member::new(ACTIVE_CONNECTION, "Id");
    pub const UUID: Member = Member::new(ACTIVE_CONNECTION, "Uuid");
    pub const STATE: Member = Member::new(ACTIVE_CONNECTION, "State");
    pub const CONNECTION: Member = Member::new(ACTIVE_CONNECTION, "Connection");
    pub const SPECIFIC_OBJECT: Member = Member::new(ACTIVE_CONNECTION, "SpecificObject");
    pub const DEVICES: Member = Member::new(ACTIVE_CONNECTION, "Devices");
}

/// Members of `org.freedesktop.NetworkManager.Settings.Connection`.
pub mod settings_connection {
    use super::{Member, interface::SETTINGS_CONNECTION};

    /// `GetSettings() -> a{sa{sv}}`
    pub const GET_SETTINGS: Member = Member::new(SETTINGS_CONNECTION, "GetSettings");
    /// `Delete()`
    pub const DELETE: Member = Member::new(SETTINGS_CONNECTION, "Delete");
}
