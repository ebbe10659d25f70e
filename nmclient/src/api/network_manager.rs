use log::debug;
use std::sync::Arc;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue, Value};

use crate::Result;
use crate::api::builders::Profile;
use crate::api::models::{ClientConfig, NmState, Snapshot};
use crate::api::objects::{AccessPoint, ActiveConnection, Connection, Device};
use crate::core::subscription::{Notifications, SubscriptionSlot};
use crate::dbus::members::{Member, network_manager};
use crate::dbus::{RemoteObject, Transport, ZbusTransport, decode};
use crate::types::constants::{NULL_PATH, interface};

/// Typed client for the NetworkManager daemon.
///
/// This is the main entry point of the crate. It addresses the daemon's root
/// object and hands out handles ([`Device`], [`ActiveConnection`], ...) for
/// the objects the daemon returns. Nothing is cached: every call is one or
/// more round trips to the daemon, and the call completes when the daemon
/// replies.
///
/// # Creating an Instance
///
/// ```no_run
/// use nmclient::NetworkManager;
///
/// # async fn example() -> nmclient::Result<()> {
/// let nm = NetworkManager::new().await?;
/// println!("NetworkManager is {}", nm.state().await?);
/// # Ok(())
/// # }
/// ```
///
/// # Listing Devices
///
/// ```no_run
/// use nmclient::NetworkManager;
///
/// # async fn example() -> nmclient::Result<()> {
/// let nm = NetworkManager::new().await?;
///
/// for device in nm.list_devices().await? {
///     println!("{}: {}", device.interface().await?, device.device_type());
/// }
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `NetworkManager` is `Clone` and can be safely shared across async tasks.
/// Clones share the transport and the notification subscription.
#[derive(Debug, Clone)]
pub struct NetworkManager {
    root: RemoteObject,
    config: ClientConfig,
    subscription: Arc<SubscriptionSlot>,
}

impl NetworkManager {
    /// Creates a new `NetworkManager` connected to the system D-Bus.
    pub async fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default()).await
    }

    /// Creates a new `NetworkManager` with custom configuration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nmclient::{BusKind, ClientConfig, NetworkManager};
    ///
    /// # async fn example() -> nmclient::Result<()> {
    /// let config = ClientConfig::new().with_bus(BusKind::Session);
    /// let nm = NetworkManager::with_config(config).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_config(config: ClientConfig) -> Result<Self> {
        let transport = ZbusTransport::connect(&config.bus, config.service.clone()).await?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }

    /// Creates a `NetworkManager` over an existing transport.
    ///
    /// `config.bus` and `config.service` are not consulted; the transport
    /// already decides where calls go.
    pub fn with_transport(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        let root = RemoteObject::new(
            transport,
            config.root_path.clone(),
            interface::NETWORK_MANAGER,
        );
        Self {
            root,
            config,
            subscription: Arc::new(SubscriptionSlot::new()),
        }
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Path of the root object.
    pub fn path(&self) -> &OwnedObjectPath {
        self.root.path()
    }

    /// Invokes `method` on the root object and returns the raw reply fields.
    ///
    /// Use this for methods this crate has no typed wrapper for.
    pub async fn invoke(&self, method: Member, args: Vec<Value<'static>>) -> Result<Vec<OwnedValue>> {
        self.root.call(method, args).await
    }

    /// Reads a property of the root object.
    pub async fn get_property(&self, property: Member) -> Result<OwnedValue> {
        self.root
            .transport()
            .get_property(self.root.path(), property)
            .await
    }

    /// Writes a property of the root object.
    pub async fn set_property(&self, property: Member, value: Value<'static>) -> Result<()> {
        self.root.set_property(property, value).await
    }

    /// Wraps a device path. Reads the device's type.
    pub async fn device(&self, path: OwnedObjectPath) -> Result<Device> {
        Device::wrap(self.root.transport().clone(), path).await
    }

    /// Wraps an access point path.
    pub fn access_point(&self, path: OwnedObjectPath) -> AccessPoint {
        AccessPoint::new(self.root.sibling(path, interface::ACCESS_POINT))
    }

    /// Wraps a settings connection path.
    pub fn connection(&self, path: OwnedObjectPath) -> Connection {
        Connection::new(self.root.sibling(path, interface::SETTINGS_CONNECTION))
    }

    /// Wraps an active connection path.
    pub fn active_connection(&self, path: OwnedObjectPath) -> ActiveConnection {
        ActiveConnection::new(self.root.sibling(path, interface::ACTIVE_CONNECTION))
    }

    /// Lists all network devices, in the order the daemon reports them.
    ///
    /// Fails as a whole if any device cannot be wrapped.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let method = network_manager::GET_DEVICES;
        let reply = self.root.call(method, Vec::new()).await?;
        let paths: Vec<OwnedObjectPath> = decode::single(reply, method)?;

        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            devices.push(self.device(path).await?);
        }
        debug!("Listed {} devices", devices.len());
        Ok(devices)
    }

    /// Returns the aggregate networking state.
    pub async fn state(&self) -> Result<NmState> {
        let raw: u32 = self.root.property(network_manager::STATE).await?;
        Ok(NmState::from(raw))
    }

    /// Lists the active connections.
    pub async fn active_connections(&self) -> Result<Vec<ActiveConnection>> {
        let paths: Vec<OwnedObjectPath> = self
            .root
            .property(network_manager::ACTIVE_CONNECTIONS)
            .await?;
        Ok(paths
            .into_iter()
            .map(|path| self.active_connection(path))
            .collect())
    }

    /// Activates a saved connection on `device`.
    ///
    /// `access_point` selects the network for Wi-Fi devices; pass `None` to
    /// let the daemon pick.
    pub async fn activate_connection(
        &self,
        connection: &Connection,
        device: &Device,
        access_point: Option<&AccessPoint>,
    ) -> Result<ActiveConnection> {
        let method = network_manager::ACTIVATE_CONNECTION;
        let args = vec![
            object_arg(connection.path()),
            object_arg(device.path()),
            specific_object_arg(access_point),
        ];
        let reply = self.root.call(method, args).await?;
        let active: OwnedObjectPath = decode::single(reply, method)?;
        debug!("Activated {} as {}", connection.path().as_str(), active.as_str());
        Ok(self.active_connection(active))
    }

    /// Adds `profile` as a new connection and activates it on `device`.
    ///
    /// Returns the resulting active connection. The path of the newly saved
    /// profile is available through [`ActiveConnection::connection`].
    pub async fn add_and_activate_connection(
        &self,
        profile: Profile,
        device: &Device,
        access_point: Option<&AccessPoint>,
    ) -> Result<ActiveConnection> {
        let method = network_manager::ADD_AND_ACTIVATE_CONNECTION;
        let args = vec![
            profile.into_value(),
            object_arg(device.path()),
            specific_object_arg(access_point),
        ];
        let reply = self.root.call(method, args).await?;
        let (settings, active): (OwnedObjectPath, OwnedObjectPath) = decode::pair(reply, method)?;
        debug!(
            "Added connection {} and activated it as {}",
            settings.as_str(),
            active.as_str()
        );
        Ok(self.active_connection(active))
    }

    /// Deactivates an active connection.
    pub async fn deactivate_connection(&self, active: &ActiveConnection) -> Result<()> {
        let method = network_manager::DEACTIVATE_CONNECTION;
        let reply = self.root.call(method, vec![object_arg(active.path())]).await?;
        decode::empty(reply, method)
    }

    /// Returns whether Wi-Fi is enabled.
    pub async fn wireless_enabled(&self) -> Result<bool> {
        self.root.property(network_manager::WIRELESS_ENABLED).await
    }

    /// Enables or disables Wi-Fi.
    pub async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        self.root
            .set_property(network_manager::WIRELESS_ENABLED, Value::from(enabled))
            .await
    }

    /// Subscribes to every signal emitted under the root path.
    ///
    /// While a subscription is live, further calls return a handle to the
    /// same registration.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use nmclient::NetworkManager;
    ///
    /// # async fn example() -> nmclient::Result<()> {
    /// let nm = NetworkManager::new().await?;
    /// let notifications = nm.subscribe().await?;
    ///
    /// while let Some(n) = notifications.recv().await {
    ///     println!("{} from {}", n.qualified_member(), n.path.as_str());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn subscribe(&self) -> Result<Notifications> {
        self.subscription
            .subscribe(
                self.root.transport().as_ref(),
                self.root.path(),
                self.config.notification_capacity,
            )
            .await
    }

    /// Cancels the subscription and ends its notification stream.
    ///
    /// Does nothing if not subscribed.
    pub async fn unsubscribe(&self) {
        self.subscription.unsubscribe().await;
    }

    /// Returns `true` while a subscription is live.
    pub async fn is_subscribed(&self) -> bool {
        self.subscription.is_subscribed().await
    }

    /// Captures the networking state and every device.
    ///
    /// Fails on the first failing read; no partial snapshot is returned.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        let state = self.state().await?;
        let devices = self.list_devices().await?;

        let mut snapshots = Vec::with_capacity(devices.len());
        for device in &devices {
            snapshots.push(device.snapshot().await?);
        }

        Ok(Snapshot {
            network_state: state.to_string(),
            devices: snapshots,
        })
    }
}

fn object_arg(path: &OwnedObjectPath) -> Value<'static> {
    Value::ObjectPath(path.clone().into_inner())
}

fn specific_object_arg(access_point: Option<&AccessPoint>) -> Value<'static> {
    match access_point {
        Some(ap) => object_arg(ap.path()),
        None => Value::ObjectPath(ObjectPath::from_static_str_unchecked(NULL_PATH)),
    }
}
