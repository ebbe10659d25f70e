use log::debug;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use zvariant::{OwnedObjectPath, Value};

use super::{AccessPoint, ActiveConnection, non_null};
use crate::Result;
use crate::api::models::{DeviceSnapshot, DeviceState, DeviceType};
use crate::dbus::members::{device, wireless};
use crate::dbus::{RemoteObject, Transport, decode};
use crate::types::constants::interface;

/// A network device (`org.freedesktop.NetworkManager.Device`).
///
/// Wrapping a path reads the device's type once, so that wireless and wired
/// devices are addressed through their type-specific interface. Everything
/// else is read on demand.
#[derive(Debug, Clone)]
pub struct Device {
    object: RemoteObject,
    device_type: DeviceType,
}

impl Device {
    pub(crate) async fn wrap(
        transport: Arc<dyn Transport>,
        path: OwnedObjectPath,
    ) -> Result<Self> {
        let generic = RemoteObject::new(transport, path, interface::DEVICE);
        let raw: u32 = generic.property(device::DEVICE_TYPE).await?;
        let device_type = DeviceType::from(raw);

        let iface = match device_type {
            DeviceType::Wifi => interface::WIRELESS,
            DeviceType::Ethernet => interface::WIRED,
            _ => interface::DEVICE,
        };
        debug!("Wrapped {} device at {}", device_type, generic.path().as_str());

        Ok(Self {
            object: generic.sibling(generic.path().clone(), iface),
            device_type,
        })
    }

    /// Object path of the device.
    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// The D-Bus interface this handle addresses.
    pub fn dbus_interface(&self) -> &'static str {
        self.object.interface()
    }

    /// Device type, as read when the handle was created.
    pub fn device_type(&self) -> DeviceType {
        self.device_type
    }

    pub fn is_wireless(&self) -> bool {
        self.device_type == DeviceType::Wifi
    }

    /// Kernel interface name (e.g. "wlan0").
    pub async fn interface(&self) -> Result<String> {
        self.object.property(device::INTERFACE).await
    }

    /// Kernel driver name.
    pub async fn driver(&self) -> Result<String> {
        self.object.property(device::DRIVER).await
    }

    pub async fn state(&self) -> Result<DeviceState> {
        let raw: u32 = self.object.property(device::STATE).await?;
        Ok(raw.into())
    }

    /// Whether NetworkManager manages this device.
    pub async fn managed(&self) -> Result<bool> {
        self.object.property(device::MANAGED).await
    }

    /// Current hardware (MAC) address.
    pub async fn hw_address(&self) -> Result<String> {
        self.object.property(device::HW_ADDRESS).await
    }

    /// The active connection on this device, if any.
    pub async fn active_connection(&self) -> Result<Option<ActiveConnection>> {
        let path: OwnedObjectPath = self.object.property(device::ACTIVE_CONNECTION).await?;
        Ok(non_null(path).map(|p| {
            ActiveConnection::new(self.object.sibling(p, interface::ACTIVE_CONNECTION))
        }))
    }

    /// All access points the device currently sees, hidden ones included.
    ///
    /// Only wireless devices implement this; others fail with the daemon's
    /// error.
    pub async fn access_points(&self) -> Result<Vec<AccessPoint>> {
        let method = wireless::GET_ALL_ACCESS_POINTS;
        let reply = self.object.call(method, Vec::new()).await?;
        let paths: Vec<OwnedObjectPath> = decode::single(reply, method)?;
        Ok(paths
            .into_iter()
            .map(|p| AccessPoint::new(self.object.sibling(p, interface::ACCESS_POINT)))
            .collect())
    }

    /// The access point the device is associated with, if any.
    pub async fn active_access_point(&self) -> Result<Option<AccessPoint>> {
        let path: OwnedObjectPath = self.object.property(wireless::ACTIVE_ACCESS_POINT).await?;
        Ok(non_null(path)
            .map(|p| AccessPoint::new(self.object.sibling(p, interface::ACCESS_POINT))))
    }

    /// Asks the device to scan for access points.
    ///
    /// Returns once the daemon accepted the request, not when the scan
    /// finished.
    pub async fn request_scan(&self) -> Result<()> {
        let method = wireless::REQUEST_SCAN;
        let options: HashMap<String, Value<'static>> = HashMap::new();
        let reply = self.object.call(method, vec![Value::from(options)]).await?;
        decode::empty(reply, method)
    }

    /// Reads the device's properties into a [`DeviceSnapshot`].
    pub async fn snapshot(&self) -> Result<DeviceSnapshot> {
        Ok(DeviceSnapshot {
            path: self.path().to_string(),
            interface: self.interface().await?,
            device_type: self.device_type.to_string(),
            state: self.state().await?.to_string(),
            driver: self.driver().await?,
            hw_address: self.hw_address().await?,
            managed: self.managed().await?,
        })
    }
}

impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        self.object == other.object
    }
}

impl Eq for Device {}

impl Hash for Device {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.object.hash(state);
    }
}
