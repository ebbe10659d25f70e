use zvariant::OwnedObjectPath;

use super::{Connection, Device, non_null};
use crate::Result;
use crate::api::models::ActiveConnectionState;
use crate::dbus::members::active_connection;
use crate::dbus::RemoteObject;
use crate::types::constants::interface;

/// A connection profile applied to a device
/// (`org.freedesktop.NetworkManager.Connection.Active`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActiveConnection {
    object: RemoteObject,
}

impl ActiveConnection {
    pub(crate) fn new(object: RemoteObject) -> Self {
        Self { object }
    }

    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Id of the underlying profile.
    pub async fn id(&self) -> Result<String> {
        self.object.property(active_connection::ID).await
    }

    /// UUID of the underlying profile.
    pub async fn uuid(&self) -> Result<String> {
        self.object.property(active_connection::UUID).await
    }

    pub async fn state(&self) -> Result<ActiveConnectionState> {
        let raw: u32 = self.object.property(active_connection::STATE).await?;
        Ok(raw.into())
    }

    /// The settings profile this activation was made from.
    pub async fn connection(&self) -> Result<Connection> {
        let path: OwnedObjectPath = self.object.property(active_connection::CONNECTION).await?;
        Ok(Connection::new(
            self.object.sibling(path, interface::SETTINGS_CONNECTION),
        ))
    }

    /// Object the activation is bound to (the access point for Wi-Fi), if any.
    pub async fn specific_object(&self) -> Result<Option<OwnedObjectPath>> {
        let path: OwnedObjectPath = self
            .object
            .property(active_connection::SPECIFIC_OBJECT)
            .await?;
        Ok(non_null(path))
    }

    /// Devices this connection is active on.
    pub async fn devices(&self) -> Result<Vec<Device>> {
        let paths: Vec<OwnedObjectPath> = self.object.property(active_connection::DEVICES).await?;
        let mut devices = Vec::with_capacity(paths.len());
        for path in paths {
            devices.push(Device::wrap(self.object.transport().clone(), path).await?);
        }
        Ok(devices)
    }
}
