use log::debug;
use std::collections::HashMap;
use zvariant::{OwnedObjectPath, OwnedValue};

use crate::Result;
use crate::api::builders::Profile;
use crate::dbus::members::settings_connection;
use crate::dbus::{RemoteObject, decode};

/// A saved connection profile
/// (`org.freedesktop.NetworkManager.Settings.Connection`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    object: RemoteObject,
}

impl Connection {
    pub(crate) fn new(object: RemoteObject) -> Self {
        Self { object }
    }

    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Returns the profile's settings. Secrets are not included.
    pub async fn settings(&self) -> Result<Profile> {
        let method = settings_connection::GET_SETTINGS;
        let reply = self.object.call(method, Vec::new()).await?;
        let settings: HashMap<String, HashMap<String, OwnedValue>> =
            decode::single(reply, method)?;
        Ok(Profile::from_settings(settings))
    }

    /// Deletes the profile from the daemon.
    pub async fn delete(&self) -> Result<()> {
        let method = settings_connection::DELETE;
        let reply = self.object.call(method, Vec::new()).await?;
        decode::empty(reply, method)?;
        debug!("Deleted connection {}", self.path().as_str());
        Ok(())
    }
}
