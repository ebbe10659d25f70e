//! Shared plumbing behind every handle type.

use log::debug;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use zvariant::{OwnedObjectPath, OwnedValue, Value};

use crate::Result;
use crate::dbus::decode;
use crate::dbus::members::Member;
use crate::dbus::transport::Transport;

/// A remote object: its path, the interface it is primarily used through,
/// and the transport that reaches it.
///
/// Identity is the path alone.
#[derive(Clone)]
pub(crate) struct RemoteObject {
    transport: Arc<dyn Transport>,
    path: OwnedObjectPath,
    interface: &'static str,
}

impl RemoteObject {
    pub(crate) fn new(
        transport: Arc<dyn Transport>,
        path: OwnedObjectPath,
        interface: &'static str,
    ) -> Self {
        Self {
            transport,
            path,
            interface,
        }
    }

    pub(crate) fn path(&self) -> &OwnedObjectPath {
        &self.path
    }

    pub(crate) fn interface(&self) -> &'static str {
        self.interface
    }

    pub(crate) fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub(crate) async fn call(
        &self,
        method: Member,
        args: Vec<Value<'static>>,
    ) -> Result<Vec<OwnedValue>> {
        debug!("Calling {method} on {}", self.path.as_str());
        self.transport.call(&self.path, method, args).await
    }

    pub(crate) async fn property<T>(&self, property: Member) -> Result<T>
    where
        T: TryFrom<OwnedValue>,
        T::Error: Display,
    {
        let raw = self.transport.get_property(&self.path, property).await?;
        decode::property(raw, property)
    }

    pub(crate) async fn set_property(&self, property: Member, value: Value<'static>) -> Result<()> {
        debug!("Setting {property} on {}", self.path.as_str());
        self.transport.set_property(&self.path, property, value).await
    }

    /// Wraps another object reachable through the same transport.
    pub(crate) fn sibling(&self, path: OwnedObjectPath, interface: &'static str) -> Self {
        Self::new(Arc::clone(&self.transport), path, interface)
    }
}

impl Debug for RemoteObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteObject")
            .field("path", &self.path.as_str())
            .field("interface", &self.interface)
            .finish()
    }
}

impl PartialEq for RemoteObject {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for RemoteObject {}

impl Hash for RemoteObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path.hash(state);
    }
}
