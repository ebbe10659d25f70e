//! D-Bus plumbing for NetworkManager.
//!
//! This module contains the transport seam, its zbus implementation, the
//! member table and the reply decoders shared by all handles.

pub(crate) mod decode;
pub mod members;
pub(crate) mod object;
mod transport;
mod zbus_transport;

pub use members::Member;
pub(crate) use object::RemoteObject;
pub use transport::{SignalFeed, Transport};
pub use zbus_transport::ZbusTransport;
