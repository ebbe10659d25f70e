//! Handles to remote NetworkManager objects.
//!
//! A handle is an object path plus the interface it is used through. It
//! holds no remote state: every accessor is a fresh round trip to the
//! daemon. Two handles are equal when their paths are equal.

mod access_point;
mod active_connection;
mod connection;
mod device;

pub use access_point::AccessPoint;
pub use active_connection::ActiveConnection;
pub use connection::Connection;
pub use device::Device;

use zvariant::OwnedObjectPath;

use crate::types::constants::NULL_PATH;

/// Maps NetworkManager's `"/"` placeholder to `None`.
pub(crate) fn non_null(path: OwnedObjectPath) -> Option<OwnedObjectPath> {
    (path.as_str() != NULL_PATH).then_some(path)
}
