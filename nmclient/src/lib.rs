//! A thin, typed async client for NetworkManager's D-Bus interface.
//!
//! NetworkManager owns all networking state and policy. This crate only
//! carries calls, property reads and signals across the bus, and gives the
//! results Rust types:
//!
//! - Listing devices, access points and active connections
//! - Reading the aggregate networking state
//! - Activating saved connections, or adding and activating new profiles
//! - Subscribing to the daemon's signals
//! - Capturing a serializable snapshot of the daemon
//!
//! # Example
//!
//! ```no_run
//! use nmclient::NetworkManager;
//!
//! # async fn example() -> nmclient::Result<()> {
//! let nm = NetworkManager::new().await?;
//!
//! println!("NetworkManager is {}", nm.state().await?);
//! for device in nm.list_devices().await? {
//!     println!("{} ({})", device.interface().await?, device.device_type());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, BusError>`. The error separates bus
//! failures ([`BusError::Transport`]) from errors the daemon replied with
//! ([`BusError::Remote`]) and from replies of an unexpected shape
//! ([`BusError::Decode`]). Nothing is retried.
//!
//! # Testing
//!
//! Every remote interaction goes through the [`Transport`] trait. Pass your
//! own implementation to [`NetworkManager::with_transport`] to run against
//! scripted replies instead of a live daemon.
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod core;
mod types;

// Public API modules
pub mod api;
pub mod dbus;

// Re-exported public API
pub use api::builders;
pub use api::models::{
    ActiveConnectionState, ApFlags, ApSecurityFlags, BusError, BusKind, ClientConfig,
    DeviceSnapshot, DeviceState, DeviceType, Notification, NmState, RemoteFault, Snapshot,
    WifiMode,
};
pub use api::network_manager::NetworkManager;
pub use api::objects::{AccessPoint, ActiveConnection, Connection, Device};
pub use crate::core::subscription::Notifications;
pub use dbus::{Member, SignalFeed, Transport, ZbusTransport};
pub use types::constants::{ROOT_PATH, SERVICE};

/// A specialized `Result` type for NetworkManager operations.
pub type Result<T> = std::result::Result<T, BusError>;
