//! Constants for NetworkManager D-Bus interface values.
//!
//! These constants correspond to the names and numeric codes used by
//! NetworkManager's D-Bus API: the well-known service, object paths,
//! interface names, and the raw codes behind the typed enums in
//! [`crate::api::models`].

/// Well-known bus name of the NetworkManager daemon.
pub const SERVICE: &str = "org.freedesktop.NetworkManager";

/// Object path of the root NetworkManager object.
pub const ROOT_PATH: &str = "/org/freedesktop/NetworkManager";

/// Path NetworkManager uses for "no object".
pub const NULL_PATH: &str = "/";

/// Buffer size of the notification channel unless configured otherwise.
pub const DEFAULT_NOTIFICATION_CAPACITY: usize = 10;

/// D-Bus interface names.
pub mod interface {
    pub const NETWORK_MANAGER: &str = "org.freedesktop.NetworkManager";
    pub const DEVICE: &str = "org.freedesktop.NetworkManager.Device";
    pub const WIRELESS: &str = "org.freedesktop.NetworkManager.Device.Wireless";
    pub const WIRED: &str = "org.freedesktop.NetworkManager.Device.Wired";
    pub const ACCESS_POINT: &str = "org.freedesktop.NetworkManager.AccessPoint";
    pub const ACTIVE_CONNECTION: &str = "org.freedesktop.NetworkManager.Connection.Active";
    pub const SETTINGS_CONNECTION: &str = "org.freedesktop.NetworkManager.Settings.Connection";
    pub const PROPERTIES: &str = "org.freedesktop.DBus.Properties";
}

/// NetworkManager aggregate state codes (`NMState`).
pub mod nm_state {
    pub const UNKNOWN: u32 = 0;
    pub const ASLEEP: u32 = 10;
    pub const DISCONNECTED: u32 = 20;
    pub const DISCONNECTING: u32 = 30;
    pub const CONNECTING: u32 = 40;
    pub const CONNECTED_LOCAL: u32 = 50;
    pub const CONNECTED_SITE: u32 = 60;
    pub const CONNECTED_GLOBAL: u32 = 70;
}

/// NetworkManager device type constants.
pub mod device_type {
    pub const ETHERNET: u32 = 1;
    pub const WIFI: u32 = 2;
    pub const BLUETOOTH: u32 = 5;
    pub const GENERIC: u32 = 14;
    pub const WIREGUARD: u32 = 29;
    pub const WIFI_P2P: u32 = 30;
    pub const LOOPBACK: u32 = 32;
}

/// WiFi mode constants
pub mod wifi_mode {
    pub const ADHOC: u32 = 1;
    pub const INFRA: u32 = 2;
    pub const AP: u32 = 3;
    pub const MESH: u32 = 4;
}

/// Connection setting names used when building profiles.
pub mod setting {
    pub const CONNECTION: &str = "connection";
    pub const WIRELESS: &str = "802-11-wireless";
    pub const WIRELESS_SECURITY: &str = "802-11-wireless-security";
    pub const IPV4: &str = "ipv4";
    pub const IPV6: &str = "ipv6";
}
