//! Connection profiles.
//!
//! NetworkManager describes a connection as a nested dictionary, section name
//! to setting name to variant value (`a{sa{sv}}`). [`Profile`] holds such a
//! dictionary; [`ProfileBuilder`] fills in the sections most callers need.
//!
//! # Example
//!
//! ```rust
//! use nmclient::builders::ProfileBuilder;
//!
//! let profile = ProfileBuilder::new("802-11-wireless", "HomeNetwork")
//!     .wifi_ssid(b"HomeNetwork")
//!     .wpa_psk("hunter22")
//!     .ipv4_auto()
//!     .ipv6_auto()
//!     .build();
//!
//! assert_eq!(profile.id(), Some("HomeNetwork"));
//! ```

use std::collections::HashMap;
use uuid::Uuid;
use zvariant::{OwnedValue, Value};

use crate::types::constants::setting;

type Section = HashMap<String, Value<'static>>;

/// A connection profile: section name → setting name → value.
#[derive(Debug, Default, PartialEq)]
pub struct Profile {
    sections: HashMap<String, Section>,
}

impl Profile {
    /// Creates an empty profile.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` in `section`, creating the section if needed.
    pub fn insert(
        &mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value<'static>>,
    ) {
        self.sections
            .entry(section.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    /// Returns the value of `key` in `section`.
    pub fn get(&self, section: &str, key: &str) -> Option<&Value<'static>> {
        self.sections.get(section).and_then(|s| s.get(key))
    }

    /// Returns `true` if the profile has a section named `section`.
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Iterates over the section names.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Human-readable name (`connection.id`).
    pub fn id(&self) -> Option<&str> {
        self.string(setting::CONNECTION, "id")
    }

    /// Connection UUID (`connection.uuid`).
    pub fn uuid(&self) -> Option<&str> {
        self.string(setting::CONNECTION, "uuid")
    }

    /// Connection type (`connection.type`), e.g. `802-11-wireless`.
    pub fn connection_type(&self) -> Option<&str> {
        self.string(setting::CONNECTION, "type")
    }

    fn string(&self, section: &str, key: &str) -> Option<&str> {
        match self.get(section, key)? {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Marshals the profile as an `a{sa{sv}}` argument.
    pub(crate) fn into_value(self) -> Value<'static> {
        Value::from(self.sections)
    }

    pub(crate) fn from_settings(settings: HashMap<String, HashMap<String, OwnedValue>>) -> Self {
        let sections = settings
            .into_iter()
            .map(|(name, section)| {
                let section = section
                    .into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect();
                (name, section)
            })
            .collect();
        Self { sections }
    }
}

/// Builder for [`Profile`]s.
///
/// `new` fills the `connection` section with the type, id and a random UUID.
/// The remaining helpers add the sections a Wi-Fi profile typically needs;
/// [`setting`](Self::setting) covers anything else.
#[derive(Debug)]
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    /// Starts a profile of `connection_type` (e.g. `802-11-wireless`,
    /// `802-3-ethernet`) named `id`.
    pub fn new(connection_type: &str, id: impl Into<String>) -> Self {
        let mut profile = Profile::new();
        profile.insert(setting::CONNECTION, "type", connection_type.to_string());
        profile.insert(setting::CONNECTION, "id", id.into());
        profile.insert(setting::CONNECTION, "uuid", Uuid::new_v4().to_string());
        Self { profile }
    }

    /// Replaces the random UUID.
    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.profile
            .insert(setting::CONNECTION, "uuid", uuid.to_string());
        self
    }

    /// Enables or disables automatic connection.
    pub fn autoconnect(mut self, enabled: bool) -> Self {
        self.profile
            .insert(setting::CONNECTION, "autoconnect", enabled);
        self
    }

    /// Restricts the profile to one interface (e.g. "wlan0").
    pub fn interface_name(mut self, name: impl Into<String>) -> Self {
        self.profile
            .insert(setting::CONNECTION, "interface-name", name.into());
        self
    }

    /// Sets the Wi-Fi SSID. SSIDs are raw bytes, not necessarily UTF-8.
    pub fn wifi_ssid(mut self, ssid: impl AsRef<[u8]>) -> Self {
        self.profile
            .insert(setting::WIRELESS, "ssid", ssid.as_ref().to_vec());
        self.profile
            .insert(setting::WIRELESS, "mode", "infrastructure");
        self
    }

    /// Secures the profile with a WPA pre-shared key.
    pub fn wpa_psk(mut self, psk: impl Into<String>) -> Self {
        self.profile
            .insert(setting::WIRELESS, "security", setting::WIRELESS_SECURITY);
        self.profile
            .insert(setting::WIRELESS_SECURITY, "key-mgmt", "wpa-psk");
        self.profile
            .insert(setting::WIRELESS_SECURITY, "psk", psk.into());
        self
    }

    /// Configures IPv4 to use automatic configuration (DHCP).
    pub fn ipv4_auto(mut self) -> Self {
        self.profile.insert(setting::IPV4, "method", "auto");
        self
    }

    /// Configures IPv6 to use automatic configuration (SLAAC/DHCPv6).
    pub fn ipv6_auto(mut self) -> Self {
        self.profile.insert(setting::IPV6, "method", "auto");
        self
    }

    /// Disables IPv6 for this connection.
    pub fn ipv6_ignore(mut self) -> Self {
        self.profile.insert(setting::IPV6, "method", "ignore");
        self
    }

    /// Sets an arbitrary setting.
    pub fn setting(
        mut self,
        section: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<Value<'static>>,
    ) -> Self {
        self.profile.insert(section, key, value);
        self
    }

    pub fn build(self) -> Profile {
        self.profile
    }
}
