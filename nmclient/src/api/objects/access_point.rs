use zvariant::OwnedObjectPath;

use crate::Result;
use crate::api::models::{ApFlags, ApSecurityFlags, WifiMode};
use crate::dbus::RemoteObject;
use crate::dbus::members::access_point;

/// A Wi-Fi access point (`org.freedesktop.NetworkManager.AccessPoint`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccessPoint {
    object: RemoteObject,
}

impl AccessPoint {
    pub(crate) fn new(object: RemoteObject) -> Self {
        Self { object }
    }

    pub fn path(&self) -> &OwnedObjectPath {
        self.object.path()
    }

    /// Raw SSID bytes.
    pub async fn ssid(&self) -> Result<Vec<u8>> {
        self.object.property(access_point::SSID).await
    }

    /// SSID as text, with invalid UTF-8 replaced. Hidden networks report
    /// `<Hidden Network>`.
    pub async fn ssid_string(&self) -> Result<String> {
        let ssid = self.ssid().await?;
        if ssid.is_empty() {
            return Ok("<Hidden Network>".to_string());
        }
        Ok(String::from_utf8_lossy(&ssid).into_owned())
    }

    /// Signal quality in percent.
    pub async fn strength(&self) -> Result<u8> {
        self.object.property(access_point::STRENGTH).await
    }

    /// BSSID.
    pub async fn hw_address(&self) -> Result<String> {
        self.object.property(access_point::HW_ADDRESS).await
    }

    /// Frequency in MHz.
    pub async fn frequency(&self) -> Result<u32> {
        self.object.property(access_point::FREQUENCY).await
    }

    /// Maximum bitrate in kb/s.
    pub async fn max_bitrate(&self) -> Result<u32> {
        self.object.property(access_point::MAX_BITRATE).await
    }

    pub async fn mode(&self) -> Result<WifiMode> {
        let raw: u32 = self.object.property(access_point::MODE).await?;
        Ok(raw.into())
    }

    pub async fn flags(&self) -> Result<ApFlags> {
        let raw: u32 = self.object.property(access_point::FLAGS).await?;
        Ok(ApFlags::from_bits_retain(raw))
    }

    /// Capabilities from the WPA information element.
    pub async fn wpa_flags(&self) -> Result<ApSecurityFlags> {
        let raw: u32 = self.object.property(access_point::WPA_FLAGS).await?;
        Ok(ApSecurityFlags::from_bits_retain(raw))
    }

    /// Capabilities from the RSN (WPA2/WPA3) information element.
    pub async fn rsn_flags(&self) -> Result<ApSecurityFlags> {
        let raw: u32 = self.object.property(access_point::RSN_FLAGS).await?;
        Ok(ApSecurityFlags::from_bits_retain(raw))
    }
}
