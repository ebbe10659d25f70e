/// Adds a WPA-PSK profile for an SSID and activates it on the first Wi-Fi device.
///
/// Usage: `WIFI_SSID=MyNetwork WIFI_PASSWORD=secret cargo run --example wpa_connect`
use nmclient::NetworkManager;
use nmclient::builders::ProfileBuilder;

#[tokio::main]
async fn main() -> nmclient::Result<()> {
    let ssid = std::env::var("WIFI_SSID").unwrap_or_else(|_| "MyNetwork".to_string());
    let psk = std::env::var("WIFI_PASSWORD").unwrap_or_else(|_| "password".to_string());

    let nm = NetworkManager::new().await?;

    let mut wifi = None;
    for device in nm.list_devices().await? {
        if device.is_wireless() {
            wifi = Some(device);
            break;
        }
    }
    let Some(device) = wifi else {
        eprintln!("No Wi-Fi device found");
        return Ok(());
    };

    let mut target = None;
    for ap in device.access_points().await? {
        if ap.ssid().await? == ssid.as_bytes() {
            target = Some(ap);
            break;
        }
    }

    let profile = ProfileBuilder::new("802-11-wireless", ssid.clone())
        .wifi_ssid(ssid.as_bytes())
        .wpa_psk(psk)
        .ipv4_auto()
        .ipv6_auto()
        .build();

    let active = nm
        .add_and_activate_connection(profile, &device, target.as_ref())
        .await?;
    println!("Activating {ssid}: {}", active.path().as_str());

    Ok(())
}
