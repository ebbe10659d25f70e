/// Prints the aggregate networking state and every device.
use nmclient::NetworkManager;

#[tokio::main]
async fn main() -> nmclient::Result<()> {
    let nm = NetworkManager::new().await?;

    println!("NetworkManager is {}", nm.state().await?);

    for device in nm.list_devices().await? {
        println!(
            "{:12} {:10} {}",
            device.interface().await?,
            device.device_type().to_string(),
            device.state().await?
        );
    }

    for active in nm.active_connections().await? {
        println!("active: {} ({})", active.id().await?, active.state().await?);
    }

    Ok(())
}
