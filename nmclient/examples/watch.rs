/// Streams NetworkManager signals until interrupted.
use futures::StreamExt;
use nmclient::NetworkManager;

#[tokio::main]
async fn main() -> nmclient::Result<()> {
    let nm = NetworkManager::new().await?;
    let mut notifications = Box::pin(nm.subscribe().await?.into_stream());

    println!("Watching signals under {} (Ctrl+C to stop)", nm.path().as_str());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = notifications.next() => match next {
                Some(n) => println!("{:60} {}", n.qualified_member(), n.path.as_str()),
                None => break,
            },
        }
    }

    nm.unsubscribe().await;
    Ok(())
}
