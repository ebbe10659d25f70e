#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nmclient_cli::run().await
}
