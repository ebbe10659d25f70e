use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use futures::StreamExt;
use log::{LevelFilter, debug};

use nmclient::{BusKind, ClientConfig, NetworkManager};

#[derive(Parser, Debug)]
#[command(name = "nmclient")]
#[command(about = "Inspect NetworkManager over D-Bus")]
#[command(version)]
struct Args {
    /// Connect to the session bus instead of the system bus
    #[arg(long, conflicts_with = "address")]
    session: bool,

    /// Connect to an explicit bus address (e.g. unix:path=/run/dbus/test)
    #[arg(long)]
    address: Option<String>,

    /// Well-known name of the NetworkManager service
    #[arg(long)]
    service: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Print the networking state and all devices as JSON (default)
    Status,
    /// List devices
    Devices,
    /// List active connections
    Active,
    /// Print signals as they arrive, until Ctrl+C
    Monitor,
}

impl Args {
    fn config(&self) -> ClientConfig {
        let bus = match (&self.address, self.session) {
            (Some(address), _) => BusKind::Address(address.clone()),
            (None, true) => BusKind::Session,
            (None, false) => BusKind::System,
        };
        let config = ClientConfig::new().with_bus(bus);
        match &self.service {
            Some(service) => config.with_service(service.clone()),
            None => config,
        }
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level())
        .init();

    let config = args.config();
    debug!("Connecting to NetworkManager on the {} bus", config.bus);
    let nm = NetworkManager::with_config(config)
        .await
        .context("failed to connect to NetworkManager")?;

    match args.command.unwrap_or(Command::Status) {
        Command::Status => status(&nm).await,
        Command::Devices => devices(&nm).await,
        Command::Active => active(&nm).await,
        Command::Monitor => monitor(&nm).await,
    }
}

async fn status(nm: &NetworkManager) -> anyhow::Result<()> {
    let snapshot = nm.snapshot().await.context("failed to read snapshot")?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

async fn devices(nm: &NetworkManager) -> anyhow::Result<()> {
    for device in nm.list_devices().await? {
        println!(
            "{:12} {:10} {:20} {}",
            device.interface().await?,
            device.device_type().to_string(),
            device.state().await?.to_string(),
            device.path().as_str()
        );
    }
    Ok(())
}

async fn active(nm: &NetworkManager) -> anyhow::Result<()> {
    for ac in nm.active_connections().await? {
        println!(
            "{:24} {:38} {:12} {}",
            ac.id().await?,
            ac.uuid().await?,
            ac.state().await?.to_string(),
            ac.path().as_str()
        );
    }
    Ok(())
}

async fn monitor(nm: &NetworkManager) -> anyhow::Result<()> {
    let mut stream = Box::pin(nm.subscribe().await?.into_stream());
    eprintln!("Monitoring {} (Ctrl+C to stop)", nm.path().as_str());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            next = stream.next() => match next {
                Some(n) => {
                    let args: Vec<String> = n.args.iter().map(|a| format!("{a:?}")).collect();
                    println!("{} {} [{}]", n.path.as_str(), n.qualified_member(), args.join(", "));
                }
                None => break,
            },
        }
    }

    nm.unsubscribe().await;
    Ok(())
}
