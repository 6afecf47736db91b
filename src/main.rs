use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use packlist::client::PacklistClient;
use packlist::config::{ClientConfig, DatabaseLocation, ServerConfig, DEFAULT_PORT};
use packlist::view::{render, repl, PackingView};
use packlist::api;

#[derive(Parser)]
#[command(name = "packlist")]
#[command(about = "Shared packing lists for trips")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Packlist HTTP API
    Serve(ServeArgs),
    /// Open the live dashboard against a running server
    Watch(RemoteArgs),
    /// Print every trip once and exit
    Trips(RemoteArgs),
}

#[derive(Args)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "PACKLIST_HOST", default_value = "127.0.0.1")]
    host: IpAddr,

    /// Port for HTTP API
    #[arg(short, long, env = "PACKLIST_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// SQLite database file (defaults to the platform data directory)
    #[arg(long, env = "PACKLIST_DB", conflicts_with = "memory")]
    db: Option<PathBuf>,

    /// Keep everything in memory; data is lost on exit
    #[arg(long)]
    memory: bool,
}

impl ServeArgs {
    fn into_config(self) -> ServerConfig {
        let database = match (self.memory, self.db) {
            (true, _) => DatabaseLocation::Memory,
            (false, Some(path)) => DatabaseLocation::File(path),
            (false, None) => DatabaseLocation::Default,
        };
        ServerConfig {
            addr: SocketAddr::new(self.host, self.port),
            database,
        }
    }
}

#[derive(Args)]
struct RemoteArgs {
    /// Base URL of the Packlist API
    #[arg(long, env = "PACKLIST_URL", default_value_t = ClientConfig::default().base_url)]
    url: String,

    /// Seconds between background reloads
    #[arg(long, default_value_t = 10)]
    interval: u64,
}

impl RemoteArgs {
    fn into_config(self) -> ClientConfig {
        ClientConfig {
            poll_interval: Duration::from_secs(self.interval.max(1)),
            ..ClientConfig::new(self.url)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "packlist=debug,packlist_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args.into_config()).await?,
        Some(Commands::Watch(args)) => {
            let config = args.into_config();
            let view = PackingView::new(PacklistClient::new(&config)?);
            repl::run(view, config.poll_interval).await?;
        }
        Some(Commands::Trips(args)) => {
            let config = args.into_config();
            let view = PackingView::new(PacklistClient::new(&config)?);
            if !view.load().await {
                anyhow::bail!("could not load trips from {}", config.base_url);
            }
            let store = view.snapshot().await;
            if store.trips().is_empty() {
                println!("No trips yet.");
            }
            for trip in store.trips() {
                println!("{}", render::trip(trip));
            }
        }
        None => serve(ServerConfig::default()).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!("Starting Packlist server on {}", config.addr);

    let db = config.database.open()?;
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!("Packlist server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
