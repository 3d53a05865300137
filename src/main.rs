//! signalhub daemon: signaling relay for browser peers, plus the book
//! catalog API.

use anyhow::Result;
use clap::Parser;
use signalhub::{BookCatalog, Config, SignalServer};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "signalhub")]
#[command(about = "Signaling relay for browser peers", long_about = None)]
struct Cli {
    /// Listen address, overrides the config file
    #[arg(long)]
    addr: Option<String>,

    /// Path to an alternate config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with an empty book catalog
    #[arg(long)]
    no_seed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("signalhub=info")),
        )
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let addr = cli.addr.unwrap_or(config.server.bind_address);

    let catalog = if config.catalog.seed && !cli.no_seed {
        BookCatalog::with_seed()
    } else {
        BookCatalog::new()
    };

    let server = SignalServer::new(addr.clone()).with_catalog(Arc::new(catalog));

    println!("Starting signalhub on {}", addr);
    println!("Signaling: ws://{}/ws", addr);
    println!("Catalog API: http://{}/api/books", addr);

    server.run().await
}
