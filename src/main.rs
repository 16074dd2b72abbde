use std::{path::PathBuf, process};

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tunerelay::{config, server};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Port to listen on (overrides PORT and the port of SERVER_ADDRESS)
    #[clap(long, short)]
    port: Option<u16>,

    /// Load environment from this file instead of the default .env locations
    #[clap(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Log filter, e.g. `info` or `tunerelay=debug,tower_http=debug` (overrides RUST_LOG)
    #[clap(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let loaded = config::load_env(cli.env_file.as_deref());

    // RUST_LOG may come from one of the .env files just loaded
    let filter = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    for path in &loaded {
        info!("loaded environment from {}", path.display());
    }

    let mut config = match config::Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Cannot load configuration: {}", e);
            process::exit(1);
        }
    };
    if let Some(port) = cli.port {
        config.server_addr.set_port(port);
    }

    if let Err(e) = server::serve(config).await {
        error!("Server shut down with error: {}", e);
        process::exit(1);
    }
}
