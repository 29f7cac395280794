//! Orbit tracker - main entry point.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use orbit_core::Config;
use orbit_query::summarize;
use orbit_server::{serve, AppState};

/// Serve cached satellite state vectors over HTTP.
#[derive(Debug, Parser)]
#[command(name = "orbit-tracker", version, about)]
struct Cli {
    /// JSON configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Upstream feed URL.
    #[arg(long)]
    feed_url: Option<String>,

    /// Read the feed from a local file instead of the network.
    #[arg(long, value_name = "FILE")]
    feed_file: Option<PathBuf>,

    /// SQLite cache file (in-memory when omitted).
    #[arg(long, value_name = "FILE")]
    db_path: Option<PathBuf>,

    /// Interface to bind the HTTP server to.
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on.
    #[arg(short, long)]
    port: Option<u16>,

    /// Nominatim-compatible reverse geocoding endpoint.
    #[arg(long)]
    geocoder_url: Option<String>,

    /// Log level: debug, info, warning, error or critical.
    #[arg(short = 'l', long = "loglevel", default_value = "warning")]
    log_level: String,

    /// Print a summary of the series and exit.
    #[arg(long)]
    summary: bool,

    /// Empty the series cache before starting.
    #[arg(long)]
    reset_cache: bool,
}

impl Cli {
    /// File configuration (or defaults) with command-line overrides applied.
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(url) = &self.feed_url {
            config.feed.url = url.clone();
        }
        if let Some(path) = &self.feed_file {
            config.feed.path = Some(path.clone());
        }
        if let Some(path) = &self.db_path {
            config.store.path = Some(path.clone());
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.geocoder_url {
            config.location.geocoder_url = Some(url.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Map `--loglevel` names (including "warning" and "critical") onto tracing directives.
fn level_directive(level: &str) -> &'static str {
    match level.to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "error" | "critical" => "error",
        _ => "warn",
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(level_directive(&cli.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = cli.load_config()?;
    let state = AppState::from_config(&config)?;

    if cli.reset_cache {
        state.store.clear()?;
    }

    if cli.summary {
        let count = state.store.ensure_loaded().await?;
        let series = state.store.get_all()?;
        let summary = summarize(&series, Utc::now().naive_utc())?;
        println!("{summary}");
        info!("done with {} state vectors", count);
        return Ok(());
    }

    info!("starting orbit tracker v{}", env!("CARGO_PKG_VERSION"));
    serve(&config.server, state).await?;
    Ok(())
}
