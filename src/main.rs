//! Eventdeck Server
//!
//! Run with: cargo run --bin eventdeck -- [-c config.toml] [-a 0.0.0.0] [-p 2802] [-r 200] [-d]
//!
//! Flags override the config file, which is overridden by `EVENTDECK_*`
//! environment variables. `RUST_LOG` takes precedence over `logging.level`.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eventdeck::api::{serve, AppState};
use eventdeck::config::{generate_default_config, Config, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Realtime security event dashboard
#[derive(Debug, Parser)]
#[command(name = "eventdeck", version, about)]
struct Args {
    /// Config file (defaults to the standard locations)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Listen address
    #[arg(short = 'a', long)]
    address: Option<String>,

    /// Listen port
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Number of events to keep in retention
    #[arg(short = 'r', long)]
    retention: Option<usize>,

    /// Enable dark mode as default
    #[arg(short = 'd', long)]
    dark: bool,

    /// Print a default config file and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_config {
        print!("{}", generate_default_config());
        return Ok(());
    }

    let (mut config, source) = match &args.config {
        Some(path) => {
            let config = Config::load_with_env(path)
                .with_context(|| format!("loading {}", path.display()))?;
            (config, Some(path.clone()))
        }
        None => Config::load_default().context("loading default config")?,
    };
    apply_args(&mut config, &args);
    config.validate()?;

    init_tracing(&config.logging);

    tracing::info!("Starting Eventdeck v{}", env!("CARGO_PKG_VERSION"));
    match &source {
        Some(path) => tracing::info!("Loaded config from {:?}", path),
        None => tracing::info!("Using default config with environment overrides"),
    }
    tracing::info!("Retention is {} last events", config.events.retention);
    tracing::info!("Serving dashboard from {:?}", config.server.ui_dir);

    let state = AppState::new(&config);
    serve(state, &config.server.addr()).await?;

    Ok(())
}

fn apply_args(config: &mut Config, args: &Args) {
    if let Some(address) = &args.address {
        config.server.host = address.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(retention) = args.retention {
        config.events.retention = retention;
    }
    if args.dark {
        config.display.dark_mode = true;
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "eventdeck={},tower_http={}",
            logging.level, logging.level
        ))
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
