//! Pipeline Dashboard Demo Backend
//!
//! Run with: cargo run --bin pipeline-demo
//!
//! Serves the backend proxy contract from a generated dataset, so the
//! dashboard can run without CRM credentials.
//!
//! # Configuration
//!
//! Config file (`--config` or the standard locations) plus environment:
//! - `PIPELINE_DEMO_HOST`: Host to bind to (default: 127.0.0.1)
//! - `PIPELINE_DEMO_PORT`: Port to listen on (default: 8000)
//! - `PIPELINE_DEMO_REQUIRE_SESSION`: Require a login before serving data (default: false)
//! - `PIPELINE_LOG_LEVEL`: Log level (default: info)
//! - `PIPELINE_LOG_FORMAT`: pretty or json (default: pretty)
//! - `RUST_LOG`: Full filter, overrides the level

use clap::Parser;
use pipeline_dashboard::config::LoggingConfig;
use pipeline_dashboard::demo::{serve, DemoState};
use pipeline_dashboard::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pipeline-demo")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Demo backend for the sales pipeline dashboard")]
struct Args {
    /// Config file (default: standard locations)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Dataset seed
    #[arg(long)]
    seed: Option<u64>,

    /// Number of generated opportunities
    #[arg(long)]
    records: Option<usize>,

    /// Require /auth/login before data endpoints answer
    #[arg(long)]
    require_session: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_tracing(&config.logging);

    tracing::info!("Starting pipeline demo backend v{}", env!("CARGO_PKG_VERSION"));

    let demo = &mut config.demo;
    if let Some(host) = args.host {
        demo.host = host;
    }
    if let Some(port) = args.port {
        demo.port = port;
    }
    if let Some(seed) = args.seed {
        demo.seed = seed;
    }
    if let Some(records) = args.records {
        demo.records = records;
    }
    if args.require_session {
        demo.require_session = true;
    }

    tracing::info!("Frontend origin: {}", demo.frontend_url);
    tracing::info!("Sessions required: {}", demo.require_session);

    let state = DemoState::from_config(demo.clone());
    serve(state, demo).await?;

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("pipeline_dashboard={},tower_http=debug", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.is_json() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
