//! Keep-alive service.
//!
//! Spawns the pinger loop against the configured URL, then serves a trivial
//! root endpoint until shutdown.

use clap::Parser;

use payslip::config::AppConfig;
use payslip::http::start_server;
use payslip::pinger::Pinger;
use payslip::routes::create_keepalive_router;
use payslip::telemetry::{init_tracing, resolve_log_filter};

/// Keepalive: pings a remote deployment on an interval
#[derive(Parser, Debug)]
#[command(name = "keepalive", version, about)]
struct Args {
    /// Path to configuration file (defaults to config/default.toml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "payslip=debug")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AppConfig::load_or_default(args.config.as_deref())?.with_process_env()?;

    init_tracing(&resolve_log_filter(args.log_level), config.logging.format);

    let pinger = Pinger::new(&config.pinger)?;
    pinger.spawn();

    let app = create_keepalive_router();
    start_server(app, &config.pinger.host, config.pinger.port).await?;

    Ok(())
}
