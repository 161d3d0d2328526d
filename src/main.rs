//! Payslip submission service.
//!
//! This is the application entry point. It loads configuration (TOML file plus
//! environment overrides), initializes tracing, builds the Tera templates and
//! the SMTP mailer, sets up the Axum router and starts the HTTP server.

use std::sync::Arc;

use clap::Parser;

use payslip::config::AppConfig;
use payslip::http::start_server;
use payslip::mailer::SmtpMailer;
use payslip::routes::create_router;
use payslip::state::AppState;
use payslip::telemetry::{init_tracing, resolve_log_filter};
use payslip::templates::init_templates;

/// Payslip: accepts pay slip submissions and emails confirmations
#[derive(Parser, Debug)]
#[command(name = "payslip", version, about)]
struct Args {
    /// Path to configuration file (defaults to config/default.toml if present)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "payslip=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = AppConfig::load_or_default(args.config.as_deref())?.with_process_env()?;

    init_tracing(&resolve_log_filter(args.log_level), config.logging.format);
    tracing::info!("Loaded configuration");

    tracing::info!(
        host = %config.smtp.host,
        port = config.smtp.port,
        security = ?config.smtp.security,
        sender = config.smtp.sender_address().unwrap_or("<unset>"),
        has_auth = config.smtp.has_credentials(),
        "SMTP relay configured"
    );

    let tera = init_templates()?;
    tracing::info!("Initialized templates");

    let mailer = SmtpMailer::new(&config.smtp)?;
    if mailer.sender().is_none() {
        tracing::warn!("No sender address configured; submissions will fail until smtp.sender or SMTP_USER is set");
    }

    let state = AppState::new(config.clone(), tera, Arc::new(mailer));
    let app = create_router(state);

    start_server(app, &config.http.host, config.http.port).await?;

    Ok(())
}
