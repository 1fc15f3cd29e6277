//! Quill API server binary.

use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use quill_api::config::ApiConfig;
use quill_core::notify::smtp::{SmtpNotifier, SmtpSettings};
use quill_core::notify::{LogNotifier, Notifier};
use quill_core::store::postgres::{self, PgIdentityStore};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "quill_api_server", about = "Quill blog API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/quill"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quill_api=debug,quill_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    info!(database_url = %args.database_url, bind_addr = %args.bind_addr, "starting quill_api_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&args.database_url)
        .await?;

    info!("running database migrations");
    postgres::migrate(&pool).await?;

    let mut config = ApiConfig::from_env();
    config.bind_addr = args.bind_addr;
    config.pg_connection_url = args.database_url;

    let notifier: Arc<dyn Notifier> = match smtp_settings_from_env() {
        Some(settings) => Arc::new(SmtpNotifier::new(&settings)?),
        None => {
            info!("SMTP not configured; reset emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let state = quill_api::AppState::new(
        config.clone(),
        Arc::new(PgIdentityStore::new(pool)),
        notifier,
    );
    let app = quill_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Read SMTP settings from `SMTP_RELAY`, `SMTP_USERNAME`, `SMTP_PASSWORD`
/// and `SMTP_FROM`. All four must be present to enable real dispatch.
fn smtp_settings_from_env() -> Option<SmtpSettings> {
    Some(SmtpSettings {
        relay: std::env::var("SMTP_RELAY").ok()?,
        username: std::env::var("SMTP_USERNAME").ok()?,
        password: std::env::var("SMTP_PASSWORD").ok()?,
        from: std::env::var("SMTP_FROM").ok()?,
    })
}
