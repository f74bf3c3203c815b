use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shared::config::load_config;
use taskboard::AppState;
use taskboard::coordinator::{Coordinator, Policy};
use taskboard::database::{self, SqliteStore};
use taskboard::handlers::http::build_api_router;
use taskboard::server::{serve, shutdown_signal};
use taskboard::token::TokenCodec;

#[derive(Debug, Parser)]
#[command(name = "taskboard", about = "Team task board server")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load configuration from {}", args.config))?;

    // Read once; fixed for the life of the process.
    let secret = config
        .auth
        .resolved_jwt_secret()
        .context("No signing secret configured")?;
    let codec = TokenCodec::new(secret.as_bytes());

    let pool = database::connect(&config.database)
        .await
        .context("Failed to open database")?;

    let policy = Policy::from_config(&config.auth);
    let coordinator = Coordinator::new(SqliteStore::new(pool), codec, policy);
    let addr = config.server.addr();
    let state = AppState::new(config, coordinator);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    serve(listener, build_api_router(), state, shutdown_signal()).await?;
    info!("Server closed");

    Ok(())
}
