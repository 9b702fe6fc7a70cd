//! Vitrine catalog server.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use vitrine_kernel::cli;
use vitrine_kernel::config::Config;
use vitrine_kernel::routes;
use vitrine_kernel::state::AppState;

#[derive(Parser, Debug)]
#[command(name = "vitrine", author, version, about = "Multilingual catalog server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply database migrations and exit.
    Migrate,
    /// Print the configured languages.
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Cli::parse();

    init_tracing();

    let config = Config::from_env().context("failed to load configuration")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Migrate => cli::cmd_migrate(&config).await,
        Command::Languages => {
            cli::cmd_languages(&config.languages);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    info!("Starting Vitrine");
    info!(
        port = config.port,
        languages = %config.languages,
        media_url = %config.media_url,
        "Configuration loaded"
    );

    if config.admin_token.is_none() {
        warn!("ADMIN_TOKEN is not set; the admin API is open to anyone who can reach it");
    }

    // Initialize application state (database connection, migrations)
    let state = AppState::new(&config)
        .await
        .context("failed to initialize application state")?;

    let app = routes::app(state).layer(routes::cors_layer(&config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind to address")?;

    info!(%addr, "Server listening");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
