use actix_web::{App, HttpServer};
use clap::{Parser, Subcommand};
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod db;
mod shutdown;

use crate::api::auth::SessionIssuer;
use crate::config::Config;
use crate::db::{MemoryStore, PgStore, Store};
use crate::shutdown::ShutdownCoordinator;

/// Freelance job marketplace API server
#[derive(Parser)]
#[command(name = "marketplace", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Listen address, overrides BIND_ADDR
    #[arg(long, global = true)]
    bind: Option<String>,

    /// Listen port, overrides PORT
    #[arg(long, global = true)]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
}

/// Console output plus daily-rotated files per level
/// (logs/info.log.2024-12-22, logs/error.log.2024-12-22, ...)
fn init_logging(log_dir: &str) -> io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "info.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "warn.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "error.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "debug.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

/// Open the configured store, running migrations for Postgres
async fn open_store(config: &Config) -> io::Result<Arc<dyn Store>> {
    match &config.database_url {
        Some(url) => {
            let pool = db::connection::get_connection(url, config.max_db_connections)
                .await
                .map_err(io::Error::other)?;
            info!("Database connection pool established");

            db::migrations::run_migrations(&pool)
                .await
                .map_err(io::Error::other)?;

            Ok(Arc::new(PgStore::new(pool)))
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store, data is lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env().map_err(io::Error::other)?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }

    init_logging(&config.log_dir)?;

    if let Some(Command::Migrate) = cli.command {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| io::Error::other("DATABASE_URL must be set to run migrations"))?;
        let pool = db::connection::get_connection(url, 1)
            .await
            .map_err(io::Error::other)?;
        db::migrations::run_migrations(&pool)
            .await
            .map_err(io::Error::other)?;
        pool.close().await;
        return Ok(());
    }

    info!("Starting marketplace application");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Production cookies: {}", config.production);
    info!("  - Allowed origins: {}", config.client_origins.join(", "));

    let store = open_store(&config).await?;
    let issuer = SessionIssuer::new(&config.session_secret, config.production);

    let server_store = store.clone();
    let max_payload_size = config.max_payload_size;
    let client_origins = config.client_origins.clone();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(api::cors::cors_policy(&client_origins))
            .configure(api::configure(
                server_store.clone(),
                issuer.clone(),
                max_payload_size,
            ))
    });

    info!("Server starting on http://{}:{}", config.bind_addr, config.port);

    let server = server
        .bind((config.bind_addr.as_str(), config.port))?
        .run();

    // Get server handle for graceful shutdown
    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, store);
    coordinator.wait_for_shutdown().await
}
