//! gala-tickets - Event ticket service
//!
//! Issues QR event tickets composited onto a background template, keeps a
//! record of issued codes, and serves downloads and verification over HTTP.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gala_common::config::{load_config, RootFolderInitializer};
use gala_tickets::config::{CliOverrides, ServiceConfig};
use gala_tickets::db::SqliteTicketStore;
use gala_tickets::services::TicketPipeline;
use gala_tickets::AppState;

/// Command-line arguments for gala-tickets
#[derive(Parser, Debug)]
#[command(name = "gala-tickets")]
#[command(about = "QR event ticket service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "GALA_PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "GALA_BIND")]
    bind: Option<String>,

    /// Root folder holding the database and default template
    /// (also read from GALA_ROOT_FOLDER)
    #[arg(short, long)]
    root_folder: Option<PathBuf>,

    /// Background template image
    #[arg(short, long, env = "GALA_TEMPLATE")]
    template: Option<PathBuf>,

    /// SQLite database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// TOML config file (replaces config file discovery)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging exists; discovery warnings are dropped
    let toml_config = load_config(args.config.as_deref())
        .with_context(|| format!("Failed to load config file {:?}", args.config))?;

    let config = ServiceConfig::resolve(
        CliOverrides {
            port: args.port,
            bind_address: args.bind,
            root_folder: args.root_folder,
            template_path: args.template,
            database_path: args.database,
        },
        &toml_config,
    );

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("{},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting gala-tickets v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config.log_summary();

    RootFolderInitializer::new(config.root_folder.clone())
        .ensure_directory_exists()
        .context("Failed to initialize root folder")?;

    let pool = gala_common::db::init_database(&config.database_path)
        .await
        .context("Failed to open ticket database")?;
    info!("Database connection established");

    let pipeline = TicketPipeline::new(config.template_path.clone());
    if !pipeline.template().is_present() {
        warn!(
            "Ticket template {} is missing; issuance will fail until it is provided",
            config.template_path.display()
        );
    }

    let state = AppState::new(Arc::new(SqliteTicketStore::new(pool.clone())), pipeline);
    let app = gala_tickets::build_router(state);

    let addr = config.listen_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
