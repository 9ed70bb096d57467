//! # TodoCast
//!
//! One binary, one subcommand per service:
//!
//!   todocast backend         # todo HTTP API, publishes change events
//!   todocast broadcaster     # relays change events to Telegram
//!   todocast frontend        # UI page, background image, API proxy
//!   todocast image-refresh   # keeps the background image fresh
//!   todocast reminder        # adds one "Read <article>" todo and exits
//!
//! All settings come from environment variables.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use todocast_broadcaster::{Broadcaster, NotificationSink};
use todocast_bus::NatsPublisher;
use todocast_core::config::{
    BackendConfig, BroadcasterConfig, BusConfig, FrontendConfig, ImageRefreshConfig,
    ReminderConfig, StoreConfig,
};
use todocast_jobs::ImageRefresher;

#[derive(Parser)]
#[command(
    name = "todocast",
    version,
    about = "📝 TodoCast: todo backend, change-event broadcaster and companion services"
)]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Todo HTTP API (GET/POST /todos, PUT /todos/{id}, GET /healthz)
    Backend,
    /// Queue-group subscriber that forwards events to Telegram
    Broadcaster,
    /// Serves the page and image, proxies /api/todos to the backend
    Frontend,
    /// Periodically downloads the background image
    ImageRefresh,
    /// Inserts one reminder todo and exits
    Reminder,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "todocast=debug,todocast_core=debug,todocast_store=debug,todocast_bus=debug,\
         todocast_broadcaster=debug,todocast_gateway=debug,todocast_frontend=debug,\
         todocast_jobs=debug,tower_http=debug"
    } else {
        "todocast=info,todocast_core=info,todocast_store=info,todocast_bus=info,\
         todocast_broadcaster=info,todocast_gateway=info,todocast_frontend=info,\
         todocast_jobs=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_target(false)
        .init();

    match cli.command {
        Command::Backend => run_backend().await,
        Command::Broadcaster => run_broadcaster().await,
        Command::Frontend => {
            todocast_frontend::start(FrontendConfig::from_env()?, shutdown_signal()).await?;
            Ok(())
        }
        Command::ImageRefresh => run_image_refresh().await,
        Command::Reminder => {
            let store = todocast_store::open_store(&StoreConfig::from_env()?).await?;
            todocast_jobs::reminder::run(&ReminderConfig::from_env()?, store.as_ref()).await?;
            Ok(())
        }
    }
}

async fn run_backend() -> Result<()> {
    let config = BackendConfig::from_env()?;
    let store = todocast_store::open_store(&StoreConfig::from_env()?).await?;
    let publisher = Arc::new(NatsPublisher::new(&BusConfig::publisher_from_env()?));

    todocast_gateway::start(&config, store, publisher, shutdown_signal()).await?;
    Ok(())
}

async fn run_broadcaster() -> Result<()> {
    let config = BroadcasterConfig::from_env()?;
    let bus = BusConfig::subscriber_from_env()?;
    let broadcaster = Broadcaster::new(NotificationSink::from_mode(&config.mode));

    // No retry: a broker that is down at startup ends the process.
    let subscription = todocast_bus::subscribe(&bus).await?;

    let stop = broadcaster.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        stop.notify_one();
    });

    let delivered = broadcaster.run(subscription).await;
    tracing::info!("Broadcaster exited after {delivered} message(s)");
    Ok(())
}

async fn run_image_refresh() -> Result<()> {
    let refresher = ImageRefresher::new(ImageRefreshConfig::from_env()?)?;

    let stop = refresher.shutdown_handle();
    tokio::spawn(async move {
        shutdown_signal().await;
        stop.notify_one();
    });

    refresher.run().await;
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("Shutdown signal received");
}
