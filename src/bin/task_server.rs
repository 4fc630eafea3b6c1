//! Serves task CRUD operations over HTTP.
//!
//! Usage:
//!
//! ```text
//! task_server [--host <addr>] [--port <port>] [--db-path <file>] [--in-memory]
//! ```
//!
//! Every flag can also be supplied through the environment (`HOST`, `PORT`,
//! `DB_PATH`, `IN_MEMORY`, `DB_POOL_SIZE`, `REQUEST_TIMEOUT_MS`,
//! `LOG_FORMAT`). The database file is created with its schema on first
//! start. The server drains in-flight requests on SIGINT or SIGTERM.

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use taskforge::config::ServerConfig;
use taskforge::task::adapters::http::{AppState, router};
use taskforge::task::adapters::memory::InMemoryTaskRepository;
use taskforge::task::adapters::sqlite::{self, SqliteTaskRepository};
use taskforge::task::ports::TaskRepository;
use taskforge::task::services::TaskService;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    taskforge::telemetry::init(config.log_format).context("install tracing subscriber")?;

    if config.in_memory {
        info!("using in-memory task store");
        return serve(&config, InMemoryTaskRepository::new()).await;
    }

    let pool = sqlite::connect(&config.db_path, config.pool_size)
        .with_context(|| format!("open task store at {}", config.db_path))?;
    serve(&config, SqliteTaskRepository::new(pool)).await
}

async fn serve<R>(config: &ServerConfig, repository: R) -> anyhow::Result<()>
where
    R: TaskRepository + 'static,
{
    let service = TaskService::new(Arc::new(repository));
    let app = router(AppState::new(service, config.request_timeout()));

    let address = config.bind_address();
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("bind {address}"))?;
    info!(%address, timeout_ms = config.request_timeout_ms, "task server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve task requests")?;

    info!("task server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
