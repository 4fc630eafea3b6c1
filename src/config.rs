//! Server configuration loaded from command-line flags and environment.

use clap::{Parser, ValueEnum};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable output.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Configuration for the task server.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "task_server", about = "Serve task CRUD operations over HTTP")]
pub struct ServerConfig {
    /// Address to bind.
    #[arg(long, env = "HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = 50051)]
    pub port: u16,

    /// Path of the `SQLite` database file; created with its schema if missing.
    #[arg(long, env = "DB_PATH", default_value = "task.db")]
    pub db_path: String,

    /// Keep tasks in process memory instead of `SQLite`.
    #[arg(long, env = "IN_MEMORY")]
    pub in_memory: bool,

    /// Maximum number of pooled store connections.
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,

    /// Per-request deadline in milliseconds.
    #[arg(long, env = "REQUEST_TIMEOUT_MS", default_value_t = 5000)]
    pub request_timeout_ms: u64,

    /// Log output format.
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Returns the socket address to bind.
    #[must_use]
    pub const fn bind_address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Returns the per-request deadline.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
