//! Logger module
//!
//! Sets up the `tracing` subscriber and provides the server's named log events:
//! - Server lifecycle logging
//! - Access logging
//! - Error and warning logging

use crate::config::{Config, LogFormat, LoggingConfig};
use hyper::{Method, StatusCode};
use std::net::SocketAddr;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber
///
/// Should be called once at application startup. `RUST_LOG` takes precedence
/// over the configured level.
pub fn init(config: &LoggingConfig) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| format!("Invalid log level '{}': {e}", config.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match config.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| format!("Failed to install log subscriber: {e}"))
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!(
        listen = %format!("http://{addr}"),
        workers = ?config.server.workers,
        dash_url = %config.deploy.dash_url,
        api_url = %config.deploy.api_url,
        static_token = config.deploy.static_token().is_some(),
        "snippet deployer started"
    );
    if config.routes.health.enabled {
        tracing::info!(
            liveness = %config.routes.health.liveness_path,
            readiness = %config.routes.health.readiness_path,
            "health probes enabled"
        );
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    tracing::debug!(peer = %peer_addr, "connection accepted");
}

pub fn log_connection_rejected(peer_addr: &SocketAddr, active: usize, max: u64) {
    tracing::warn!(
        peer = %peer_addr,
        active,
        max,
        "max connections reached, connection rejected"
    );
}

pub fn log_connection_error(err: &hyper::Error) {
    tracing::warn!(error = %err, "failed to serve connection");
}

pub fn log_connection_timeout(timeout: Duration) {
    tracing::warn!(timeout_secs = timeout.as_secs(), "connection timed out");
}

pub fn log_accept_error(err: &std::io::Error) {
    tracing::error!(error = %err, "failed to accept connection");
}

/// Access log line for one request
pub fn log_access(method: &Method, path: &str, status: StatusCode, elapsed: Duration) {
    tracing::info!(
        target: "access",
        %method,
        path,
        status = status.as_u16(),
        elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        "request handled"
    );
}

pub fn log_deploy_error(err: &crate::deploy::DeployError) {
    tracing::error!(error = %err, kind = err.error_type(), "deploy failed");
}

pub fn log_shutdown(active: usize) {
    tracing::info!(active_connections = active, "shutting down, no longer accepting connections");
}
