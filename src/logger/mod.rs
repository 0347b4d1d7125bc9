//! Logger module
//!
//! Installs the `tracing` subscriber and provides the few lifecycle log
//! helpers shared across the server. Access log lines go to their own
//! target so they can be routed to a file.

mod format;

pub use format::{AccessLogEntry, AccessLogFormat};

use crate::config::{Config, LoggingConfig};
use crate::error::{Result, ServerError};
use std::fs::{File, OpenOptions};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Target used for access log lines
pub const ACCESS_TARGET: &str = "frontdesk::access";

/// Target used for recorded form submissions
pub const FORMS_TARGET: &str = "frontdesk::forms";

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `logging.level`. Should be called once at startup.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("frontdesk={}", config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.access_log_file.as_deref() {
        Some(path) => {
            let file = open_log_file(path)?;
            registry
                .with(
                    fmt::layer()
                        .with_target(false)
                        .compact()
                        .with_filter(filter_fn(|meta| meta.target() != ACCESS_TARGET)),
                )
                .with(
                    fmt::layer()
                        .with_ansi(false)
                        .with_target(false)
                        .with_level(false)
                        .without_time()
                        .with_writer(Mutex::new(file))
                        .with_filter(filter_fn(|meta| meta.target() == ACCESS_TARGET)),
                )
                .try_init()
        }
        None => registry
            .with(fmt::layer().with_target(false).compact())
            .try_init(),
    };

    result.map_err(|e| ServerError::Logging(e.to_string()))
}

/// Open or create a log file for appending
fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    tracing::info!("======================================");
    tracing::info!("frontdesk started, listening on http://{addr}");
    tracing::info!("Static root: {}", config.static_files.root.display());
    tracing::info!("  - GET  /         ({})", config.static_files.index_file);
    tracing::info!("  - POST /signin");
    tracing::info!("  - POST /contact");
    if let Some(workers) = config.server.workers {
        tracing::info!("Worker threads: {workers}");
    }
    if let Some(ref path) = config.logging.access_log_file {
        tracing::info!("Access log: {}", path.display());
    }
    if config.http.enable_cors {
        tracing::info!("CORS: any origin");
    }
    tracing::info!("======================================");
}

/// Emit one formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &AccessLogFormat) {
    tracing::info!(target: ACCESS_TARGET, "{}", entry.format(format));
}
