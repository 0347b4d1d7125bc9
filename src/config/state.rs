// Application state module
// Shared, read-mostly state handed to every connection

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use super::types::Config;
use crate::logger::AccessLogFormat;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Parsed once so the per-request path does not re-read the pattern
    pub access_log_format: AccessLogFormat,
    pub active_connections: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let access_log_format = AccessLogFormat::parse(&config.logging.access_log_format);
        Self {
            config,
            access_log_format,
            active_connections: Arc::new(AtomicUsize::new(0)),
        }
    }
}
