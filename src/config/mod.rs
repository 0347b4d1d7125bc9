// Configuration module entry point
// Layers defaults, an optional config file and FRONTDESK_* environment variables

mod state;
mod types;

use std::net::SocketAddr;

use crate::error::{Result, ServerError};

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, StaticFilesConfig,
    DEFAULT_INDEX_FILE, DEFAULT_MAX_BODY_SIZE, DEFAULT_PORT,
};

use types::{
    DEFAULT_ACCESS_LOG_FORMAT, DEFAULT_HOST, DEFAULT_LOG_LEVEL, DEFAULT_REQUEST_TIMEOUT,
    DEFAULT_SERVER_NAME, DEFAULT_STATIC_ROOT,
};

/// Environment variable prefix, e.g. `FRONTDESK_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "FRONTDESK";

impl Config {
    /// Load configuration from specified file path (without extension)
    pub fn load_from(config_path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("static_files.root", DEFAULT_STATIC_ROOT)?
            .set_default("static_files.index_file", DEFAULT_INDEX_FILE)?
            .set_default("http.server_name", DEFAULT_SERVER_NAME)?
            .set_default("http.enable_cors", true)?
            .set_default("http.max_body_size", DEFAULT_MAX_BODY_SIZE as u64)?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.request_timeout", DEFAULT_REQUEST_TIMEOUT)?
            .set_default("logging.level", DEFAULT_LOG_LEVEL)?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", DEFAULT_ACCESS_LOG_FORMAT)?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| ServerError::Address { addr, source })
    }
}
