//! Error types
//!
//! `FormError` is what a form handler can fail with and maps onto an HTTP
//! status. `ServerError` covers everything that can stop the process from
//! starting.

use hyper::StatusCode;
use thiserror::Error;

/// Failure while handling a form submission
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormError {
    /// Client sent incomplete data (400)
    #[error("{0}")]
    Validation(&'static str),

    /// Anything unexpected, message is echoed to the client (500)
    #[error("{0}")]
    Internal(String),
}

impl FormError {
    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Startup failure
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}

pub type Result<T, E = ServerError> = std::result::Result<T, E>;
