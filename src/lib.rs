//! frontdesk
//!
//! Serves a static front-end from a single directory and accepts two JSON
//! form submissions (`POST /signin`, `POST /contact`) that are validated,
//! logged, and acknowledged.

pub mod config;
pub mod error;
pub mod forms;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use crate::config::{AppState, Config};
pub use crate::error::{FormError, ServerError};
