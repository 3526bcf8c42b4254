//! Startup and lifecycle errors
//!
//! Request handling never fails with these: every request outcome is an HTTP
//! response. They cover what can stop the server from coming up.

use std::net::SocketAddr;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to open log files: {0}")]
    Logging(#[source] std::io::Error),

    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
