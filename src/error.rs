//! Server error types
//!
//! All fallible operations on the server surface return `ServerError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Port outside the valid [1, 65535] range, or not a number at all.
    #[error("port must be between 1 and 65535 (got '{0}')")]
    InvalidPort(String),

    /// `start()` was called while the server is already running.
    #[error("server is already running")]
    AlreadyRunning,

    /// The host/port pair did not resolve to any socket address.
    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    /// Binding or listening on the resolved address failed.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    /// I/O failure while serving, e.g. the listener broke underneath us.
    #[error("server I/O error: {0}")]
    Runtime(#[from] std::io::Error),
}
