//! Cache-level errors.

use thiserror::Error;

use crate::device::IoError;

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors surfaced by cache operations.
///
/// Device failures are never recovered internally; they propagate to the
/// caller of `read`/`write`/`flush`, which decides whether to retry or
/// abort.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Invalid configuration.
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong with the configuration.
        message: String,
    },

    /// I/O failure on the cache or backing device.
    #[error("device I/O error: {0}")]
    Io(#[from] IoError),
}

impl CacheError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
