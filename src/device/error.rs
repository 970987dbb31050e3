//! I/O error types for the device module.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for device operations.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur during device I/O.
#[derive(Debug, Error)]
pub enum IoError {
    /// Standard I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying error.
        #[from]
        source: io::Error,
    },

    /// File not found.
    #[error("file not found: {path}")]
    NotFound {
        /// Path of the missing file.
        path: PathBuf,
    },

    /// Permission denied.
    #[error("permission denied: {path}")]
    PermissionDenied {
        /// Path that could not be accessed.
        path: PathBuf,
    },

    /// File already exists.
    #[error("file already exists: {path}")]
    AlreadyExists {
        /// Path that already exists.
        path: PathBuf,
    },

    /// Short read/write (less data than expected).
    #[error("short {operation}: expected {expected} bytes, got {actual}")]
    ShortIo {
        /// Which operation came up short.
        operation: &'static str,
        /// Bytes requested.
        expected: usize,
        /// Bytes transferred.
        actual: usize,
    },

    /// Access past the end of a fixed-capacity device.
    #[error("out of range: {len} bytes at offset {offset} exceeds capacity {capacity}")]
    OutOfRange {
        /// Requested offset.
        offset: u64,
        /// Requested length.
        len: usize,
        /// Device capacity in bytes.
        capacity: u64,
    },

    /// Invalid operation for the device's open mode.
    #[error("invalid operation: {operation} not allowed in {mode} mode")]
    InvalidOperation {
        /// The rejected operation.
        operation: &'static str,
        /// The mode that rejected it.
        mode: &'static str,
    },
}

impl IoError {
    /// Creates a ShortIo error for reads.
    pub fn short_read(expected: usize, actual: usize) -> Self {
        Self::ShortIo {
            operation: "read",
            expected,
            actual,
        }
    }

    /// Creates a ShortIo error for writes.
    pub fn short_write(expected: usize, actual: usize) -> Self {
        Self::ShortIo {
            operation: "write",
            expected,
            actual,
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
            || matches!(self, Self::Io { source } if source.kind() == io::ErrorKind::NotFound)
    }

    /// Converts from `std::io::Error` with path context.
    pub fn from_io_with_path(err: io::Error, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound { path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            io::ErrorKind::AlreadyExists => Self::AlreadyExists { path },
            _ => Self::Io { source: err },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_from_io() {
        let std_err = io::Error::new(io::ErrorKind::NotFound, "gone");
        let err = IoError::from_io_with_path(std_err, "/tmp/cache.img");
        assert!(err.is_not_found());
    }

    #[test]
    fn short_io_fields() {
        let err = IoError::short_read(100, 50);
        assert!(matches!(
            err,
            IoError::ShortIo {
                operation: "read",
                expected: 100,
                actual: 50
            }
        ));
    }

    #[test]
    fn messages() {
        let err = IoError::OutOfRange {
            offset: 96,
            len: 64,
            capacity: 128,
        };
        assert_eq!(
            err.to_string(),
            "out of range: 64 bytes at offset 96 exceeds capacity 128"
        );
    }
}
