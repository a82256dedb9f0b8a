//! Error types for discfs

use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by disc access operations
///
/// None of these are fatal: callers decide whether a missing path or an
/// unreadable medium aborts their own operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Path absent on every attempted source
    #[error("path not found: {0}")]
    NotFound(String),

    /// Medium could not be detected as a directory or a parsable image
    #[error("no usable backend for this medium")]
    BackendUnavailable,

    /// Operation not supported by this handle variant
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),

    /// Declared file size outside what whole-file reads accept
    #[error("unreasonable size {size} for file {path}")]
    FileSize { path: String, size: u64 },

    /// Configuration file problem
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True when the error means "not present", as opposed to a hard failure
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(Error::NotFound("BDMV/index.bdmv".into()).is_not_found());
        assert!(Error::Io(std::io::Error::from(std::io::ErrorKind::NotFound)).is_not_found());
        assert!(!Error::BackendUnavailable.is_not_found());
    }
}
