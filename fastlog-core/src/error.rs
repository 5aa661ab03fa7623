//! Error types for fastlog

use thiserror::Error;

/// Result type alias for fastlog operations
pub type Result<T> = std::result::Result<T, Error>;

/// fastlog error types
#[derive(Error, Debug)]
pub enum Error {
    /// Session construction failed; fatal to startup
    #[error("connect error: {0}")]
    Connect(String),

    /// Statement text rejected or backend unreachable during prepare
    #[error("prepare error: {0}")]
    Prepare(String),

    /// Backend failed while executing a statement
    #[error("execution error: {0}")]
    Execution(String),

    /// Backend failed while writing a measurement
    #[error("write error: {0}")]
    Write(String),

    /// Backend failed while reading a range
    #[error("read error: {0}")]
    Read(String),

    /// Prepared handle no longer valid; caller must re-prepare
    #[error("stale prepared statement handle")]
    StaleHandle,

    /// Row shape did not match the measurement schema
    #[error("decode error: column {column}: {reason}")]
    Decode { column: &'static str, reason: String },
}

impl Error {
    /// Check if the operation can be retried by the caller as-is
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Execution(_) | Error::Write(_) | Error::Read(_))
    }

    /// Check if the error requires re-preparing the statement
    pub fn is_stale_handle(&self) -> bool {
        matches!(self, Error::StaleHandle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_categories() {
        assert!(Error::Write("timeout".into()).is_retryable());
        assert!(Error::Read("timeout".into()).is_retryable());
        assert!(Error::Execution("overloaded".into()).is_retryable());
        assert!(!Error::StaleHandle.is_retryable());
        assert!(!Error::Connect("refused".into()).is_retryable());
        assert!(!Error::Decode { column: "time", reason: "missing".into() }.is_retryable());
    }

    #[test]
    fn test_stale_handle_predicate() {
        assert!(Error::StaleHandle.is_stale_handle());
        assert!(!Error::Prepare("bad text".into()).is_stale_handle());
    }
}
