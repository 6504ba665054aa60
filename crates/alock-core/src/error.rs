//! Error types for alock core operations.
//!
//! Every failure of the persistence codec is an ordinary value of
//! [`AlockError`]. The host application decides how to present them; the
//! core only guarantees that the variants stay distinct so a wrong
//! passphrase is never confused with a damaged file.

use thiserror::Error;

/// Result type alias for alock operations.
pub type Result<T> = std::result::Result<T, AlockError>;

/// Core error type for alock operations.
#[derive(Debug, Error)]
pub enum AlockError {
    /// Unknown magic, truncated header or malformed header field
    #[error("Format error: {0}")]
    Format(String),

    /// Passphrase did not match the stored verifier
    #[error("Incorrect passphrase")]
    IncorrectPassphrase,

    /// Authenticated decryption failed (corrupted file or wrong key)
    #[error("Authentication failed: database is corrupted or has been tampered with")]
    Authentication,

    /// Decrypted payload is not a well-formed tree
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Filesystem failure
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Failure inside a cryptographic primitive
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Invalid caller input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Tree lookup failed
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AlockError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> Self {
        AlockError::Parse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_mentions_line() {
        let err = AlockError::parse(7, "field line before any item");
        assert_eq!(
            err.to_string(),
            "Parse error at line 7: field line before any item"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AlockError = io.into();
        assert!(matches!(err, AlockError::Io { .. }));
    }
}
