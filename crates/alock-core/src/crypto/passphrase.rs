//! Passphrase validation.

use crate::error::{AlockError, Result};

/// Validate a newly chosen passphrase.
///
/// A passphrase must not be empty or consist only of whitespace. Existing
/// databases are opened with whatever passphrase the caller supplies; this
/// check only applies when a passphrase is being set.
///
/// # Examples
///
/// ```
/// use alock_core::crypto::validate_passphrase;
///
/// assert!(validate_passphrase("hunter2").is_ok());
/// assert!(validate_passphrase("   ").is_err());
/// ```
pub fn validate_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.trim().is_empty() {
        return Err(AlockError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_passphrase() {
        assert!(validate_passphrase("hunter2").is_ok());
        assert!(validate_passphrase("longer passphrase with spaces and symbols!@#").is_ok());
    }

    #[test]
    fn test_passphrase_empty() {
        assert!(validate_passphrase("").is_err());
        assert!(validate_passphrase("   ").is_err());
        assert!(validate_passphrase("\n\t").is_err());
    }
}
