//! OS-backed randomness for salts and nonces.

use crate::crypto::cipher::NONCE_LENGTH;
use crate::error::{AlockError, Result};

/// Length of the encryption salt stored in the file header.
pub const SALT_LENGTH: usize = 16;

/// Fill a fixed-size array from the operating system RNG.
pub fn random_bytes<const N: usize>() -> Result<[u8; N]> {
    let mut bytes = [0u8; N];
    getrandom::getrandom(&mut bytes)
        .map_err(|e| AlockError::Crypto(format!("Failed to gather random bytes: {}", e)))?;
    Ok(bytes)
}

/// Fresh random encryption salt.
pub fn generate_salt() -> Result<[u8; SALT_LENGTH]> {
    random_bytes()
}

/// Fresh random AEAD nonce. Every key is used for exactly one nonce.
pub fn generate_nonce() -> Result<[u8; NONCE_LENGTH]> {
    random_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salts_differ() {
        let a = generate_salt().unwrap();
        let b = generate_salt().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_nonce_length() {
        assert_eq!(generate_nonce().unwrap().len(), 12);
    }
}
