//! Authenticated encryption of the database payload.
//!
//! ChaCha20-Poly1305 with a random 96-bit nonce per seal. The 16-byte
//! Poly1305 tag is appended to the ciphertext. Opening either yields the
//! full plaintext or fails as a whole.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use zeroize::Zeroizing;

use super::key::DerivedKey;
use super::random::generate_nonce;
use crate::error::{AlockError, Result};

/// Nonce length in bytes.
pub const NONCE_LENGTH: usize = 12;

/// Authentication tag length in bytes.
pub const TAG_LENGTH: usize = 16;

/// Output of [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_LENGTH],
    /// Ciphertext with the tag appended.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `key` with a freshly generated nonce.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> Result<Sealed> {
    let nonce = generate_nonce()?;
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| AlockError::Crypto("Encryption failed".to_string()))?;
    Ok(Sealed { nonce, ciphertext })
}

/// Authenticate and decrypt `ciphertext`.
///
/// # Errors
///
/// Returns `AlockError::Authentication` if the ciphertext, tag or nonce was
/// modified or the key is wrong. No plaintext is produced in that case.
pub fn open(
    ciphertext: &[u8],
    nonce: &[u8; NONCE_LENGTH],
    key: &DerivedKey,
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = ChaCha20Poly1305::new(Key::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| AlockError::Authentication)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(byte: u8) -> DerivedKey {
        DerivedKey::from_bytes([byte; 32])
    }

    #[test]
    fn test_seal_open_round_trip() {
        let plaintext = b"- Work\n  - GitHub\n";
        let sealed = seal(plaintext, &key(7)).unwrap();
        let opened = open(&sealed.ciphertext, &sealed.nonce, &key(7)).unwrap();
        assert_eq!(opened.as_slice(), plaintext);
    }

    #[test]
    fn test_empty_plaintext_round_trip() {
        let sealed = seal(b"", &key(1)).unwrap();
        assert_eq!(sealed.ciphertext.len(), TAG_LENGTH);
        let opened = open(&sealed.ciphertext, &sealed.nonce, &key(1)).unwrap();
        assert!(opened.is_empty());
    }

    #[test]
    fn test_ciphertext_carries_tag() {
        let sealed = seal(b"secret", &key(1)).unwrap();
        assert_eq!(sealed.ciphertext.len(), 6 + TAG_LENGTH);
        assert_ne!(&sealed.ciphertext[..6], b"secret");
    }

    #[test]
    fn test_resealing_uses_fresh_nonce() {
        let first = seal(b"same plaintext", &key(3)).unwrap();
        let second = seal(b"same plaintext", &key(3)).unwrap();
        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(b"secret", &key(1)).unwrap();
        let result = open(&sealed.ciphertext, &sealed.nonce, &key(2));
        assert!(matches!(result, Err(AlockError::Authentication)));
    }

    #[test]
    fn test_any_ciphertext_or_tag_bit_flip_fails() {
        let sealed = seal(b"hello", &key(9)).unwrap();
        for bit in 0..sealed.ciphertext.len() * 8 {
            let mut tampered = sealed.ciphertext.clone();
            tampered[bit / 8] ^= 1 << (bit % 8);
            let result = open(&tampered, &sealed.nonce, &key(9));
            assert!(
                matches!(result, Err(AlockError::Authentication)),
                "bit {} flip was not detected",
                bit
            );
        }
    }

    #[test]
    fn test_any_nonce_bit_flip_fails() {
        let sealed = seal(b"hello", &key(9)).unwrap();
        for bit in 0..NONCE_LENGTH * 8 {
            let mut nonce = sealed.nonce;
            nonce[bit / 8] ^= 1 << (bit % 8);
            let result = open(&sealed.ciphertext, &nonce, &key(9));
            assert!(matches!(result, Err(AlockError::Authentication)));
        }
    }

    #[test]
    fn test_truncated_ciphertext_fails() {
        let sealed = seal(b"hello", &key(9)).unwrap();
        let result = open(&sealed.ciphertext[..TAG_LENGTH - 1], &sealed.nonce, &key(9));
        assert!(matches!(result, Err(AlockError::Authentication)));
    }

    proptest::proptest! {
        #[test]
        fn prop_open_inverts_seal(
            plaintext in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..2048),
            key_bytes in proptest::prelude::any::<[u8; 32]>(),
        ) {
            let key = DerivedKey::from_bytes(key_bytes);
            let sealed = seal(&plaintext, &key).unwrap();
            proptest::prop_assert_eq!(sealed.ciphertext.len(), plaintext.len() + TAG_LENGTH);
            let opened = open(&sealed.ciphertext, &sealed.nonce, &key).unwrap();
            proptest::prop_assert_eq!(opened.as_slice(), plaintext.as_slice());
        }
    }
}
