//! Passphrase verifier hashes.
//!
//! The verifier is a self-describing Argon2id PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`) carrying its own random
//! salt. It is only ever used to test a passphrase; the encryption key is
//! derived separately from an independent salt, so a leaked verifier does
//! not reveal the key.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use super::key::KdfParams;
use super::random::random_bytes;
use crate::error::{AlockError, Result};

/// Length of the verifier's embedded salt in bytes.
const VERIFIER_SALT_LENGTH: usize = 16;

/// Argon2 version 0x13.
const VERSION: u32 = 19;

/// Default Argon2 output length used by the PHC hash.
const HASH_LENGTH: usize = 32;

/// Hash `passphrase` into a fresh verifier string.
pub fn derive_verifier(passphrase: &str) -> Result<String> {
    if passphrase.is_empty() {
        return Err(AlockError::InvalidInput(
            "Passphrase cannot be empty".to_string(),
        ));
    }

    let salt_bytes: [u8; VERIFIER_SALT_LENGTH] = random_bytes()?;
    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| AlockError::Crypto(format!("Failed to encode verifier salt: {}", e)))?;

    let argon2 = KdfParams::MODERATE.argon2(None)?;
    let hash = argon2
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| AlockError::Crypto(format!("Verifier hashing failed: {}", e)))?;

    Ok(hash.to_string())
}

/// Check `passphrase` against a stored verifier.
///
/// Returns `false` for a mismatch and for any verifier that
/// [`is_well_formed`] rejects; such a verifier is never hashed.
pub fn verify(verifier: &str, passphrase: &str) -> bool {
    let Some(parsed) = parse_accepted(verifier) else {
        tracing::debug!("stored verifier rejected before hashing");
        return false;
    };
    let argon2 = match KdfParams::MODERATE.argon2(None) {
        Ok(argon2) => argon2,
        Err(_) => return false,
    };
    argon2
        .verify_password(passphrase.as_bytes(), &parsed)
        .is_ok()
}

/// True when `verifier` is an Argon2id v19 PHC string at the fixed cost tier
/// with a salt and a 32-byte hash.
///
/// The header is unauthenticated, so the cost parameters are never taken
/// from the file.
pub fn is_well_formed(verifier: &str) -> bool {
    parse_accepted(verifier).is_some()
}

fn parse_accepted(verifier: &str) -> Option<PasswordHash<'_>> {
    let hash = PasswordHash::new(verifier).ok()?;
    let expected = KdfParams::MODERATE;
    let accepted = hash.algorithm.as_str() == "argon2id"
        && hash.version == Some(VERSION)
        && hash.params.iter().count() == 3
        && hash.params.get_decimal("m") == Some(expected.memory_kib)
        && hash.params.get_decimal("t") == Some(expected.iterations)
        && hash.params.get_decimal("p") == Some(expected.parallelism)
        && hash.salt.is_some()
        && hash.hash.map(|output| output.len()) == Some(HASH_LENGTH);
    accepted.then_some(hash)
}
