//! Reading and writing encrypted database files.
//!
//! Save: tree → plaintext → seal under a freshly derived key → envelope →
//! atomic replace. Open: envelope → verifier check → key derivation →
//! authenticated decrypt → tree. Each step fails with its own error
//! variant and nothing after a failed step is attempted.

use std::fs;
use std::path::Path;

use argon2::password_hash::PasswordHash;

use crate::crypto::{self, derive_key, derive_verifier, generate_salt, validate_passphrase};
use crate::error::{AlockError, Result};
use crate::fs::write_atomic;
use crate::model::Folder;
use crate::storage::envelope::{Envelope, PayloadFormat, HEADER_LENGTH};

/// Encrypt `tree` under `passphrase` and write it to `path` in the text format.
pub fn write_database(path: &Path, passphrase: &str, tree: &Folder) -> Result<()> {
    write_database_with_format(path, passphrase, tree, PayloadFormat::Text)
}

/// Encrypt `tree` under `passphrase` and write it to `path`.
///
/// Both the verifier salt and the encryption salt are regenerated on every
/// call, so the file never reuses a key or nonce across saves. The
/// destination is replaced atomically; on error any existing file is left
/// as it was.
pub fn write_database_with_format(
    path: &Path,
    passphrase: &str,
    tree: &Folder,
    format: PayloadFormat,
) -> Result<()> {
    validate_passphrase(passphrase)?;

    let plaintext = zeroize::Zeroizing::new(format.encode(tree)?);
    let verifier = derive_verifier(passphrase)?;
    let salt = generate_salt()?;
    let key = derive_key(passphrase, &salt)?;
    let sealed = crypto::seal(&plaintext, &key)?;

    let envelope = Envelope {
        format,
        verifier,
        salt,
        nonce: sealed.nonce,
        ciphertext: sealed.ciphertext,
    };
    write_atomic(path, &envelope.to_bytes()?)?;

    tracing::info!(
        path = %path.display(),
        %format,
        entries = tree.entry_count(),
        folders = tree.folder_count(),
        "database written"
    );
    Ok(())
}

/// Read and decrypt the database at `path`.
///
/// # Errors
///
/// - `AlockError::Io` if the file cannot be read
/// - `AlockError::Format` if the header is not an alock header
/// - `AlockError::IncorrectPassphrase` if the verifier rejects `passphrase`
///   (no key derivation or decryption is attempted)
/// - `AlockError::Authentication` if the ciphertext fails authentication
/// - `AlockError::Parse` if the decrypted payload is not a valid tree
pub fn read_database(path: &Path, passphrase: &str) -> Result<Folder> {
    read_database_with_format(path, passphrase).map(|(tree, _)| tree)
}

/// Like [`read_database`], also reporting which payload format the file uses.
pub fn read_database_with_format(path: &Path, passphrase: &str) -> Result<(Folder, PayloadFormat)> {
    let bytes = fs::read(path)?;
    let envelope = Envelope::parse(&bytes)?;

    if !crypto::verify(&envelope.verifier, passphrase) {
        tracing::debug!(path = %path.display(), "passphrase rejected by verifier");
        return Err(AlockError::IncorrectPassphrase);
    }

    let key = derive_key(passphrase, &envelope.salt)?;
    let plaintext = crypto::open(&envelope.ciphertext, &envelope.nonce, &key)?;
    let tree = envelope.format.decode(&plaintext)?;

    tracing::info!(
        path = %path.display(),
        format = %envelope.format,
        entries = tree.entry_count(),
        "database opened"
    );
    Ok((tree, envelope.format))
}

/// Header summary of a database file, readable without the passphrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseInfo {
    pub format: PayloadFormat,
    /// Verifier algorithm identifier, e.g. `argon2id`.
    pub algorithm: String,
    /// Verifier cost parameters, e.g. `m=65536,t=3,p=1`.
    pub params: String,
    pub file_len: usize,
    pub ciphertext_len: usize,
}

/// Parse the header of the database at `path` without decrypting anything.
pub fn inspect_database(path: &Path) -> Result<DatabaseInfo> {
    let bytes = fs::read(path)?;
    let envelope = Envelope::parse(&bytes)?;
    let hash = PasswordHash::new(&envelope.verifier)
        .map_err(|e| AlockError::Format(format!("Malformed verifier: {}", e)))?;

    Ok(DatabaseInfo {
        format: envelope.format,
        algorithm: hash.algorithm.to_string(),
        params: hash.params.to_string(),
        file_len: bytes.len(),
        ciphertext_len: bytes.len() - HEADER_LENGTH,
    })
}
