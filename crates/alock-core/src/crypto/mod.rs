//! Cryptographic operations for alock.
//!
//! This module provides key derivation, passphrase verification and
//! authenticated encryption using well-audited libraries:
//! - **Argon2id**: memory-hard key derivation and verifier hashing
//! - **ChaCha20-Poly1305**: authenticated encryption of the payload
//!
//! ## Security Model
//!
//! - Two independent salts per save: one embedded in the verifier hash, one
//!   for key derivation
//! - A wrong passphrase is rejected by the verifier before any key is derived
//! - Derived keys and decrypted plaintext are zeroized from memory on drop
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft of the database file
//! - Offline brute-force attacks on the passphrase
//! - Tampering with the stored ciphertext
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to an unlocked session / memory

pub mod cipher;
pub mod key;
pub mod passphrase;
pub mod random;
pub mod verifier;

pub use cipher::{open, seal, Sealed, NONCE_LENGTH, TAG_LENGTH};
pub use key::{derive_key, DerivedKey, KdfParams, KEY_LENGTH};
pub use passphrase::validate_passphrase;
pub use random::{generate_nonce, generate_salt, SALT_LENGTH};
pub use verifier::{derive_verifier, verify};
