//! # alock Core
//!
//! Core library for alock - a local, single-user encrypted credential store.
//!
//! A hierarchy of folders and credential entries is persisted to one file,
//! protected by a passphrase. This crate owns the persistence codec and is
//! independent of any user interface.
//!
//! ## Architecture
//!
//! - **model**: the in-memory folder/entry tree
//! - **codec**: tree ⇄ plaintext (indented text, tagged JSON)
//! - **crypto**: Argon2id key derivation and verifier, ChaCha20-Poly1305 sealing
//! - **storage**: file envelope, database read/write, editing session
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use alock_core::{read_database, write_database, Entry, Folder};
//!
//! let tree = Folder::root().with_child(Folder::new("Work").with_child(Entry::new("GitHub")));
//! write_database(Path::new("vault.alock"), "hunter2", &tree)?;
//! let loaded = read_database(Path::new("vault.alock"), "hunter2")?;
//! assert_eq!(loaded, tree);
//! # Ok::<(), alock_core::AlockError>(())
//! ```

pub mod codec;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod model;
pub mod storage;

pub use codec::{decode, encode};
pub use error::{AlockError, Result};
pub use model::{Entry, Folder, Node};
pub use storage::{read_database, write_database, PayloadFormat, Session, SessionState};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
