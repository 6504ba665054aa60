//! Single-user editing session over one database file.
//!
//! ```text
//! NoFile ──new_database──▶ New ──tree_mut──▶ UnsavedNew ──save_as──▶ Bound
//!    │                                                                │ ▲
//!    └──────────────────────────── open ─────────────────────────────▶│ └─ save
//! ```
//!
//! The passphrase is kept for the life of the binding so later saves need
//! no prompt. It lives in a [`SecretString`], which zeroizes on drop, and is
//! dropped by [`Session::close`] and [`Session::new_database`].

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AlockError, Result};
use crate::model::Folder;
use crate::storage::database::{read_database_with_format, write_database_with_format};
use crate::storage::envelope::PayloadFormat;

/// Observable lifecycle state of a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No tree loaded.
    NoFile,
    /// Fresh empty tree, not yet edited or saved.
    New,
    /// Fresh tree with edits but no file yet.
    UnsavedNew,
    /// Tree bound to a file and passphrase.
    Bound,
}

struct Binding {
    path: PathBuf,
    passphrase: SecretString,
    format: PayloadFormat,
}

/// Editing session: one tree, at most one bound file.
#[derive(Default)]
pub struct Session {
    tree: Option<Folder>,
    binding: Option<Binding>,
    dirty: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        match (&self.tree, &self.binding) {
            (None, _) => SessionState::NoFile,
            (Some(_), Some(_)) => SessionState::Bound,
            (Some(_), None) if self.dirty => SessionState::UnsavedNew,
            (Some(_), None) => SessionState::New,
        }
    }

    /// Discard everything and start an empty, unbound tree.
    pub fn new_database(&mut self) {
        self.binding = None;
        self.tree = Some(Folder::root());
        self.dirty = false;
    }

    pub fn tree(&self) -> Option<&Folder> {
        self.tree.as_ref()
    }

    /// Mutable access to the tree; marks the session as having unsaved edits.
    pub fn tree_mut(&mut self) -> Result<&mut Folder> {
        let tree = self
            .tree
            .as_mut()
            .ok_or_else(|| AlockError::InvalidInput("No database is open".to_string()))?;
        self.dirty = true;
        Ok(tree)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> Option<&Path> {
        self.binding.as_ref().map(|binding| binding.path.as_path())
    }

    pub fn format(&self) -> PayloadFormat {
        self.binding
            .as_ref()
            .map(|binding| binding.format)
            .unwrap_or_default()
    }

    /// Write the tree to `path` under a newly chosen passphrase and bind to it.
    pub fn save_as(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        self.save_as_with_format(path, passphrase, self.format())
    }

    pub fn save_as_with_format(
        &mut self,
        path: &Path,
        passphrase: &str,
        format: PayloadFormat,
    ) -> Result<()> {
        let tree = self
            .tree
            .as_ref()
            .ok_or_else(|| AlockError::InvalidInput("No database is open".to_string()))?;
        write_database_with_format(path, passphrase, tree, format)?;
        self.binding = Some(Binding {
            path: path.to_path_buf(),
            passphrase: SecretString::from(passphrase.to_string()),
            format,
        });
        self.dirty = false;
        Ok(())
    }

    /// Re-save to the bound file with the cached passphrase.
    pub fn save(&mut self) -> Result<()> {
        let (Some(tree), Some(binding)) = (&self.tree, &self.binding) else {
            return Err(AlockError::InvalidInput(
                "No file is bound to this session; use save as".to_string(),
            ));
        };
        write_database_with_format(
            &binding.path,
            binding.passphrase.expose_secret(),
            tree,
            binding.format,
        )?;
        self.dirty = false;
        Ok(())
    }

    /// Load `path`, replacing the current tree only if decoding succeeds.
    pub fn open(&mut self, path: &Path, passphrase: &str) -> Result<()> {
        let (tree, format) = read_database_with_format(path, passphrase)?;
        self.tree = Some(tree);
        self.binding = Some(Binding {
            path: path.to_path_buf(),
            passphrase: SecretString::from(passphrase.to_string()),
            format,
        });
        self.dirty = false;
        Ok(())
    }

    /// Re-encrypt the bound file under `new_passphrase`.
    pub fn change_passphrase(&mut self, new_passphrase: &str) -> Result<()> {
        let (Some(tree), Some(binding)) = (&self.tree, &mut self.binding) else {
            return Err(AlockError::InvalidInput(
                "No file is bound to this session".to_string(),
            ));
        };
        write_database_with_format(&binding.path, new_passphrase, tree, binding.format)?;
        binding.passphrase = SecretString::from(new_passphrase.to_string());
        self.dirty = false;
        Ok(())
    }

    /// Forget the tree and the cached passphrase.
    pub fn close(&mut self) {
        self.binding = None;
        self.tree = None;
        self.dirty = false;
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("path", &self.path())
            .field("dirty", &self.dirty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Entry;
    use tempfile::tempdir;

    #[test]
    fn test_lifecycle_new_edit_save_as_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.alock");
        let mut session = Session::new();
        assert_eq!(session.state(), SessionState::NoFile);
        assert!(session.tree_mut().is_err());
        assert!(session.save().is_err());

        session.new_database();
        assert_eq!(session.state(), SessionState::New);

        session.tree_mut().unwrap().push(Folder::new("Work"));
        assert_eq!(session.state(), SessionState::UnsavedNew);
        assert!(session.save().is_err(), "save needs a bound file");

        session.save_as(&path, "hunter2").unwrap();
        assert_eq!(session.state(), SessionState::Bound);
        assert_eq!(session.path(), Some(path.as_path()));
        assert!(!session.is_dirty());

        let first = std::fs::read(&path).unwrap();
        session.tree_mut().unwrap().push(Entry::new("GitHub"));
        assert_eq!(session.state(), SessionState::Bound);
        session.save().unwrap();
        let second = std::fs::read(&path).unwrap();
        assert_ne!(first[8..], second[8..], "salts and nonce are regenerated");

        let mut other = Session::new();
        other.open(&path, "hunter2").unwrap();
        assert_eq!(other.tree(), session.tree());
    }

    #[test]
    fn test_failed_open_leaves_session_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.alock");
        let mut session = Session::new();
        session.new_database();
        session.tree_mut().unwrap().push(Folder::new("Keep"));
        session.save_as(&path, "right").unwrap();

        let mut second = Session::new();
        second.new_database();
        second.tree_mut().unwrap().push(Folder::new("Unsaved"));
        let result = second.open(&path, "wrong");
        assert!(matches!(result, Err(AlockError::IncorrectPassphrase)));
        assert_eq!(second.state(), SessionState::UnsavedNew);
        assert_eq!(second.tree().unwrap().children[0].name(), "Unsaved");
    }

    #[test]
    fn test_change_passphrase_rekeys_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.alock");
        let mut session = Session::new();
        session.new_database();
        session.save_as(&path, "old").unwrap();

        session.change_passphrase("new").unwrap();

        let mut reopened = Session::new();
        assert!(matches!(
            reopened.open(&path, "old"),
            Err(AlockError::IncorrectPassphrase)
        ));
        reopened.open(&path, "new").unwrap();
        assert_eq!(reopened.state(), SessionState::Bound);
    }

    #[test]
    fn test_close_forgets_everything() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.alock");
        let mut session = Session::new();
        session.new_database();
        session.save_as(&path, "hunter2").unwrap();

        session.close();
        assert_eq!(session.state(), SessionState::NoFile);
        assert!(session.path().is_none());
        assert!(session.tree().is_none());
    }

    #[test]
    fn test_json_format_sticks_to_binding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("vault.alock");
        let mut session = Session::new();
        session.new_database();
        session
            .save_as_with_format(&path, "hunter2", PayloadFormat::Json)
            .unwrap();
        session.save().unwrap();
        assert_eq!(&std::fs::read(&path).unwrap()[..8], b"ALOCK_J1");

        let mut reopened = Session::new();
        reopened.open(&path, "hunter2").unwrap();
        assert_eq!(reopened.format(), PayloadFormat::Json);
    }
}
