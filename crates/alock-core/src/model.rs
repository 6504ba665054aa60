//! In-memory folder/entry hierarchy.
//!
//! Every folder owns its children by value; there are no back-pointers.
//! Nodes are addressed by index paths from the root folder, where the empty
//! path denotes the root itself. Moving a node is an explicit
//! detach-then-attach transaction that either succeeds completely or leaves
//! the tree untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AlockError, Result};

/// A node in the tree: either a container or a single credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Folder(Folder),
    Entry(Entry),
}

impl Node {
    /// Display name of the node.
    pub fn name(&self) -> &str {
        match self {
            Node::Folder(folder) => &folder.name,
            Node::Entry(entry) => &entry.name,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Entry(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Node::Folder(folder) => Some(folder),
            Node::Entry(_) => None,
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match self {
            Node::Entry(entry) => Some(entry),
            Node::Folder(_) => None,
        }
    }

    pub fn as_entry_mut(&mut self) -> Option<&mut Entry> {
        match self {
            Node::Entry(entry) => Some(entry),
            Node::Folder(_) => None,
        }
    }
}

impl From<Folder> for Node {
    fn from(folder: Folder) -> Self {
        Node::Folder(folder)
    }
}

impl From<Entry> for Node {
    fn from(entry: Entry) -> Self {
        Node::Entry(entry)
    }
}

/// A container of ordered child nodes.
///
/// `is_open` is an expand/collapse hint for tree views. It is not persisted
/// and does not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Folder {
    pub name: String,
    #[serde(default)]
    pub children: Vec<Node>,
    #[serde(skip, default = "default_open")]
    pub is_open: bool,
}

fn default_open() -> bool {
    true
}

impl Default for Folder {
    fn default() -> Self {
        Self {
            name: String::new(),
            children: Vec::new(),
            is_open: true,
        }
    }
}

impl PartialEq for Folder {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.children == other.children
    }
}

impl Eq for Folder {}

/// A single credential record.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    pub username: String,
    #[serde(rename = "password")]
    pub secret: String,
    pub url: String,
    pub notes: String,
}

impl Entry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// True when all five fields are empty (a just-created placeholder).
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
            && self.username.is_empty()
            && self.secret.is_empty()
            && self.url.is_empty()
            && self.notes.is_empty()
    }

    fn validate(&self) -> Result<()> {
        check_single_line("entry name", &self.name)?;
        check_single_line("username", &self.username)?;
        check_single_line("password", &self.secret)?;
        check_single_line("url", &self.url)?;
        check_no_nul("notes", &self.notes)?;
        if self.notes.contains('\r') {
            return Err(AlockError::InvalidInput(
                "notes must use \\n line breaks".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("secret", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &self.notes)
            .finish()
    }
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The implicit, unnamed root folder.
    pub fn root() -> Self {
        Self::default()
    }

    /// Builder-style append.
    pub fn with_child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append a child and return its index.
    pub fn push(&mut self, node: impl Into<Node>) -> usize {
        self.children.push(node.into());
        self.children.len() - 1
    }

    /// Insert a child at `index` (which may equal the current length).
    pub fn insert(&mut self, index: usize, node: impl Into<Node>) -> Result<()> {
        if index > self.children.len() {
            return Err(AlockError::InvalidInput(format!(
                "Insert position {} out of range (folder has {} children)",
                index,
                self.children.len()
            )));
        }
        self.children.insert(index, node.into());
        Ok(())
    }

    pub fn get(&self, path: &[usize]) -> Option<&Node> {
        let (last, parents) = path.split_last()?;
        self.folder(parents)?.children.get(*last)
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (last, parents) = path.split_last()?;
        self.folder_mut(parents)?.children.get_mut(*last)
    }

    /// Folder at `path`; the empty path is `self`.
    pub fn folder(&self, path: &[usize]) -> Option<&Folder> {
        let mut current = self;
        for &index in path {
            current = current.children.get(index)?.as_folder()?;
        }
        Some(current)
    }

    pub fn folder_mut(&mut self, path: &[usize]) -> Option<&mut Folder> {
        let mut current = self;
        for &index in path {
            current = current.children.get_mut(index)?.as_folder_mut()?;
        }
        Some(current)
    }

    /// Detach the node at `path` and hand ownership to the caller.
    pub fn remove(&mut self, path: &[usize]) -> Result<Node> {
        let (&last, parents) = path
            .split_last()
            .ok_or_else(|| AlockError::InvalidInput("Cannot remove the root folder".to_string()))?;
        let parent = self
            .folder_mut(parents)
            .ok_or_else(|| AlockError::NotFound(format!("No folder at {:?}", parents)))?;
        if last >= parent.children.len() {
            return Err(AlockError::NotFound(format!("No node at {:?}", path)));
        }
        Ok(parent.children.remove(last))
    }

    /// Move the node at `from` into the folder at `to_folder`.
    ///
    /// `index` is the position inside the destination after the move; `None`
    /// appends. Returns the node's new path. On error the tree is unchanged.
    pub fn move_node(
        &mut self,
        from: &[usize],
        to_folder: &[usize],
        index: Option<usize>,
    ) -> Result<Vec<usize>> {
        let (&from_last, from_parent) = from
            .split_last()
            .ok_or_else(|| AlockError::InvalidInput("Cannot move the root folder".to_string()))?;
        if to_folder.starts_with(from) {
            return Err(AlockError::InvalidInput(
                "Cannot move a folder into itself or one of its descendants".to_string(),
            ));
        }
        if self.get(from).is_none() {
            return Err(AlockError::NotFound(format!("No node at {:?}", from)));
        }
        let dest_len = self
            .folder(to_folder)
            .map(|folder| folder.children.len())
            .ok_or_else(|| AlockError::NotFound(format!("No folder at {:?}", to_folder)))?;

        // Detaching shifts later siblings of `from` one slot to the left.
        let mut target = to_folder.to_vec();
        let depth = from_parent.len();
        if target.len() > depth && target.starts_with(from_parent) && target[depth] > from_last {
            target[depth] -= 1;
        }
        let capacity = if to_folder == from_parent {
            dest_len - 1
        } else {
            dest_len
        };
        let index = index.unwrap_or(capacity);
        if index > capacity {
            return Err(AlockError::InvalidInput(format!(
                "Destination position {} out of range (max {})",
                index, capacity
            )));
        }

        let node = self.remove(from)?;
        match self.folder_mut(&target) {
            Some(folder) => folder.children.insert(index, node),
            None => {
                if let Some(parent) = self.folder_mut(from_parent) {
                    parent.children.insert(from_last, node);
                }
                return Err(AlockError::NotFound(format!("No folder at {:?}", to_folder)));
            }
        }
        target.push(index);
        Ok(target)
    }

    /// Move the node at `path` to `new_index` among its siblings.
    pub fn reorder(&mut self, path: &[usize], new_index: usize) -> Result<()> {
        let (&last, parents) = path
            .split_last()
            .ok_or_else(|| AlockError::InvalidInput("Cannot reorder the root folder".to_string()))?;
        let parent = self
            .folder_mut(parents)
            .ok_or_else(|| AlockError::NotFound(format!("No folder at {:?}", parents)))?;
        let len = parent.children.len();
        if last >= len {
            return Err(AlockError::NotFound(format!("No node at {:?}", path)));
        }
        if new_index >= len {
            return Err(AlockError::InvalidInput(format!(
                "Position {} out of range (folder has {} children)",
                new_index, len
            )));
        }
        let node = parent.children.remove(last);
        parent.children.insert(new_index, node);
        Ok(())
    }

    /// Resolve a sequence of names to an index path (first match wins).
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Option<Vec<usize>> {
        let mut path = Vec::with_capacity(names.len());
        let mut current = self;
        for (depth, name) in names.iter().enumerate() {
            let index = current
                .children
                .iter()
                .position(|child| child.name() == name.as_ref())?;
            path.push(index);
            if depth + 1 < names.len() {
                current = current.children[index].as_folder()?;
            }
        }
        Some(path)
    }

    /// Number of entries anywhere below this folder.
    pub fn entry_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::Folder(folder) => folder.entry_count(),
                Node::Entry(_) => 1,
            })
            .sum()
    }

    /// Number of folders anywhere below this folder.
    pub fn folder_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Node::Folder(folder) => 1 + folder.folder_count(),
                Node::Entry(_) => 0,
            })
            .sum()
    }

    /// Check that every name and value can be written by the text codec and
    /// read back unchanged: no NUL, single-line fields without line breaks
    /// or surrounding whitespace.
    pub fn validate(&self) -> Result<()> {
        check_single_line("folder name", &self.name)?;
        for child in &self.children {
            match child {
                Node::Folder(folder) => folder.validate()?,
                Node::Entry(entry) => entry.validate()?,
            }
        }
        Ok(())
    }
}

fn check_no_nul(what: &str, value: &str) -> Result<()> {
    if value.contains('\0') {
        return Err(AlockError::InvalidInput(format!(
            "{} contains a NUL character",
            what
        )));
    }
    Ok(())
}

fn check_single_line(what: &str, value: &str) -> Result<()> {
    check_no_nul(what, value)?;
    if value.contains(|c| c == '\n' || c == '\r') {
        return Err(AlockError::InvalidInput(format!(
            "{} must be a single line",
            what
        )));
    }
    // The text grammar trims names and values when reading them back.
    if value.trim() != value {
        return Err(AlockError::InvalidInput(format!(
            "{} has leading or trailing whitespace",
            what
        )));
    }
    Ok(())
}
