//! Indented plaintext encoding of the tree.
//!
//! ```text
//! - Work
//!   - GitHub
//!     name: GitHub
//!     username: u
//!     password: p
//!     url: https://x
//!     notes: |
//!       line1
//!       line2
//! ```
//!
//! Each item is a `- name` line indented two spaces per level. An entry's
//! fields follow at one level deeper and its note lines one level deeper
//! still. Folders and entries are told apart only by the presence of a
//! non-empty field record; there is no type tag.

use std::fmt::Write as _;

use crate::error::{AlockError, Result};
use crate::model::{Entry, Folder, Node};

const INDENT: &str = "  ";

const HEADER: &str = "\
# alock password database
# Format: - Item Name
#   field: value
#   notes: |
#     line 1
#     line 2

";

/// Encode the children of `root` as canonical text.
pub fn encode(root: &Folder) -> Vec<u8> {
    let mut out = String::from(HEADER);
    for child in &root.children {
        encode_node(&mut out, child, 0);
    }
    out.into_bytes()
}

fn encode_node(out: &mut String, node: &Node, depth: usize) {
    push_line(out, depth, &format!("- {}", node.name()));
    match node {
        Node::Entry(entry) => {
            if !entry.is_empty() {
                encode_fields(out, entry, depth + 1);
            }
        }
        Node::Folder(folder) => {
            for child in &folder.children {
                encode_node(out, child, depth + 1);
            }
        }
    }
}

fn encode_fields(out: &mut String, entry: &Entry, depth: usize) {
    push_line(out, depth, &format!("name: {}", entry.name));
    push_line(out, depth, &format!("username: {}", entry.username));
    push_line(out, depth, &format!("password: {}", entry.secret));
    push_line(out, depth, &format!("url: {}", entry.url));
    push_line(out, depth, "notes: |");
    for line in entry.notes.split('\n') {
        push_line(out, depth + 1, line);
    }
}

fn push_line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", text);
}

/// An item seen by the decoder whose kind is not yet known.
struct Pending {
    name: String,
    indent: usize,
    record: Entry,
    children: Vec<Node>,
    line: usize,
}

impl Pending {
    fn new(name: &str, indent: usize, line: usize) -> Self {
        Self {
            name: name.to_string(),
            indent,
            record: Entry::default(),
            children: Vec::new(),
            line,
        }
    }

    fn into_node(self) -> Result<Node> {
        if self.record.is_empty() {
            return Ok(Node::Folder(Folder {
                name: self.name,
                children: self.children,
                ..Folder::default()
            }));
        }
        if !self.children.is_empty() {
            return Err(AlockError::parse(
                self.line,
                format!("entry \"{}\" cannot contain child items", self.name),
            ));
        }
        let mut entry = self.record;
        if entry.name.is_empty() {
            entry.name = self.name;
        }
        Ok(Node::Entry(entry))
    }
}

/// Decode canonical text back into a tree rooted at an unnamed folder.
pub fn decode(bytes: &[u8]) -> Result<Folder> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| AlockError::parse(0, format!("payload is not valid UTF-8: {}", e)))?;
    let lines: Vec<&str> = text.lines().collect();

    let mut root: Vec<Node> = Vec::new();
    let mut stack: Vec<Pending> = Vec::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let raw = lines[cursor];
        let line_no = cursor + 1;
        cursor += 1;

        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = leading_spaces(raw);

        if let Some(name) = item_name(trimmed) {
            let level = indent / 2;
            while stack.len() > level {
                fold_top(&mut stack, &mut root)?;
            }
            if let Some(parent) = stack.last() {
                if !parent.record.is_empty() {
                    return Err(AlockError::parse(
                        line_no,
                        format!("entry \"{}\" cannot contain child items", parent.name),
                    ));
                }
            }
            stack.push(Pending::new(name, indent, line_no));
            continue;
        }

        let current = stack
            .last_mut()
            .ok_or_else(|| AlockError::parse(line_no, "field line before any item"))?;
        let (key, value) = trimmed
            .split_once(':')
            .ok_or_else(|| AlockError::parse(line_no, "expected `key: value`"))?;
        let value = value.trim();

        match key.trim() {
            "name" => current.record.name = value.to_string(),
            "username" => current.record.username = value.to_string(),
            "password" => current.record.secret = value.to_string(),
            "url" => current.record.url = value.to_string(),
            "notes" if value == "|" => {
                let threshold = current.indent + 2;
                let base = current.indent + 2 * INDENT.len();
                let mut collected = Vec::new();
                while cursor < lines.len() && leading_spaces(lines[cursor]) > threshold {
                    let line = lines[cursor];
                    collected.push(&line[leading_spaces(line).min(base)..]);
                    cursor += 1;
                }
                current.record.notes = collected.join("\n");
            }
            "notes" => current.record.notes = value.to_string(),
            other => {
                tracing::debug!(line = line_no, key = other, "ignoring unknown field");
            }
        }
    }

    while !stack.is_empty() {
        fold_top(&mut stack, &mut root)?;
    }

    Ok(Folder {
        children: root,
        ..Folder::root()
    })
}

/// Pop the innermost pending item and attach it to its container.
fn fold_top(stack: &mut Vec<Pending>, root: &mut Vec<Node>) -> Result<()> {
    if let Some(pending) = stack.pop() {
        let node = pending.into_node()?;
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => root.push(node),
        }
    }
    Ok(())
}

fn item_name(trimmed: &str) -> Option<&str> {
    if trimmed == "-" {
        return Some("");
    }
    trimmed.strip_prefix("- ")
}

fn leading_spaces(line: &str) -> usize {
    line.bytes().take_while(|&b| b == b' ').count()
}
