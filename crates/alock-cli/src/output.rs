//! Output formatting helpers for the CLI.

use alock_core::storage::DatabaseInfo;
use alock_core::{Entry, Folder, Node};

const SECRET_MASK: &str = "********";

/// Render the hierarchy, folders suffixed with `/`, two spaces per level.
pub fn render_tree(tree: &Folder) -> String {
    let mut out = String::new();
    render_children(tree, 0, &mut out);
    out
}

fn render_children(folder: &Folder, depth: usize, out: &mut String) {
    for child in &folder.children {
        out.push_str(&"  ".repeat(depth));
        match child {
            Node::Folder(folder) => {
                out.push_str(&folder.name);
                out.push_str("/\n");
                render_children(folder, depth + 1, out);
            }
            Node::Entry(entry) => {
                out.push_str(display_name(&entry.name));
                out.push('\n');
            }
        }
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "(unnamed)"
    } else {
        name
    }
}

/// Render one entry; the password is masked unless `reveal` is set.
pub fn render_entry(entry: &Entry, reveal: bool) -> String {
    let secret = if reveal || entry.secret.is_empty() {
        entry.secret.as_str()
    } else {
        SECRET_MASK
    };
    let mut out = format!(
        "Name: {}\nUsername: {}\nPassword: {}\nURL: {}\n",
        entry.name, entry.username, secret, entry.url
    );
    if !entry.notes.is_empty() {
        out.push_str("Notes:\n");
        for line in entry.notes.lines() {
            out.push_str("  ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn print_summary(tree: &Folder) {
    println!(
        "{} folder(s), {} entr{}",
        tree.folder_count(),
        tree.entry_count(),
        if tree.entry_count() == 1 { "y" } else { "ies" }
    );
}

pub fn print_info(info: &DatabaseInfo) {
    println!("Payload format: {}", info.format);
    println!("Verifier: {} ({})", info.algorithm, info.params);
    println!("File size: {} bytes", info.file_len);
    println!("Ciphertext: {} bytes", info.ciphertext_len);
}
