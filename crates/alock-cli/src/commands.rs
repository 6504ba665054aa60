//! Command handlers. Every mutating command opens the database, edits the
//! tree and saves it back through the same [`Session`].

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use alock_core::storage::inspect_database;
use alock_core::{Entry, Folder, Node, PayloadFormat, Session};

use crate::cli::Cli;
use crate::config::AlockConfig;
use crate::helpers::{
    confirm, prompt_new_passphrase, prompt_passphrase, prompt_secret, split_item_path,
};
use crate::output::{print_info, print_summary, render_entry, render_tree};

pub struct Context {
    pub database: PathBuf,
    pub config: AlockConfig,
    pub quiet: bool,
}

pub fn handle_init(ctx: &Context, path: Option<&str>, format: PayloadFormat) -> anyhow::Result<()> {
    let target = path.map(PathBuf::from).unwrap_or_else(|| ctx.database.clone());
    if target.exists() {
        return Err(anyhow::anyhow!(
            "Database already exists at {}",
            target.display()
        ));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!("Failed to create directory {}: {}", parent.display(), e)
        })?;
    }

    let passphrase = prompt_new_passphrase("ALOCK_PASSPHRASE")?;
    let mut session = Session::new();
    session.new_database();
    session.save_as_with_format(&target, &passphrase, format)?;

    if !ctx.quiet {
        println!("Database created at {}", target.display());
    }
    Ok(())
}

pub fn handle_tree(ctx: &Context) -> anyhow::Result<()> {
    let session = open_session(&ctx.database)?;
    let tree = loaded(&session)?;
    print!("{}", render_tree(tree));
    if !ctx.quiet {
        print_summary(tree);
    }
    Ok(())
}

pub fn handle_show(ctx: &Context, path: &str, reveal: bool) -> anyhow::Result<()> {
    let session = open_session(&ctx.database)?;
    let tree = loaded(&session)?;
    let index = locate(tree, path)?;
    let entry = tree
        .get(&index)
        .and_then(Node::as_entry)
        .ok_or_else(|| anyhow::anyhow!("{} is a folder; use `alock tree`", path))?;
    print!("{}", render_entry(entry, reveal || ctx.config.ui.reveal_secrets));
    Ok(())
}

pub fn handle_mkdir(ctx: &Context, path: &str) -> anyhow::Result<()> {
    let mut session = open_session(&ctx.database)?;
    insert_node(&mut session, path, |name| Folder::new(name).into())?;
    session.save()?;
    if !ctx.quiet {
        println!("Created folder {}", path);
    }
    Ok(())
}

pub struct NewEntryFields {
    pub username: Option<String>,
    pub secret: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

pub fn handle_add(ctx: &Context, path: &str, fields: NewEntryFields) -> anyhow::Result<()> {
    let mut session = open_session(&ctx.database)?;
    let secret = match fields.secret {
        Some(secret) => secret,
        None => prompt_secret()?,
    };
    let entry = Entry {
        name: String::new(),
        username: fields.username.unwrap_or_default(),
        secret,
        url: fields.url.unwrap_or_default(),
        notes: fields.notes.unwrap_or_default(),
    };
    insert_node(&mut session, path, move |name| {
        Entry {
            name: name.to_string(),
            ..entry
        }
        .into()
    })?;
    session.save()?;
    if !ctx.quiet {
        println!("Added entry {}", path);
    }
    Ok(())
}

pub fn handle_rm(ctx: &Context, path: &str, force: bool) -> anyhow::Result<()> {
    let mut session = open_session(&ctx.database)?;
    let index = locate(loaded(&session)?, path)?;
    let non_empty_folder = loaded(&session)?
        .get(&index)
        .and_then(Node::as_folder)
        .is_some_and(|folder| !folder.children.is_empty());
    if non_empty_folder && !force && !confirm(&format!("Remove folder {} and its contents?", path))?
    {
        return Err(anyhow::anyhow!(
            "Folder {} is not empty; pass --force to remove it",
            path
        ));
    }

    session.tree_mut()?.remove(&index)?;
    session.save()?;
    if !ctx.quiet {
        println!("Removed {}", path);
    }
    Ok(())
}

pub fn handle_mv(ctx: &Context, from: &str, to: &str) -> anyhow::Result<()> {
    let mut session = open_session(&ctx.database)?;
    let tree = loaded(&session)?;
    let from_index = locate(tree, from)?;
    let to_names = split_item_path(to);
    let to_index = tree
        .resolve(&to_names)
        .filter(|index| tree.folder(index).is_some())
        .ok_or_else(|| anyhow::anyhow!("No folder named {}", to))?;

    let moving = tree
        .get(&from_index)
        .map(Node::name)
        .unwrap_or_default()
        .to_string();
    let same_parent = from_index[..from_index.len() - 1] == to_index[..];
    if !same_parent && has_child_named(tree, &to_index, &moving) {
        return Err(anyhow::anyhow!("{} already contains {}", to, moving));
    }

    session
        .tree_mut()?
        .move_node(&from_index, &to_index, None)?;
    session.save()?;
    if !ctx.quiet {
        println!("Moved {} into {}", from, to);
    }
    Ok(())
}

pub fn handle_passwd(ctx: &Context) -> anyhow::Result<()> {
    let mut session = open_session(&ctx.database)?;
    let passphrase = prompt_new_passphrase("ALOCK_NEW_PASSPHRASE")?;
    session.change_passphrase(&passphrase)?;
    if !ctx.quiet {
        println!("Passphrase changed");
    }
    Ok(())
}

pub fn handle_export(ctx: &Context, format: PayloadFormat) -> anyhow::Result<()> {
    let session = open_session(&ctx.database)?;
    let mut bytes = format.encode(loaded(&session)?)?;
    if bytes.last() != Some(&b'\n') {
        bytes.push(b'\n');
    }
    let mut stdout = io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

pub fn handle_info(ctx: &Context) -> anyhow::Result<()> {
    ensure_exists(&ctx.database)?;
    let info = inspect_database(&ctx.database)?;
    if !ctx.quiet {
        println!("Database: {}", ctx.database.display());
    }
    print_info(&info);
    Ok(())
}

pub fn handle_completions(shell: Shell) -> anyhow::Result<()> {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "alock", &mut io::stdout());
    Ok(())
}

fn ensure_exists(path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "No database found at {}. Run `alock init` first.",
            path.display()
        ));
    }
    Ok(())
}

fn open_session(path: &Path) -> anyhow::Result<Session> {
    ensure_exists(path)?;
    let passphrase = prompt_passphrase()?;
    let mut session = Session::new();
    session.open(path, &passphrase)?;
    Ok(session)
}

fn loaded(session: &Session) -> anyhow::Result<&Folder> {
    session
        .tree()
        .ok_or_else(|| anyhow::anyhow!("No database is open"))
}

fn locate(tree: &Folder, path: &str) -> anyhow::Result<Vec<usize>> {
    let names = split_item_path(path);
    if names.is_empty() {
        return Err(anyhow::anyhow!("An item path is required"));
    }
    tree.resolve(&names)
        .ok_or_else(|| anyhow::anyhow!("Nothing found at {}", path))
}

fn has_child_named(tree: &Folder, folder: &[usize], name: &str) -> bool {
    tree.folder(folder)
        .is_some_and(|folder| folder.children.iter().any(|child| child.name() == name))
}

/// Create a node at `path` whose parent folder must already exist.
fn insert_node(
    session: &mut Session,
    path: &str,
    make: impl FnOnce(&str) -> Node,
) -> anyhow::Result<()> {
    let names = split_item_path(path);
    let (name, parents) = names
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("An item path is required"))?;

    let tree = loaded(session)?;
    let parent = tree
        .resolve(parents)
        .filter(|index| tree.folder(index).is_some())
        .ok_or_else(|| anyhow::anyhow!("No folder named {}", parents.join("/")))?;
    if has_child_named(tree, &parent, name) {
        return Err(anyhow::anyhow!("{} already exists", path));
    }

    let folder = session
        .tree_mut()?
        .folder_mut(&parent)
        .ok_or_else(|| anyhow::anyhow!("No folder named {}", parents.join("/")))?;
    folder.push(make(name));
    Ok(())
}
