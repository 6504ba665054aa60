//! Input helpers shared by the command handlers.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::{Confirm, Password};

use crate::cli::Cli;
use crate::config::{default_database_path, AlockConfig};

/// Prompt for the passphrase, or read it from ALOCK_PASSPHRASE.
pub fn prompt_passphrase() -> anyhow::Result<String> {
    if let Some(value) = env_secret("ALOCK_PASSPHRASE") {
        return Ok(value);
    }
    if !io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set ALOCK_PASSPHRASE."
        ));
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Prompt for a new passphrase with confirmation.
///
/// `env_key` lets `passwd` read the replacement from a different variable
/// than the one holding the current passphrase.
pub fn prompt_new_passphrase(env_key: &str) -> anyhow::Result<String> {
    if let Some(value) = env_secret(env_key) {
        return Ok(value);
    }
    if !io::stdin().is_terminal() {
        return Err(anyhow::anyhow!(
            "No passphrase provided and no TTY available. Set {}.",
            env_key
        ));
    }
    Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .validate_with(|input: &String| {
            alock_core::crypto::validate_passphrase(input).map_err(|e| e.to_string())
        })
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

/// Read an entry password from the terminal; empty when there is none.
pub fn prompt_secret() -> anyhow::Result<String> {
    if !io::stdin().is_terminal() {
        return Ok(String::new());
    }
    Password::new()
        .with_prompt("Password (empty for none)")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))
}

/// Ask a yes/no question on the terminal; defaults to no without one.
pub fn confirm(prompt: &str) -> anyhow::Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }
    Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| anyhow::anyhow!("Failed to read answer: {}", e))
}

fn env_secret(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Database path: `--database`/ALOCK_DATABASE, then config, then default.
pub fn resolve_database_path(cli: &Cli, config: &AlockConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = &cli.database {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = &config.database.path {
        return Ok(expand_home(path));
    }
    default_database_path()
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}

/// Split a `/`-separated item path into names, ignoring empty segments.
pub fn split_item_path(path: &str) -> Vec<&str> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}
