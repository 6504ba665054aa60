use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct AlockConfig {
    #[serde(default)]
    pub database: DatabaseSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct DatabaseSection {
    pub path: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UiSection {
    /// Print passwords in `show` without `--reveal`.
    #[serde(default)]
    pub reveal_secrets: bool,
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_database_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("vault.alock"))
}

/// Load the config file if present; a missing file yields defaults.
pub fn load_config() -> anyhow::Result<AlockConfig> {
    let path = default_config_path()?;
    if !path.exists() {
        return Ok(AlockConfig::default());
    }
    read_config(&path)
}

pub fn read_config(path: &Path) -> anyhow::Result<AlockConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("alock"));
        }
    }
    Ok(home_dir()?.join(".config").join("alock"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("alock"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("alock"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: AlockConfig =
            toml::from_str("[database]\npath = \"/tmp/v.alock\"\n\n[ui]\nreveal_secrets = true\n")
                .unwrap();
        assert_eq!(config.database.path.as_deref(), Some("/tmp/v.alock"));
        assert!(config.ui.reveal_secrets);
    }

    #[test]
    fn test_sections_are_optional() {
        let config: AlockConfig = toml::from_str("").unwrap();
        assert!(config.database.path.is_none());
        assert!(!config.ui.reveal_secrets);
    }

    #[test]
    fn test_read_config_reports_path_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database\n").unwrap();
        let err = read_config(&path).unwrap_err().to_string();
        assert!(err.contains("Failed to parse config"));
    }
}
