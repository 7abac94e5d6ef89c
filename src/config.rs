//! Configuration for tubemark paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variable (TUBEMARK_HOME)
//! 2. Config file (.tubemark/config.yaml)
//! 3. Default (~/.tubemark)
//!
//! Config file discovery:
//! - Searches current directory and parents for .tubemark/config.yaml
//! - Paths in the config file are relative to the config file's directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<std::result::Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Data directory (relative to the config file's directory)
    pub home: Option<String>,
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Absolute path to the data directory
    pub home: PathBuf,

    /// Path to the config file (if one was found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".tubemark").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse a config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's directory
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let default_home = dirs::home_dir()
        .context("Failed to determine home directory")?
        .join(".tubemark");

    if let Ok(env_home) = std::env::var("TUBEMARK_HOME") {
        return Ok(ResolvedConfig {
            home: PathBuf::from(env_home),
            config_file: None,
        });
    }

    let config_file = find_config_file();
    let home = if let Some(ref config_path) = config_file {
        let config = load_config_file(config_path)?;
        let config_dir = config_path.parent().unwrap_or(Path::new("."));

        match config.paths.home {
            Some(ref home_path) => resolve_path(config_dir, home_path),
            None => default_home,
        }
    } else {
        default_home
    };

    Ok(ResolvedConfig { home, config_file })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Get the tubemark data directory
pub fn data_dir() -> Result<PathBuf> {
    Ok(config()?.home.clone())
}

/// Get the library file path (<data_dir>/library.json)
pub fn library_file() -> Result<PathBuf> {
    Ok(config()?.home.join("library.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_absolute_path_wins() {
        let resolved = resolve_path(Path::new("/tmp/base"), "/var/data");
        assert_eq!(resolved, PathBuf::from("/var/data"));
    }

    #[test]
    fn test_resolve_relative_path_joins_base() {
        let resolved = resolve_path(Path::new("/nonexistent/base"), "data");
        assert_eq!(resolved, PathBuf::from("/nonexistent/base/data"));
    }

    #[test]
    fn test_config_file_parses() {
        let config: ConfigFile = serde_yaml::from_str("paths:\n  home: ./marks\n").unwrap();
        assert_eq!(config.paths.home.as_deref(), Some("./marks"));
    }
}
