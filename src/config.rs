//! User configuration (`config.toml`).
//!
//! ```toml
//! version = "v1"
//!
//! [names]
//! max_column_letters = 2
//! max_row = 99
//! ```
//!
//! Every key is optional. Problems never abort startup: they are reported as
//! warnings and the defaults are used instead.

use cellgraph_engine::engine::NameRules;
use cellgraph_core::sheet::DEFAULT_VERSION;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::CliError;

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Version tag written on save and required on load.
    pub version: String,
    /// Cell naming limits.
    pub names: NameRules,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            version: DEFAULT_VERSION.to_string(),
            names: NameRules::default(),
        }
    }
}

/// Load the config from `config_file`, or from the user config dir when none
/// is given. Returns the config and any warnings.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings = Vec::new();
    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    match read_config(&path) {
        Ok(config) => (config, warnings),
        Err(err) => {
            warnings.push(err.to_string());
            (Config::default(), warnings)
        }
    }
}

fn read_config(path: &Path) -> Result<Config, CliError> {
    let read_err = |source| CliError::ConfigRead {
        path: path.to_path_buf(),
        source,
    };
    let meta = std::fs::metadata(path).map_err(read_err)?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(CliError::ConfigTooLarge {
            path: path.to_path_buf(),
            size: meta.len(),
            max: MAX_CONFIG_FILE_BYTES,
        });
    }
    let content = std::fs::read_to_string(path).map_err(read_err)?;
    let config = parse_config(&content).map_err(|message| CliError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Parse and sanity-check config text.
fn parse_config(content: &str) -> Result<Config, String> {
    let config: Config = toml::from_str(content).map_err(|err| err.to_string())?;
    if config.names.max_row == 0 {
        return Err("names.max_row must be at least 1".to_string());
    }
    if config.names.max_column_letters == 0 {
        return Err("names.max_column_letters must be at least 1".to_string());
    }
    if config.version.trim().is_empty() || config.version.contains(['\n', '\r']) {
        return Err("version must be a single non-empty line".to_string());
    }
    Ok(config)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgraph")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = parse_config("version = \"v1\"\n[names]\nmax_row = 500\n").unwrap();
        assert_eq!(config.version, "v1");
        assert_eq!(config.names, NameRules::new(2, 500));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(parse_config("colour = \"red\"").is_err());
        assert!(parse_config("[names]\nmax_rows = 5").is_err());
    }

    #[test]
    fn test_zero_limits_rejected() {
        assert!(parse_config("[names]\nmax_row = 0").is_err());
        assert!(parse_config("[names]\nmax_column_letters = 0").is_err());
    }

    #[test]
    fn test_missing_explicit_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_invalid_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "version = 3").unwrap();
        let (config, warnings) = load_config(Some(&path));
        assert_eq!(config, Config::default());
        assert!(warnings[0].contains("Failed to parse"));
    }

    #[test]
    fn test_user_config_path_is_deterministic() {
        // Should never panic and should either be Some(path) or None.
        let _ = user_config_path();
    }
}
