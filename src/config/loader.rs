// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in the workspace
//! root and the user's home directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::{ConfigFile, InstrumentationConfig};

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[".alog.yaml", ".alog.yml", ".alog.json"];

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".alog";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.yaml";

/// Get the global config directory path.
pub fn get_global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR))
}

/// Get the global config file path.
pub fn get_global_config_path() -> Option<PathBuf> {
    get_global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Load global configuration from ~/.alog/config.yaml.
pub fn load_global_config() -> Result<Option<ConfigFile>, ConfigError> {
    let path = match get_global_config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    load_config_file(&path).map(Some)
}

/// Load workspace configuration from the first config file found in
/// `workspace_root`, searching [`CONFIG_FILES`] in order.
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load a configuration file (JSON or YAML, by extension).
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match extension.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content).map_err(ConfigError::from),
        _ => serde_yaml::from_str(&content).map_err(ConfigError::from),
    }
}

/// Write a resolved configuration as YAML.
pub fn save_config(path: &Path, config: &InstrumentationConfig) -> Result<(), ConfigError> {
    let content = serde_yaml::to_string(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Level;
    use tempfile::TempDir;

    #[test]
    fn test_config_files_order() {
        assert_eq!(CONFIG_FILES.len(), 3);
        assert_eq!(CONFIG_FILES[0], ".alog.yaml");
    }

    #[test]
    fn test_global_config_dir() {
        if let Some(dir) = get_global_config_dir() {
            assert!(dir.ends_with(".alog"));
        }
    }

    #[test]
    fn test_load_workspace_config_not_found() {
        let temp = TempDir::new().unwrap();
        let result = load_workspace_config(temp.path()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_workspace_config_yaml_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".alog.yaml"), "level: ERROR\n").unwrap();
        std::fs::write(temp.path().join(".alog.json"), r#"{"level": "DEBUG"}"#).unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.level, Some(Level::Error));
    }

    #[test]
    fn test_load_workspace_config_json() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".alog.json"),
            r#"{"service_name": "planner", "enable_tracing": true}"#,
        )
        .unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.service_name.as_deref(), Some("planner"));
        assert_eq!(config.enable_tracing, Some(true));
        assert!(config.level.is_none());
    }

    #[test]
    fn test_load_invalid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".alog.yml");
        std::fs::write(&path, "level: [unclosed").unwrap();
        assert!(matches!(load_config_file(&path), Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_save_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("resolved.yaml");
        let config = InstrumentationConfig::default().with_level(Level::Warning);

        save_config(&path, &config).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("level: WARNING"));

        let back: InstrumentationConfig = serde_yaml::from_str(&content).unwrap();
        assert_eq!(back, config);
    }
}
