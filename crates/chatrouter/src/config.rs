use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RouterError};
use crate::prefix::{MultiplePrefix, PrefixCheck, StaticPrefix};

/// Router settings, loadable from a config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
    /// Literal command prefixes
    pub prefixes: Vec<String>,

    /// Fold case for prefixes, command names, and aliases
    pub case_insensitive: bool,

    /// Send unknown and blank commands to the error handlers instead of ignoring them
    pub dispatch_unknown_commands: bool,
}

impl Default for RouterSettings {
    fn default() -> Self {
        Self {
            prefixes: vec!["!".to_string()],
            case_insensitive: false,
            dispatch_unknown_commands: true,
        }
    }
}

impl RouterSettings {
    /// Create settings with a single prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefixes: vec![prefix.into()],
            ..Self::default()
        }
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.prefixes.is_empty() {
            return Err(RouterError::ConfigError(
                "At least one prefix must be configured".to_string(),
            ));
        }
        if self.prefixes.iter().any(|p| p.is_empty()) {
            return Err(RouterError::ConfigError(
                "Prefixes cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the prefix check these settings describe
    pub fn prefix_check(&self) -> Result<Box<dyn PrefixCheck>> {
        self.validate()?;
        let check: Box<dyn PrefixCheck> = match self.prefixes.as_slice() {
            [single] => Box::new(StaticPrefix::new(single).with_case_insensitive(self.case_insensitive)),
            many => Box::new(
                MultiplePrefix::new(many.iter().cloned()).with_case_insensitive(self.case_insensitive),
            ),
        };
        Ok(check)
    }
}

/// Router settings file manager
pub struct ConfigManager;

impl ConfigManager {
    /// Load settings from a YAML file
    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<RouterSettings> {
        let settings: RouterSettings = serde_yaml::from_str(&read(path)?)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from_json<P: AsRef<Path>>(path: P) -> Result<RouterSettings> {
        let settings: RouterSettings = serde_json::from_str(&read(path)?)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load_from_toml<P: AsRef<Path>>(path: P) -> Result<RouterSettings> {
        let settings: RouterSettings = toml::from_str(&read(path)?)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file (auto-detect format)
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RouterSettings> {
        let path = path.as_ref();
        match extension(path) {
            "yaml" | "yml" => Self::load_from_yaml(path),
            "json" => Self::load_from_json(path),
            "toml" => Self::load_from_toml(path),
            _ => Err(unsupported()),
        }
    }

    /// Save settings to a file (auto-detect format)
    pub fn save_to_file<P: AsRef<Path>>(settings: &RouterSettings, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match extension(path) {
            "yaml" | "yml" => serde_yaml::to_string(settings)?,
            "json" => serde_json::to_string_pretty(settings)?,
            "toml" => toml::to_string_pretty(settings)
                .map_err(|e| RouterError::ConfigError(format!("Failed to encode TOML: {}", e)))?,
            _ => return Err(unsupported()),
        };

        fs::write(path, content)
            .map_err(|e| RouterError::ConfigError(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }
}

fn read<P: AsRef<Path>>(path: P) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| RouterError::ConfigError(format!("Failed to read config file: {}", e)))
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|ext| ext.to_str()).unwrap_or("")
}

fn unsupported() -> RouterError {
    RouterError::ConfigError("Unsupported file format. Use .yaml, .yml, .json, or .toml".to_string())
}
