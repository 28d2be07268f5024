//! Configuration types and parsing for revlane.yml

use crate::error::{CoreError, CoreResult};
use crate::sql_utils::is_plain_identifier;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Main project configuration from revlane.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name
    pub name: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Table recording the currently applied revision
    #[serde(default = "default_version_table")]
    pub version_table: String,

    /// Overrides for dialect-derived migration capabilities
    #[serde(default)]
    pub capabilities: CapabilityOverrides,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Capability overrides, replacing the base overrides when present
    #[serde(default)]
    pub capabilities: Option<CapabilityOverrides>,
}

/// Database engine a connection targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// DuckDB (default)
    #[default]
    DuckDb,
    /// SQLite
    Sqlite,
}

impl Dialect {
    /// Lowercase dialect name, as used in config files and log output
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::DuckDb => "duckdb",
            Dialect::Sqlite => "sqlite",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Dialect {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(Dialect::DuckDb),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(CoreError::ConfigInvalid {
                message: format!("Unknown database type '{other}'. Expected duckdb or sqlite"),
            }),
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database type (duckdb or sqlite)
    #[serde(rename = "type", default)]
    pub dialect: Dialect,

    /// Database path (file path or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            path: default_db_path(),
        }
    }
}

/// Explicit capability settings that replace the dialect defaults.
///
/// Any field left unset keeps the default for the connected dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CapabilityOverrides {
    /// Whether downgrades may recreate the structure of retired tables
    #[serde(default)]
    pub restore_dropped_tables: Option<bool>,
}

const DEFAULT_DB_PATH: &str = ":memory:";

const DEFAULT_VERSION_TABLE: &str = "revlane_version";

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

fn default_version_table() -> String {
    DEFAULT_VERSION_TABLE.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        log::debug!("Loaded config '{}' from {}", config.name, path.display());
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for revlane.yml or revlane.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("revlane.yml");
        let yaml_path = dir.join("revlane.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(CoreError::ConfigNotFound {
                path: yml_path.display().to_string(),
            })
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "Project name cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.version_table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "version_table '{}' must be a plain identifier ([A-Za-z_][A-Za-z0-9_]*)",
                    self.version_table
                ),
            });
        }

        Ok(())
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets
            .get(name)
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' not found. Available targets: {}",
                    name,
                    self.available_targets().join(", ")
                ),
            })
    }

    /// Get database configuration, optionally applying target overrides
    ///
    /// If target is specified and exists, uses target's database config.
    /// Otherwise, uses the base database config.
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Get capability overrides, optionally applying target overrides
    pub fn get_capability_overrides(&self, target: Option<&str>) -> CoreResult<CapabilityOverrides> {
        match target {
            Some(name) => Ok(self.target(name)?.capabilities.unwrap_or(self.capabilities)),
            None => Ok(self.capabilities),
        }
    }

    /// Resolve the target name from the CLI flag or the `REVLANE_TARGET` env var
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var("REVLANE_TARGET").ok())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
