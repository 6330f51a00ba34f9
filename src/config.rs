//! Layered configuration: compiled defaults, then `gocanon.toml`, then CLI
//! overrides applied by the binary.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the project file picked up from the working directory.
pub const CONFIG_FILE: &str = "gocanon.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Names that pull struct fields out of the general bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldOrder {
    /// Sorted right after embedded fields. Default: `logger`.
    pub role: String,
    /// Sorted after the role field. Default: `Id`.
    pub identifier: String,
    /// Sorted last, in name order. Default: `CreatedAt`, `UpdatedAt`.
    pub timestamps: Vec<String>,
}

impl Default for FieldOrder {
    fn default() -> Self {
        Self {
            role: "logger".to_string(),
            identifier: "Id".to_string(),
            timestamps: vec!["CreatedAt".to_string(), "UpdatedAt".to_string()],
        }
    }
}

impl FieldOrder {
    pub fn is_timestamp(&self, name: &str) -> bool {
        self.timestamps.iter().any(|t| t == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CanonConfig {
    pub fields: FieldOrder,
    /// External formatter run around the engine, e.g. `gofumpt`.
    pub base_formatter: Option<String>,
}

impl CanonConfig {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads `path`, or returns the defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.fields;
        if f.role.trim().is_empty() {
            return Err(ConfigError::Invalid("fields.role is empty".into()));
        }
        if f.identifier.trim().is_empty() {
            return Err(ConfigError::Invalid("fields.identifier is empty".into()));
        }
        if f.timestamps.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("fields.timestamps has an empty name".into()));
        }
        if matches!(&self.base_formatter, Some(cmd) if cmd.trim().is_empty()) {
            return Err(ConfigError::Invalid("base_formatter is empty".into()));
        }
        Ok(())
    }
}
