#[cfg(test)]
pub mod config_test;

use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dmi::data::{find_field, FieldValue};

/// Represents all possible errors loading a [Config]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
    #[error("Unknown DMI field in overrides: {0}")]
    UnknownField(String),
    #[error("DMI field {key} expects a number, got '{value}'")]
    InvalidNumber { key: String, value: String },
}

/// Optional user configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Values written in place of the host's, keyed by DMI field name
    pub overrides: Option<BTreeMap<String, String>>,
}

impl Config {
    /// Load a [Config] from the given YAML string
    pub fn from_yaml(content: String) -> Result<Config, LoadError> {
        let config: Config = serde_yaml::from_str(content.as_str())?;
        Ok(config)
    }

    /// Load a [Config] from the given YAML file
    pub fn from_yaml_path(path: &Path) -> Result<Config, LoadError> {
        let content = std::fs::read_to_string(path)?;
        Config::from_yaml(content)
    }

    /// Returns the overrides resolved against the known DMI fields
    pub fn overrides(&self) -> Result<HashMap<&'static str, FieldValue>, LoadError> {
        let mut resolved = HashMap::new();
        let Some(overrides) = self.overrides.as_ref() else {
            return Ok(resolved);
        };

        for (key, value) in overrides {
            let Some(field) = find_field(key) else {
                return Err(LoadError::UnknownField(key.clone()));
            };
            let value = if field.source.is_integer() {
                let number = value.trim().parse().map_err(|_| LoadError::InvalidNumber {
                    key: key.clone(),
                    value: value.clone(),
                })?;
                FieldValue::Integer(number)
            } else {
                FieldValue::Text(value.clone())
            };
            resolved.insert(field.key, value);
        }

        Ok(resolved)
    }
}
