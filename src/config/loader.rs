//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{CollectorConfig, LegacyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a file.
pub fn load_config(path: &Path) -> Result<CollectorConfig, ConfigError> {
    let config = read_config(path)?;
    validate(&config)?;
    Ok(config)
}

/// Read configuration from a file without validating it.
///
/// Files ending in `.json` use the flat layout of existing deployments;
/// anything else is read as TOML.
pub fn read_config(path: &Path) -> Result<CollectorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        serde_json::from_str::<LegacyConfig>(&content)?.into()
    } else {
        toml::from_str::<CollectorConfig>(&content)?
    };

    Ok(config)
}

/// Run semantic validation, wrapping every problem found.
pub fn validate(config: &CollectorConfig) -> Result<(), ConfigError> {
    validate_config(config).map_err(ConfigError::Validation)
}
