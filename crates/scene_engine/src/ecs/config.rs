//! Scene configuration
//!
//! Runtime knobs for scene storage and bookkeeping, loadable from TOML so
//! applications can tune them without recompiling.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration for a [`Scene`](crate::ecs::Scene)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Entity id slots to pre-allocate before the first growth step
    pub initial_entity_capacity: usize,

    /// Soft cap on live entities; exceeding it logs a warning
    pub max_entities: usize,

    /// Enable per-frame statistics collection
    pub enable_stats: bool,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            initial_entity_capacity: 64,
            max_entities: 10_000,
            enable_stats: true,
        }
    }
}

/// Errors from loading a scene configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl SceneConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
