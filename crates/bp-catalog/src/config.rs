use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::entry_names;
use crate::error::{CatalogError, Result};

/// Detector configuration, read from TOML.
///
/// ```toml
/// known_labels = ["AABB", "999CN", "WanClub"]
/// exclude = ["MMDD"]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Only these labels are reported. `None` reports every label.
    pub known_labels: Option<Vec<String>>,
    /// Catalog entries to skip, by name.
    pub exclude: Vec<String>,
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            "loaded config {}: {} excluded, allow-list {}",
            path.display(),
            config.exclude.len(),
            config
                .known_labels
                .as_ref()
                .map_or("off".to_string(), |l| format!("{} labels", l.len()))
        );
        Ok(config)
    }

    /// Every excluded name must be a catalog entry.
    pub fn validate(&self) -> Result<()> {
        let names = entry_names();
        let unknown = self
            .exclude
            .iter()
            .find(|name| !names.iter().any(|n| *n == name.as_str()));
        match unknown {
            Some(unknown) => Err(CatalogError::UnknownEntry(unknown.clone())),
            None => Ok(()),
        }
    }
}
