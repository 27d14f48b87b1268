//! Classification of `.bit` names against the catalog.

use std::collections::BTreeSet;

use bp_core::Pattern;
use serde::Serialize;

use crate::catalog::{Entry, catalog};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::primitive::string_set;

/// Suffix every classified name must carry. It is stripped before matching.
pub const SUFFIX: &str = ".bit";

/// One catalog pattern that matched a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Match {
    pub entry: &'static str,
    pub label: String,
}

/// Runs every catalog pattern over a name and collects the labels.
///
/// Patterns memoize per input, so a long-lived detector answers repeated
/// names from cache.
#[derive(Debug)]
pub struct Detector {
    entries: Vec<Entry>,
    allow: Pattern,
}

impl Default for Detector {
    fn default() -> Self {
        Self::new()
    }
}

impl Detector {
    /// The full catalog, reporting every label.
    pub fn new() -> Self {
        Self {
            entries: catalog(),
            allow: Pattern::identity(),
        }
    }

    pub fn with_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let entries = catalog()
            .into_iter()
            .filter(|e| !config.exclude.iter().any(|name| name == e.name))
            .collect();
        let allow = match &config.known_labels {
            Some(labels) => string_set(labels.iter().cloned(), ""),
            None => Pattern::identity(),
        };
        Ok(Self { entries, allow })
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Remove the `.bit` suffix, failing when it is absent.
    pub fn strip_suffix(name: &str) -> Result<&str> {
        name.strip_suffix(SUFFIX)
            .ok_or_else(|| CatalogError::MissingSuffix(name.to_string()))
    }

    /// Every (entry, label) match for `name`, in catalog order. Labels may
    /// repeat across entries.
    pub fn matches(&self, name: &str) -> Result<Vec<Match>> {
        let stem = Self::strip_suffix(name)?;
        let mut found = Vec::new();

        for entry in &self.entries {
            for pattern in &entry.patterns {
                match self.accept(pattern, stem) {
                    Some(label) => {
                        tracing::debug!(entry = entry.name, %label, "{stem} matched");
                        found.push(Match {
                            entry: entry.name,
                            label,
                        });
                    }
                    None => tracing::trace!(entry = entry.name, "{stem} not matched"),
                }
            }
        }

        Ok(found)
    }

    /// The distinct labels matched by `name`.
    pub fn detect(&self, name: &str) -> Result<BTreeSet<String>> {
        Ok(self.matches(name)?.into_iter().map(|m| m.label).collect())
    }

    fn accept(&self, pattern: &Pattern, stem: &str) -> Option<String> {
        let label = pattern.serialize(stem)?;
        (!label.is_empty() && self.allow.test(&label)).then_some(label)
    }
}
