use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid input: {0} (expected a `{suffix}` suffix)", suffix = crate::detect::SUFFIX)]
    MissingSuffix(String),
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),
    #[error("unknown catalog entry: {0}")]
    UnknownEntry(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
