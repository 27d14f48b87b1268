//! Catalog of numeric naming patterns and the `.bit` name detector.
//!
//! Primitives and catalog entries are plain [`bp_core::Pattern`] values;
//! the [`Detector`] strips the `.bit` suffix and collects the label of every
//! entry that matches.

pub mod calendar;
pub mod catalog;
pub mod config;
pub mod detect;
pub mod error;
pub mod primitive;
pub mod text;
pub mod translate;

pub use catalog::{Entry, catalog, entry_names};
pub use config::Config;
pub use detect::{Detector, Match, SUFFIX};
pub use error::{CatalogError, Result};
