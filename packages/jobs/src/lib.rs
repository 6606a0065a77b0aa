#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Job data plumbing between the loaded tract features and the renderer.
//!
//! - [`registry`]: the embedded map configuration.
//! - [`resolve`]: category to property lookup with numeric coercion.
//! - [`tracts`]: tract records extracted from decoded features.
//! - [`scales`]: the classifier and legend for the current view.

pub mod registry;
pub mod resolve;
pub mod scales;
pub mod tracts;

use jobs_map_classify::ClassifyError;
use jobs_map_jobs_models::Category;
use thiserror::Error;

pub use registry::{load_config, map_config};
pub use resolve::{resolve, resolve_quintile};
pub use scales::{ActiveScale, Scale};
pub use tracts::{Tract, tracts_from_features};

/// Errors raised while loading or validating a map configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML or does not match the schema.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The configuration parsed but is inconsistent.
    #[error("Invalid map configuration: {message}")]
    Invalid {
        /// What is wrong.
        message: String,
    },
}

/// Errors raised while building the classifier for a view.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// The classifier rejected its inputs.
    #[error("Classifier error: {0}")]
    Classify(#[from] ClassifyError),

    /// The configuration has no ramp binding for the category.
    #[error("No ramp configured for category {category}")]
    UnknownCategory {
        /// The category without a binding.
        category: Category,
    },
}
