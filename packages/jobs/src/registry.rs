//! Compile-time map configuration.
//!
//! The default configuration is embedded via `include_str!`. A file on
//! disk can replace it with [`load_config`].

use std::path::Path;

use jobs_map_jobs_models::Category;
use jobs_map_jobs_models::config::MapConfig;
use jobs_map_palette::CLASS_COUNT;

use crate::ConfigError;

const MAP_TOML: &str = include_str!("../config/map.toml");

/// Returns the embedded map configuration.
///
/// # Panics
///
/// Panics if the embedded TOML fails to parse or validate. Since it is a
/// compile-time constant, a failure indicates a development error and is
/// caught by the tests below.
#[must_use]
pub fn map_config() -> MapConfig {
    parse_config(MAP_TOML).unwrap_or_else(|e| panic!("Failed to parse embedded map config: {e}"))
}

/// Reads and validates a map configuration from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or
/// fails validation.
pub fn load_config(path: &Path) -> Result<MapConfig, ConfigError> {
    let text = std::fs::read_to_string(path)?;
    let config = parse_config(&text)?;
    log::info!("Loaded map config from {}", path.display());
    Ok(config)
}

/// Parses and validates a map configuration.
///
/// # Errors
///
/// Returns an error if `text` is not valid TOML or fails validation.
pub fn parse_config(text: &str) -> Result<MapConfig, ConfigError> {
    let config: MapConfig = toml::de::from_str(text)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &MapConfig) -> Result<(), ConfigError> {
    let invalid = |message: String| Err(ConfigError::Invalid { message });

    for category in Category::ALL {
        if config.category(*category).is_none() {
            return invalid(format!("category {category} has no ramp binding"));
        }
    }

    let breaks = &config.change.breaks;
    if breaks.len() != CLASS_COUNT - 1 {
        return invalid(format!(
            "change breaks must have {} values, found {}",
            CLASS_COUNT - 1,
            breaks.len()
        ));
    }
    if !breaks.windows(2).all(|w| w[0] < w[1]) {
        return invalid(format!("change breaks must be strictly increasing: {breaks:?}"));
    }

    if config.density.quintiles.len() != CLASS_COUNT {
        return invalid(format!(
            "density needs {CLASS_COUNT} quintile ranges, found {}",
            config.density.quintiles.len()
        ));
    }

    if config.map.width <= 0.0 || config.map.height() <= 0.0 {
        return invalid("map size must be positive".to_string());
    }

    Ok(())
}
