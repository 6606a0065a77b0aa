//! Census tract records.

use geo::Geometry;
use jobs_map_jobs_models::{Category, TractValues};
use jobs_map_topology::Feature;
use serde_json::{Map, Value};

use crate::resolve::{resolve, resolve_quintile};

/// One census tract: identity, raw properties and geometry.
///
/// Properties are kept raw so any category can be resolved later without
/// reloading.
#[derive(Debug, Clone, PartialEq)]
pub struct Tract {
    /// Census GEOID, the key used to diff renders.
    pub geoid: String,
    /// Job density quintile, `None` when absent or invalid.
    pub quintile: Option<u8>,
    /// Tract outline, `None` for null geometries.
    pub geometry: Option<Geometry<f64>>,
    properties: Map<String, Value>,
}

impl Tract {
    /// Builds a tract from a decoded feature. `index` is used for the key
    /// when the feature carries no GEOID and no id.
    #[must_use]
    pub fn from_feature(feature: Feature, index: usize) -> Self {
        let geoid = ["GEOID", "geoid", "GEOID10"]
            .iter()
            .find_map(|key| feature.properties.get(*key).and_then(key_string))
            .or(feature.id)
            .unwrap_or_else(|| format!("tract-{index}"));

        Self {
            geoid,
            quintile: resolve_quintile(&feature.properties),
            geometry: feature.geometry,
            properties: feature.properties,
        }
    }

    /// Change and level values of `category`.
    #[must_use]
    pub fn values(&self, category: Category) -> TractValues {
        resolve(category, &self.properties)
    }

    /// Raw property map.
    #[must_use]
    pub const fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }
}

fn key_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Converts decoded features to tracts, in input order.
#[must_use]
pub fn tracts_from_features(features: Vec<Feature>) -> Vec<Tract> {
    let tracts: Vec<Tract> = features
        .into_iter()
        .enumerate()
        .map(|(i, feature)| Tract::from_feature(feature, i))
        .collect();

    let without_geometry = tracts.iter().filter(|t| t.geometry.is_none()).count();
    if without_geometry > 0 {
        log::warn!("{without_geometry} of {} tracts have no geometry", tracts.len());
    }

    tracts
}
