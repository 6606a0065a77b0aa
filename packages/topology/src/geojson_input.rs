//! `GeoJSON` documents converted to the same [`Feature`] records a
//! topology produces.

use geojson::GeoJson;
use geojson::feature::Id;
use serde_json::{Map, Value};

use crate::{Feature, TopologyError};

/// Parses a `GeoJSON` `FeatureCollection`, `Feature` or bare geometry.
///
/// # Errors
///
/// Returns an error if the text is not valid `GeoJSON` or a geometry
/// cannot be converted.
pub fn features_from_geojson(text: &str) -> Result<Vec<Feature>, TopologyError> {
    features_from(text.parse::<GeoJson>()?)
}

/// Converts an already parsed `GeoJSON` JSON value.
///
/// # Errors
///
/// Returns an error if the value is not valid `GeoJSON` or a geometry
/// cannot be converted.
pub fn features_from_value(value: Value) -> Result<Vec<Feature>, TopologyError> {
    features_from(GeoJson::from_json_value(value)?)
}

fn features_from(geojson: GeoJson) -> Result<Vec<Feature>, TopologyError> {
    match geojson {
        GeoJson::FeatureCollection(collection) => {
            collection.features.into_iter().map(convert).collect()
        }
        GeoJson::Feature(feature) => Ok(vec![convert(feature)?]),
        GeoJson::Geometry(geometry) => Ok(vec![Feature {
            id: None,
            properties: Map::new(),
            geometry: Some(geometry.try_into()?),
        }]),
    }
}

fn convert(feature: geojson::Feature) -> Result<Feature, TopologyError> {
    let id = feature.id.map(|id| match id {
        Id::String(s) => s,
        Id::Number(n) => n.to_string(),
    });
    let geometry = feature
        .geometry
        .map(geo::Geometry::<f64>::try_from)
        .transpose()?;

    Ok(Feature {
        id,
        properties: feature.properties.unwrap_or_default(),
        geometry,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn feature_collection_converts() {
        let text = json!({
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "id": "a",
                    "properties": {"GEOID": "06001400100", "prof_15": 1.2},
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
                    }
                },
                {"type": "Feature", "id": 5, "properties": null, "geometry": null}
            ]
        })
        .to_string();

        let features = features_from_geojson(&text).unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0].id.as_deref(), Some("a"));
        assert_eq!(features[0].property("prof_15"), Some(&json!(1.2)));
        assert!(matches!(features[0].geometry, Some(geo::Geometry::Polygon(_))));
        assert_eq!(features[1].id.as_deref(), Some("5"));
        assert!(features[1].properties.is_empty());
        assert!(features[1].geometry.is_none());
    }

    #[test]
    fn bare_geometry_is_one_feature() {
        let features =
            features_from_value(json!({"type": "Point", "coordinates": [1.0, 2.0]})).unwrap();
        assert_eq!(features.len(), 1);
        assert!(matches!(features[0].geometry, Some(geo::Geometry::Point(_))));
    }

    #[test]
    fn invalid_geojson_is_an_error() {
        assert!(matches!(
            features_from_geojson("{\"type\": \"Nope\"}"),
            Err(TopologyError::GeoJson(_))
        ));
    }
}
