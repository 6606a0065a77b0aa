//! A loaded map document: either a topology or plain `GeoJSON`.

use serde_json::Value;

use crate::geojson_input::features_from_value;
use crate::{Feature, Topology, TopologyError};

/// A parsed geometry document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// `TopoJSON` with shared arcs.
    Topology(Topology),
    /// `GeoJSON` features.
    Features(Vec<Feature>),
}

impl Document {
    /// Parses `text`, dispatching on the top-level `type` member.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is neither valid `TopoJSON` nor valid
    /// `GeoJSON`.
    pub fn parse(text: &str) -> Result<Self, TopologyError> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Decodes an already parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither valid `TopoJSON` nor valid
    /// `GeoJSON`.
    pub fn from_value(value: Value) -> Result<Self, TopologyError> {
        if value.get("type").and_then(Value::as_str) == Some("Topology") {
            Ok(Self::Topology(Topology::from_value(value)?))
        } else {
            Ok(Self::Features(features_from_value(value)?))
        }
    }

    /// Features of object `object`, or of the first object when `None`.
    /// `GeoJSON` documents ignore `object` and return all features.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown objects or an empty topology.
    pub fn features(&self, object: Option<&str>) -> Result<Vec<Feature>, TopologyError> {
        match self {
            Self::Topology(topology) => match object {
                Some(name) => topology.feature(name),
                None => topology.features_of(topology.first_object()?.1),
            },
            Self::Features(features) => Ok(features.clone()),
        }
    }

    /// The topology, or [`TopologyError::NotATopology`] for `GeoJSON`
    /// documents.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::NotATopology`] for `GeoJSON` documents.
    pub fn topology(&self) -> Result<&Topology, TopologyError> {
        match self {
            Self::Topology(topology) => Ok(topology),
            Self::Features(_) => Err(TopologyError::NotATopology {
                kind: "FeatureCollection".to_string(),
            }),
        }
    }
}
