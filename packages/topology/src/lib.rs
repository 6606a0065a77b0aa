#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `TopoJSON` and `GeoJSON` decoding.
//!
//! A [`Topology`] stores shared arcs once and references them from every
//! geometry that uses them. This crate decodes those arcs (quantized or
//! not) into [`geo`] geometries and provides the three derived views a
//! map needs:
//!
//! - [`Topology::feature`]: one [`Feature`] per geometry of an object.
//! - [`Topology::mesh`]: the arcs shared by (or bounding) geometries,
//!   drawn once, e.g. for boundary lines.
//! - [`Topology::merge`]: the union of polygons computed by dropping the
//!   arcs they share.
//!
//! Plain `GeoJSON` documents are accepted through [`Document`], which
//! dispatches on the top-level `type`.

pub mod document;
pub mod geojson_input;
pub mod merge;
pub mod mesh;
pub mod topojson;

mod stitch;

use geo::Geometry;
use serde_json::{Map, Value};
use thiserror::Error;

pub use document::Document;
pub use mesh::{exterior, interior};
pub use topojson::{GeometryObject, Shape, Topology, Transform};

/// Errors raised while decoding topology or `GeoJSON` documents.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// The document is not valid JSON or does not match the schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The `GeoJSON` document could not be converted.
    #[error("GeoJSON error: {0}")]
    GeoJson(Box<geojson::Error>),

    /// The topology has no object with this name.
    #[error("Unknown topology object: {name}")]
    UnknownObject {
        /// Requested object name.
        name: String,
    },

    /// The topology has no objects at all.
    #[error("Topology has no objects")]
    NoObjects,

    /// A geometry references an arc that does not exist.
    #[error("Arc index {index} out of range ({count} arcs)")]
    ArcOutOfRange {
        /// The offending arc reference (possibly negative).
        index: i64,
        /// Number of arcs in the topology.
        count: usize,
    },

    /// A geometry has a `type` this decoder does not know.
    #[error("Unsupported geometry type: {kind}")]
    UnsupportedType {
        /// The `type` member.
        kind: String,
    },

    /// A geometry is missing a member or has one of the wrong shape.
    #[error("Malformed {kind}: {message}")]
    Malformed {
        /// Geometry type or document part.
        kind: String,
        /// What went wrong.
        message: String,
    },

    /// A topology operation was requested on a plain `GeoJSON` document.
    #[error("Expected a Topology document, got {kind}")]
    NotATopology {
        /// The document's `type` member.
        kind: String,
    },
}

impl From<geojson::Error> for TopologyError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(Box::new(e))
    }
}

/// One decoded feature: identifier, properties and geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Feature id. Numeric ids are rendered as strings.
    pub id: Option<String>,
    /// Property map, empty when the source had none.
    pub properties: Map<String, Value>,
    /// Geometry, `None` for null geometries.
    pub geometry: Option<Geometry<f64>>,
}

impl Feature {
    /// Returns the property `key`, if present.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Renders a JSON id (string or number) as a string.
pub(crate) fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
