#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map rendering: projection, SVG scene building, the tract choropleth,
//! the job density map, legends and export.
//!
//! A [`Session`] owns the loaded documents and everything derived from
//! them. Each [`Session::update`] renders a new tract layer from an
//! immutable [`ViewState`](jobs_map_jobs_models::ViewState) and reports
//! the keyed difference against the previous render.

pub mod basemap;
pub mod choropleth;
pub mod density;
pub mod diff;
pub mod export;
pub mod legend;
pub mod path;
pub mod projection;
pub mod session;
pub mod svg;

use jobs_map_jobs::ScaleError;
use jobs_map_topology::TopologyError;
use thiserror::Error;

pub use basemap::{Basemap, BasemapStyle};
pub use choropleth::{RenderedTract, TractLayer, TractShape, render_tracts};
pub use diff::LayerDiff;
pub use export::{Export, ExportError};
pub use projection::ConicConformal;
pub use session::Session;
pub use svg::Element;

/// Errors raised while building map layers.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A document could not be decoded into the needed geometry.
    #[error("Topology error: {0}")]
    Topology(#[from] TopologyError),

    /// The classifier for the view could not be built.
    #[error("Scale error: {0}")]
    Scale(#[from] ScaleError),
}
