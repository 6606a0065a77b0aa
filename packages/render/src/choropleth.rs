//! The tract choropleth layer.
//!
//! [`render_tracts`] is a pure function of the projected tracts, the
//! active scale and the view state. Fill comes from the classified value
//! only; the density floor only ever changes opacity.

use std::sync::Arc;

use geo::Geometry;
use jobs_map_jobs::{ActiveScale, Tract};
use jobs_map_jobs_models::ViewState;
use jobs_map_palette::{Color, GREYS};
use jobs_map_topology::{Topology, interior};

use crate::RenderError;
use crate::path::path_data;
use crate::projection::ConicConformal;
use crate::svg::Element;

/// Opacity of tracts at or above the density floor.
pub const FULL_OPACITY: f64 = 1.0;

/// Opacity of tracts below the density floor.
pub const DIMMED_OPACITY: f64 = 0.2;

/// Tooltip text for tracts without a value.
pub const NO_DATA_TITLE: &str = "no data";

/// A tract with its projected SVG path data. Built once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct TractShape {
    /// The tract.
    pub tract: Tract,
    /// Projected path data, empty for tracts without geometry.
    pub path: Arc<str>,
}

/// Projects every tract once.
#[must_use]
pub fn project_tracts(tracts: Vec<Tract>, projection: &ConicConformal) -> Vec<TractShape> {
    tracts
        .into_iter()
        .map(|tract| {
            let path: Arc<str> = tract
                .geometry
                .as_ref()
                .map(|g| path_data(&projection.project_geometry(g)))
                .unwrap_or_default()
                .into();
            TractShape { tract, path }
        })
        .collect()
}

/// Display attributes of one tract in one render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTract {
    /// Census GEOID.
    pub geoid: String,
    /// Projected path data.
    pub d: Arc<str>,
    /// Fill swatch.
    pub fill: Color,
    /// 1.0 at or above the density floor, 0.2 below it.
    pub opacity: f64,
    /// Tooltip text: the raw value used, or `no data`.
    pub title: String,
}

impl RenderedTract {
    /// The tract as a `path` element with a `<title>` tooltip.
    #[must_use]
    pub fn to_element(&self) -> Element {
        Element::new("path")
            .attr("class", "tract-poly")
            .attr("data-geoid", self.geoid.as_str())
            .attr("d", &*self.d)
            .attr("fill", self.fill.to_string())
            .attr("fill-rule", "evenodd")
            .attr_num("opacity", self.opacity)
            .child(Element::new("title").text(self.title.as_str()))
    }
}

/// One rendered tract layer and the view it was rendered for.
#[derive(Debug, Clone, PartialEq)]
pub struct TractLayer {
    /// View state the layer reflects.
    pub view: ViewState,
    /// Tracts in input order.
    pub tracts: Vec<RenderedTract>,
}

impl TractLayer {
    /// Looks up a tract by GEOID. The last tract with a duplicated GEOID
    /// wins.
    #[must_use]
    pub fn get(&self, geoid: &str) -> Option<&RenderedTract> {
        self.tracts.iter().rev().find(|t| t.geoid == geoid)
    }
}

/// Opacity for a tract in `quintile` under `view`.
#[must_use]
pub fn opacity(view: &ViewState, quintile: Option<u8>) -> f64 {
    if view.floor.admits(quintile) {
        FULL_OPACITY
    } else {
        DIMMED_OPACITY
    }
}

/// Renders the tract layer for `view`.
///
/// `scale` must be the scale built for `view.category` and `view.mode`.
#[must_use]
pub fn render_tracts(shapes: &[TractShape], scale: &ActiveScale, view: &ViewState) -> TractLayer {
    debug_assert_eq!((scale.category, scale.mode), (view.category, view.mode));

    let tracts = shapes
        .iter()
        .map(|shape| {
            let value = shape.tract.values(view.category).for_mode(view.mode);
            RenderedTract {
                geoid: shape.tract.geoid.clone(),
                d: Arc::clone(&shape.path),
                fill: scale.color_for(value),
                opacity: opacity(view, shape.tract.quintile),
                title: value.map_or_else(|| NO_DATA_TITLE.to_string(), |v| v.to_string()),
            }
        })
        .collect();

    TractLayer { view: *view, tracts }
}

/// Projected tract mesh and outline, drawn over the tract fills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TractBoundaries {
    mesh: String,
    outline: String,
}

impl TractBoundaries {
    /// Builds the interior mesh and merged outline of the first object in
    /// `topology`.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology has no objects or references
    /// missing arcs.
    pub fn build(topology: &Topology, projection: &ConicConformal) -> Result<Self, RenderError> {
        let (name, _) = topology.first_object()?;
        let mesh = topology.mesh(name, interior)?;
        let outline = topology.merge(name)?;

        Ok(Self {
            mesh: path_data(&Geometry::MultiLineString(projection.project_geometry(&mesh))),
            outline: path_data(&Geometry::MultiPolygon(projection.project_geometry(&outline))),
        })
    }

    /// Shared boundaries between tracts.
    #[must_use]
    pub fn mesh_path(&self, stroke_width: f64) -> Element {
        Element::new("path")
            .attr("id", "tract-boundaries")
            .attr("d", self.mesh.as_str())
            .attr("fill", "none")
            .attr_num("stroke-width", stroke_width)
            .attr("stroke", GREYS[0].to_string())
            .attr("stroke-linejoin", "round")
    }

    /// Outer edge of all tracts.
    #[must_use]
    pub fn outline_path(&self) -> Element {
        Element::new("path")
            .attr("id", "tract-outline")
            .attr("d", self.outline.as_str())
            .attr("fill", "none")
            .attr("stroke-width", "0.3")
            .attr("stroke", GREYS[4].to_string())
            .attr("stroke-linejoin", "round")
    }
}

/// The `tracts` group of the choropleth map.
#[must_use]
pub fn tracts_group(layer: &TractLayer, boundaries: Option<&TractBoundaries>) -> Element {
    let mut group = Element::new("g").attr("id", "tracts");
    for tract in layer.tracts.iter().filter(|t| !t.d.is_empty()) {
        group.push(tract.to_element());
    }
    if let Some(boundaries) = boundaries {
        group.push(boundaries.mesh_path(0.3));
        group.push(boundaries.outline_path());
    }
    group
}
