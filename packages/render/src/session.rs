//! Render session: loaded data, derived layers and the last render.

use std::collections::HashMap;

use jobs_map_classify::Legend;
use jobs_map_jobs::{ActiveScale, Tract, tracts_from_features};
use jobs_map_jobs_models::config::MapConfig;
use jobs_map_jobs_models::{Category, Mode, ViewState};
use jobs_map_topology::Document;

use crate::basemap::{Basemap, BasemapStyle};
use crate::choropleth::{TractBoundaries, TractLayer, TractShape, project_tracts, render_tracts, tracts_group};
use crate::density::{DENSITY_LEGEND_NAME, DENSITY_MAP_NAME, density_group, density_legend};
use crate::diff::LayerDiff;
use crate::export::{Export, ExportError};
use crate::legend::legend_svg;
use crate::RenderError;

/// Owns everything derived from the two loaded documents.
///
/// Basemap layers, projected tract paths and tract boundaries are built
/// once. Each [`Session::update`] replaces the last rendered tract layer
/// and legend; exports read whatever was rendered last.
pub struct Session {
    config: MapConfig,
    tracts: Vec<Tract>,
    shapes: Vec<TractShape>,
    boundaries: Option<TractBoundaries>,
    choropleth: Basemap,
    density: Basemap,
    scales: HashMap<(Category, Mode), ActiveScale>,
    current: Option<TractLayer>,
    legend: Option<Legend>,
}

impl Session {
    /// Builds the basemaps and projects the tracts.
    ///
    /// # Errors
    ///
    /// Returns an error if the basemap is not a topology with the
    /// configured objects, or the tract document cannot be decoded.
    pub fn new(config: MapConfig, tracts: &Document, basemap: &Document) -> Result<Self, RenderError> {
        let objects = &config.data.basemap_objects;
        let choropleth = Basemap::build(basemap, objects, &config.map, BasemapStyle::CHOROPLETH)?;
        let density = Basemap::build(basemap, objects, &config.map, BasemapStyle::DENSITY)?;

        let records = tracts_from_features(tracts.features(None)?);
        let shapes = project_tracts(records.clone(), choropleth.projection());

        let boundaries = match tracts {
            Document::Topology(topology) => {
                Some(TractBoundaries::build(topology, choropleth.projection())?)
            }
            Document::Features(_) => {
                log::debug!("Tracts are plain GeoJSON; skipping tract boundaries");
                None
            }
        };

        log::info!("Session ready with {} tracts", records.len());

        Ok(Self {
            config,
            tracts: records,
            shapes,
            boundaries,
            choropleth,
            density,
            scales: HashMap::new(),
            current: None,
            legend: None,
        })
    }

    /// Renders the tract layer for `view` and reports what changed since
    /// the previous render.
    ///
    /// # Errors
    ///
    /// Returns an error if the scale for the view cannot be built.
    pub fn update(&mut self, view: ViewState) -> Result<LayerDiff, RenderError> {
        let key = (view.category, view.mode);
        if !self.scales.contains_key(&key) {
            let scale = ActiveScale::build(&self.config, &self.tracts, view.category, view.mode)?;
            self.scales.insert(key, scale);
        }
        let scale = &self.scales[&key];

        let layer = render_tracts(&self.shapes, scale, &view);
        let legend = scale.legend().clone();
        let diff = LayerDiff::between(self.current.as_ref(), &layer);

        log::debug!(
            "Rendered {}/{} floor {}: {} entered, {} updated, {} exited, {} unchanged",
            view.category,
            view.mode,
            view.floor.value(),
            diff.entered.len(),
            diff.updated.len(),
            diff.exited.len(),
            diff.unchanged
        );

        self.current = Some(layer);
        self.legend = Some(legend);
        Ok(diff)
    }

    /// The loaded configuration.
    #[must_use]
    pub const fn config(&self) -> &MapConfig {
        &self.config
    }

    /// The tracts in input order.
    #[must_use]
    pub fn tracts(&self) -> &[Tract] {
        &self.tracts
    }

    /// View state of the last render.
    #[must_use]
    pub fn view(&self) -> Option<ViewState> {
        self.current.as_ref().map(|layer| layer.view)
    }

    /// The last rendered tract layer.
    #[must_use]
    pub const fn layer(&self) -> Option<&TractLayer> {
        self.current.as_ref()
    }

    /// The legend of the last render.
    #[must_use]
    pub const fn legend(&self) -> Option<&Legend> {
        self.legend.as_ref()
    }

    /// Scale used by the last render.
    #[must_use]
    pub fn active_scale(&self) -> Option<&ActiveScale> {
        let view = self.view()?;
        self.scales.get(&(view.category, view.mode))
    }

    /// The last rendered map as a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotRendered`] before the first update.
    pub fn export_map(&self) -> Result<Export, ExportError> {
        let layer = self.current.as_ref().ok_or(ExportError::NotRendered)?;
        let frame = layer.view.frame_visible.then_some(&self.config.map.frame);
        let root = self
            .choropleth
            .compose(tracts_group(layer, self.boundaries.as_ref()), frame);
        Ok(Export::new(layer.view.map_export_name(), &root))
    }

    /// The last rendered legend as a standalone SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::NotRendered`] before the first update.
    pub fn export_legend(&self) -> Result<Export, ExportError> {
        let (Some(layer), Some(legend)) = (self.current.as_ref(), self.legend.as_ref()) else {
            return Err(ExportError::NotRendered);
        };
        Ok(Export::new(
            layer.view.legend_export_name(),
            &legend_svg(legend, &self.config.legend),
        ))
    }

    /// The job density map. Independent of the view state.
    #[must_use]
    pub fn export_density_map(&self) -> Export {
        let group = density_group(&self.shapes, &self.config.density, self.boundaries.as_ref());
        let root = self.density.compose(group, Some(&self.config.map.frame));
        Export::new(DENSITY_MAP_NAME, &root)
    }

    /// The job density legend.
    #[must_use]
    pub fn export_density_legend(&self) -> Export {
        let legend = density_legend(&self.config.density);
        Export::new(DENSITY_LEGEND_NAME, &legend_svg(&legend, &self.config.legend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basemap::tests::basemap_document;
    use crate::choropleth::tests::tract_document;
    use jobs_map_classify::Classifier;
    use jobs_map_jobs::map_config;
    use jobs_map_jobs_models::DensityFloor;

    fn session() -> Session {
        Session::new(map_config(), &tract_document(), &basemap_document()).unwrap()
    }

    #[test]
    fn export_before_render_fails() {
        let session = session();
        assert!(matches!(session.export_map(), Err(ExportError::NotRendered)));
        assert!(matches!(session.export_legend(), Err(ExportError::NotRendered)));
        assert!(session.legend().is_none());
    }

    #[test]
    fn updates_diff_against_previous_render() {
        let mut session = session();
        let view = ViewState::default();

        let first = session.update(view).unwrap();
        assert_eq!(first.entered, ["06001", "06002", "06003"]);

        let same = session.update(view).unwrap();
        assert!(same.is_empty());
        assert_eq!(same.unchanged, 3);

        let open = session
            .update(view.with_floor(DensityFloor::new(0).unwrap()))
            .unwrap();
        assert_eq!(open.updated, ["06002"]);
        assert_eq!(open.unchanged, 2);
    }

    #[test]
    fn export_names_follow_view() {
        let mut session = session();
        let view = ViewState::default().with_floor(DensityFloor::new(0).unwrap());

        session.update(view).unwrap();
        assert_eq!(session.export_map().unwrap().name, "map-prof-lq2015");
        assert_eq!(session.export_legend().unwrap().name, "legend-prof-lq2015");

        session.update(view.toggled_mode()).unwrap();
        assert_eq!(session.export_map().unwrap().name, "map-prof-change");
        assert_eq!(session.export_legend().unwrap().name, "legend-prof-change");
    }

    #[test]
    fn legend_tracks_classifier_across_views() {
        let mut session = session();
        for &category in Category::ALL {
            for mode in [Mode::Level, Mode::Change] {
                session
                    .update(ViewState::default().with_category(category).with_mode(mode))
                    .unwrap();
                let scale = session.active_scale().unwrap();
                assert_eq!(session.legend().unwrap(), scale.legend());
                if !session.legend().unwrap().entries.is_empty() {
                    assert_eq!(session.legend().unwrap().breaks(), scale.scale().breaks());
                }
            }
        }
    }

    #[test]
    fn frame_toggle_controls_map_frame() {
        let mut session = session();
        session.update(ViewState::default()).unwrap();
        let framed = session.export_map().unwrap();
        assert!(framed.svg.contains("id=\"map-frame\""));

        session.update(ViewState::default().with_frame(false)).unwrap();
        let bare = session.export_map().unwrap();
        assert!(!bare.svg.contains("id=\"map-frame\""));

        let tracts = bare.svg.find("id=\"tracts\"").unwrap();
        let counties = bare.svg.find("id=\"county-boundaries\"").unwrap();
        assert!(tracts < counties);
        assert!(bare.svg.contains("id=\"tract-boundaries\""));
    }

    #[test]
    fn density_exports_do_not_need_a_render() {
        let session = session();
        let map = session.export_density_map();
        let legend = session.export_density_legend();

        assert_eq!(map.file_name(), "job-density-map.svg");
        assert!(map.svg.contains("stroke-width=\"0.05\""));
        assert!(!map.svg.contains("id=\"land\""));
        assert_eq!(legend.name, "job-density-legend");
        assert!(legend.svg.contains("Number of jobs per square mile"));
    }

    #[test]
    fn geojson_tracts_render_without_boundaries() {
        let tracts = Document::parse(
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "properties": {"GEOID": "1", "prof_15": 1.0, "quintile": 2},
                 "geometry": {"type": "Polygon", "coordinates": [[[-122.5, 37.5], [-122.0, 37.5], [-122.0, 38.0], [-122.5, 37.5]]]}}
            ]}"#,
        )
        .unwrap();
        let mut session = Session::new(map_config(), &tracts, &basemap_document()).unwrap();
        session.update(ViewState::default()).unwrap();

        let map = session.export_map().unwrap();
        assert!(map.svg.contains("class=\"tract-poly\""));
        assert!(!map.svg.contains("id=\"tract-boundaries\""));
    }
}
