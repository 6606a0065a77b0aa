//! Greyscale basemap of the nine county Bay Area.
//!
//! Every layer is an SVG group with a stable `id` so the exported file can
//! be finished in a vector editor. Layers, bottom to top: background,
//! land, (tracts, inserted later), county boundaries, major roads,
//! railways, places and labels.

use geo::Geometry;
use jobs_map_jobs_models::config::{BasemapObjects, MapLayout, Rect};
use jobs_map_palette::{Color, GREYS};
use jobs_map_topology::{Document, Feature, Topology, interior};

use crate::RenderError;
use crate::path::{centroid, path_data};
use crate::projection::ConicConformal;
use crate::svg::Element;

/// Id of the group the tract layer is inserted before.
pub const COUNTY_BOUNDARIES_ID: &str = "county-boundaries";

/// Id of the group holding every map layer.
pub const MAP_LAYERS_ID: &str = "map-layers";

const TEXT_SHADOW: &str = "-1.5px -1.5px white, -1.5px 1.5px white, 1.5px 1.5px white, \
     1.5px -1.5px white, -1.5px 0 white, 0 1.5px white, 1.5px 0 white, 0 -1.5px white";

const TEXT_OFFSET_Y: f64 = 3.0;

/// Per-map variations of the basemap styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BasemapStyle {
    /// Canvas background.
    pub background: Color,
    /// Whether the merged land polygon is drawn.
    pub land: bool,
    /// Width of the solid county boundary stroke.
    pub county_bottom_width: f64,
    /// Dash pattern of the top county boundary stroke.
    pub county_dash: &'static str,
    /// Stroke width of place markers.
    pub place_stroke_width: f64,
}

impl BasemapStyle {
    /// Style used under the jobs choropleth.
    pub const CHOROPLETH: Self = Self {
        background: GREYS[1],
        land: true,
        county_bottom_width: 1.25,
        county_dash: "6 2 2 2",
        place_stroke_width: 0.5,
    };

    /// Style used under the job density map.
    pub const DENSITY: Self = Self {
        background: Color::rgb(0xff, 0xff, 0xff),
        land: false,
        county_bottom_width: 1.0,
        county_dash: "3 1 1 1",
        place_stroke_width: 0.2,
    };
}

/// Projected, styled basemap layers. Built once per session.
#[derive(Debug, Clone, PartialEq)]
pub struct Basemap {
    width: f64,
    height: f64,
    projection: ConicConformal,
    background: Element,
    layers: Element,
}

impl Basemap {
    /// Fits the projection to the merged counties of `document` and builds
    /// every layer.
    ///
    /// # Errors
    ///
    /// Returns an error if `document` is not a topology or lacks one of
    /// the configured objects.
    pub fn build(
        document: &Document,
        objects: &BasemapObjects,
        layout: &MapLayout,
        style: BasemapStyle,
    ) -> Result<Self, RenderError> {
        let topology = document.topology()?;
        let land = topology.merge(&objects.counties)?;
        let (width, height) = (layout.width, layout.height());
        let projection = ConicConformal::bay_area().fit_size(width, height, &land);

        let background = Element::new("rect")
            .attr_num("width", width)
            .attr_num("height", height)
            .attr("x", "0")
            .attr("y", "0")
            .attr("fill", style.background.to_string());

        let mut layers = Element::new("g").attr("id", MAP_LAYERS_ID);

        if style.land {
            let d = path_data(&Geometry::MultiPolygon(projection.project_geometry(&land)));
            layers.push(
                Element::new("g").attr("id", "land").child(
                    Element::new("path")
                        .attr("d", d)
                        .attr("fill", "#fff")
                        .attr("stroke-width", "0.25")
                        .attr("stroke", GREYS[3].to_string())
                        .attr("stroke-linejoin", "round"),
                ),
            );
        }

        layers.push(county_boundaries(topology, &objects.counties, &projection, style)?);
        layers.push(roads(&topology.feature(&objects.roads)?, &projection));
        layers.push(railways(&topology.feature(&objects.railways)?, &projection));

        let places = topology.feature(&objects.places)?;
        layers.push(place_markers(&places, &projection, style));
        layers.push(
            Element::new("g")
                .attr("id", "labels")
                .child(county_labels(&topology.feature(&objects.counties)?, &projection))
                .child(place_labels(&places, &projection)),
        );

        log::info!("Built basemap layers ({width}x{height:.1})");

        Ok(Self {
            width,
            height,
            projection,
            background,
            layers,
        })
    }

    /// The fitted projection.
    #[must_use]
    pub const fn projection(&self) -> &ConicConformal {
        &self.projection
    }

    /// Canvas width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Canvas height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Assembles the full map: `tracts` goes just below the county
    /// boundaries, the crop `frame` (if any) on top.
    #[must_use]
    pub fn compose(&self, tracts: Element, frame: Option<&Rect>) -> Element {
        let mut layers = self.layers.clone();
        layers.insert_before(COUNTY_BOUNDARIES_ID, tracts);
        if let Some(frame) = frame {
            layers.push(frame_rect(frame));
        }

        Element::new("svg")
            .attr_num("width", self.width)
            .attr_num("height", self.height)
            .attr(
                "viewBox",
                format!("0 0 {} {}", crate::svg::num(self.width), crate::svg::num(self.height)),
            )
            .child(self.background.clone())
            .child(layers)
    }
}

/// The print crop rectangle.
#[must_use]
pub fn frame_rect(frame: &Rect) -> Element {
    Element::new("rect")
        .attr("id", "map-frame")
        .attr_num("x", frame.x)
        .attr_num("y", frame.y)
        .attr_num("width", frame.width)
        .attr_num("height", frame.height)
        .attr("fill", "none")
        .attr("stroke", "#000")
        .attr("stroke-width", "1")
}

fn project(feature: &Feature, projection: &ConicConformal) -> Option<Geometry<f64>> {
    feature
        .geometry
        .as_ref()
        .map(|g| projection.project_geometry(g))
}

fn name(feature: &Feature) -> Option<&str> {
    feature.property("name").and_then(serde_json::Value::as_str)
}

fn county_boundaries(
    topology: &Topology,
    object: &str,
    projection: &ConicConformal,
    style: BasemapStyle,
) -> Result<Element, RenderError> {
    let mesh = topology.mesh(object, interior)?;
    let d = path_data(&Geometry::MultiLineString(projection.project_geometry(&mesh)));

    let stroke = |id: &str, width: f64, color: Color| {
        Element::new("path")
            .attr("id", id)
            .attr("d", d.clone())
            .attr("fill", "none")
            .attr_num("stroke-width", width)
            .attr("stroke", color.to_string())
            .attr("stroke-linejoin", "bevel")
    };

    Ok(Element::new("g")
        .attr("id", COUNTY_BOUNDARIES_ID)
        .child(stroke("county-boundaries-bottom", style.county_bottom_width, GREYS[0]))
        .child(
            stroke("county-boundaries-top", 0.75, GREYS[5])
                .attr("stroke-dasharray", style.county_dash),
        ))
}

fn roads(features: &[Feature], projection: &ConicConformal) -> Element {
    let mut group = Element::new("g").attr("id", "major-roads");
    for feature in features {
        let Some(geometry) = project(feature, projection) else {
            continue;
        };
        let motorway = feature.property("type").and_then(serde_json::Value::as_str) == Some("motorway");
        group.push(
            Element::new("path")
                .attr("class", "road")
                .attr("fill", "none")
                .attr("stroke-width", if motorway { "0.5" } else { "0.3" })
                .attr("stroke", GREYS[3].to_string())
                .attr("stroke-linejoin", "round")
                .attr("d", path_data(&geometry)),
        );
    }
    group
}

fn railways(features: &[Feature], projection: &ConicConformal) -> Element {
    let mut group = Element::new("g").attr("id", "railways");
    for geometry in features.iter().filter_map(|f| project(f, projection)) {
        group.push(
            Element::new("path")
                .attr("class", "rail")
                .attr("fill", "none")
                .attr("stroke-width", "0.3")
                .attr("stroke", GREYS[3].to_string())
                .attr("stroke-linejoin", "round")
                .attr("stroke-dasharray", "1 1")
                .attr("d", path_data(&geometry)),
        );
    }
    group
}

fn place_markers(features: &[Feature], projection: &ConicConformal, style: BasemapStyle) -> Element {
    let mut group = Element::new("g").attr("id", "places");
    for point in features
        .iter()
        .filter_map(|f| project(f, projection))
        .filter_map(|g| centroid(&g))
    {
        group.push(
            Element::new("circle")
                .attr("class", "place")
                .attr_num("cx", point.x())
                .attr_num("cy", point.y())
                .attr("r", "1.5")
                .attr("fill", "white")
                .attr("stroke", GREYS[5].to_string())
                .attr_num("stroke-width", style.place_stroke_width),
        );
    }
    group
}

fn county_labels(counties: &[Feature], projection: &ConicConformal) -> Element {
    let mut group = Element::new("g").attr("id", "county-labels");
    for county in counties {
        let (Some(label), Some(point)) = (
            name(county),
            project(county, projection).and_then(|g| centroid(&g)),
        ) else {
            continue;
        };
        group.push(
            Element::new("text")
                .attr("class", "county-label")
                .attr_num("x", point.x())
                .attr_num("y", point.y())
                .attr("text-anchor", "middle")
                .attr("fill", GREYS[7].to_string())
                .attr(
                    "style",
                    format!("font: 9px sans-serif; text-transform: uppercase; text-shadow: {TEXT_SHADOW}"),
                )
                .text(label),
        );
    }
    group
}

fn place_labels(places: &[Feature], projection: &ConicConformal) -> Element {
    let mut group = Element::new("g").attr("id", "place-labels");
    for place in places {
        let (Some(label), Some(point)) = (
            name(place),
            project(place, projection).and_then(|g| centroid(&g)),
        ) else {
            continue;
        };
        group.push(
            Element::new("text")
                .attr("class", "place-label")
                .attr_num("x", point.x())
                .attr_num("y", point.y() - TEXT_OFFSET_Y)
                .attr("text-anchor", "end")
                .attr("fill", GREYS[7].to_string())
                .attr("style", format!("font: 7px sans-serif; text-shadow: {TEXT_SHADOW}"))
                .text(label),
        );
    }
    group
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// Two adjacent counties with a road, a railway and two places.
    pub(crate) fn basemap_document() -> Document {
        Document::from_value(json!({
            "type": "Topology",
            "arcs": [
                [[-122.0, 37.0], [-122.0, 38.0]],
                [[-122.0, 38.0], [-123.0, 38.0], [-123.0, 37.0], [-122.0, 37.0]],
                [[-122.0, 37.0], [-121.0, 37.0], [-121.0, 38.0], [-122.0, 38.0]],
                [[-122.8, 37.5], [-121.2, 37.5]],
                [[-122.5, 37.2], [-121.5, 37.8]]
            ],
            "objects": {
                "county_boundaries": {"type": "GeometryCollection", "geometries": [
                    {"type": "Polygon", "arcs": [[0, 1]], "properties": {"name": "Marin"}},
                    {"type": "Polygon", "arcs": [[2, -1]], "properties": {"name": "Napa"}}
                ]},
                "osm_major_roads": {"type": "GeometryCollection", "geometries": [
                    {"type": "LineString", "arcs": [3], "properties": {"type": "motorway"}}
                ]},
                "osm_railways": {"type": "GeometryCollection", "geometries": [
                    {"type": "LineString", "arcs": [4]}
                ]},
                "osm_cities_towns": {"type": "GeometryCollection", "geometries": [
                    {"type": "Point", "coordinates": [-122.4, 37.7], "properties": {"name": "Oakland & Co"}},
                    {"type": "Point", "coordinates": [-121.9, 37.3]}
                ]}
            }
        }))
        .unwrap()
    }

    pub(crate) fn objects() -> BasemapObjects {
        BasemapObjects {
            counties: "county_boundaries".to_string(),
            roads: "osm_major_roads".to_string(),
            railways: "osm_railways".to_string(),
            places: "osm_cities_towns".to_string(),
        }
    }

    pub(crate) fn layout() -> MapLayout {
        MapLayout {
            width: 960.0,
            aspect_ratio: 1.294_117_647_1,
            frame: Rect {
                x: 403.0,
                y: 561.0,
                width: 334.0,
                height: 432.0,
            },
        }
    }

    fn layer_ids(svg: &Element) -> Vec<String> {
        svg.find_by_id(MAP_LAYERS_ID)
            .unwrap()
            .elements()
            .filter_map(|e| e.get_attr("id").map(str::to_string))
            .collect()
    }

    #[test]
    fn layers_are_ordered_with_stable_ids() {
        let basemap =
            Basemap::build(&basemap_document(), &objects(), &layout(), BasemapStyle::CHOROPLETH)
                .unwrap();
        let svg = basemap.compose(Element::new("g").attr("id", "tracts"), Some(&layout().frame));

        assert_eq!(
            layer_ids(&svg),
            [
                "land",
                "tracts",
                "county-boundaries",
                "major-roads",
                "railways",
                "places",
                "labels",
                "map-frame"
            ]
        );
        assert_eq!(svg.get_attr("width"), Some("960"));
    }

    #[test]
    fn county_boundaries_are_interior_mesh_with_two_strokes() {
        let basemap =
            Basemap::build(&basemap_document(), &objects(), &layout(), BasemapStyle::CHOROPLETH)
                .unwrap();
        let svg = basemap.compose(Element::new("g"), None);

        let bottom = svg.find_by_id("county-boundaries-bottom").unwrap();
        let top = svg.find_by_id("county-boundaries-top").unwrap();
        assert_eq!(bottom.get_attr("stroke-width"), Some("1.25"));
        assert_eq!(top.get_attr("stroke-dasharray"), Some("6 2 2 2"));
        assert_eq!(bottom.get_attr("d"), top.get_attr("d"));
        assert_eq!(bottom.get_attr("d").unwrap().matches('M').count(), 1);
        assert!(svg.find_by_id("map-frame").is_none());
    }

    #[test]
    fn roads_places_and_labels() {
        let basemap =
            Basemap::build(&basemap_document(), &objects(), &layout(), BasemapStyle::CHOROPLETH)
                .unwrap();
        let svg = basemap.compose(Element::new("g"), None);

        let roads = svg.find_by_id("major-roads").unwrap();
        assert_eq!(roads.elements().next().unwrap().get_attr("stroke-width"), Some("0.5"));

        let places = svg.find_by_id("places").unwrap();
        assert_eq!(places.elements().count(), 2);

        let county_labels = svg.find_by_id("county-labels").unwrap();
        let names: Vec<String> = county_labels.elements().map(Element::text_content).collect();
        assert_eq!(names, ["Marin", "Napa"]);

        let place_labels = svg.find_by_id("place-labels").unwrap();
        assert_eq!(place_labels.elements().count(), 1);
        assert!(svg.to_markup().contains("Oakland &amp; Co"));
    }

    #[test]
    fn density_style_skips_land() {
        let basemap =
            Basemap::build(&basemap_document(), &objects(), &layout(), BasemapStyle::DENSITY)
                .unwrap();
        let svg = basemap.compose(Element::new("g").attr("id", "tracts"), None);
        assert_eq!(layer_ids(&svg)[0], "tracts");
        assert!(svg.find_by_id("land").is_none());
    }

    #[test]
    fn geojson_basemap_is_rejected() {
        let document = Document::parse(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(Basemap::build(&document, &objects(), &layout(), BasemapStyle::CHOROPLETH).is_err());
    }
}
