//! TOML schema for the map configuration.
//!
//! One file describes where the data lives, which ramps each category
//! uses, the fixed change thresholds, the density quintile ranges, and the
//! geometry of the map, frame and legend.

use jobs_map_palette::Scheme;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{Category, Mode};

/// Complete map configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// Remote data documents.
    pub data: DataConfig,
    /// Per-category ramp bindings.
    pub categories: Vec<CategoryConfig>,
    /// Change-mode classification.
    pub change: ChangeConfig,
    /// Level-mode classification.
    pub level: LevelConfig,
    /// Job density map.
    pub density: DensityConfig,
    /// Map canvas.
    pub map: MapLayout,
    /// Legend canvas.
    pub legend: LegendLayout,
}

impl MapConfig {
    /// Returns the ramp binding for `category`.
    #[must_use]
    pub fn category(&self, category: Category) -> Option<&CategoryConfig> {
        self.categories.iter().find(|c| c.category == category)
    }
}

/// Locations and object names of the two topology documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Census tract topology (first object holds the tracts).
    pub tracts_url: String,
    /// Basemap topology.
    pub basemap_url: String,
    /// Object names inside the basemap topology.
    pub basemap_objects: BasemapObjects,
}

/// Object names of the basemap layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasemapObjects {
    /// County polygons.
    pub counties: String,
    /// Major road lines.
    pub roads: String,
    /// Railway lines.
    pub railways: String,
    /// City and town points.
    pub places: String,
}

/// Ramp binding of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    /// The category.
    pub category: Category,
    /// Diverging scheme used in change mode.
    pub change_scheme: Scheme,
    /// Sequential scheme used in level mode.
    pub level_scheme: Scheme,
}

impl CategoryConfig {
    /// The scheme used in `mode`.
    #[must_use]
    pub const fn scheme(&self, mode: Mode) -> Scheme {
        match mode {
            Mode::Change => self.change_scheme,
            Mode::Level => self.level_scheme,
        }
    }
}

/// Fixed thresholds for change mode, shared by all categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeConfig {
    /// Strictly increasing breakpoints, one fewer than ramp swatches.
    pub breaks: Vec<f64>,
}

/// Data-driven classification strategy for level mode.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LevelScale {
    /// Ckmeans natural breaks.
    #[default]
    Cluster,
    /// Equal-count quantiles.
    Quantile,
}

/// Level-mode classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Strategy used to compute breakpoints.
    #[serde(default)]
    pub scale: LevelScale,
}

/// Job density map settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    /// Sequential scheme indexed by quintile.
    pub scheme: Scheme,
    /// Jobs per square mile covered by each quintile, `[start, end]`.
    pub quintiles: Vec<[f64; 2]>,
}

/// Map canvas geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Canvas width in pixels.
    pub width: f64,
    /// Height divided by width.
    pub aspect_ratio: f64,
    /// Print crop frame.
    pub frame: Rect,
}

impl MapLayout {
    /// Canvas height in pixels.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.width * self.aspect_ratio
    }
}

/// Axis-aligned rectangle in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Legend canvas geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendLayout {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Space around the swatch strip.
    pub margin: Margin,
}

/// Margins around a drawing area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}
