#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Job category, view state and map configuration types.
//!
//! Tract employment is grouped into four super categories. Each category
//! reads two properties off a tract feature: `{code}_c` (change in
//! location quotient, 2002 to 2015) and `{code}_15` (2015 location
//! quotient). The [`ViewState`] captures every user-controlled input that
//! affects what is drawn.

pub mod config;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Job super categories aggregated from LEHD NAICS sectors.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Manufacturing, construction, utilities, agriculture.
    Make,
    /// Retail, food, accommodation, arts.
    Serv,
    /// Information, finance, real estate, professional services.
    #[default]
    Prof,
    /// Education, health care, administrative and other services.
    Supp,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: &[Self] = &[Self::Make, Self::Serv, Self::Prof, Self::Supp];

    /// Short code used in property names and export file names.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Make => "make",
            Self::Serv => "serv",
            Self::Prof => "prof",
            Self::Supp => "supp",
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Make => "Makers",
            Self::Serv => "Service",
            Self::Prof => "Professional",
            Self::Supp => "Support",
        }
    }

    /// Property holding the 2002 to 2015 change in location quotient.
    #[must_use]
    pub fn change_property(self) -> String {
        format!("{}_c", self.code())
    }

    /// Property holding the 2015 location quotient.
    #[must_use]
    pub fn level_property(self) -> String {
        format!("{}_15", self.code())
    }
}

/// Which value of the selected category is mapped.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    /// Change in location quotient from 2002 to 2015 (diverging ramp,
    /// fixed thresholds).
    Change,
    /// 2015 location quotient (sequential ramp, data-driven breaks).
    #[default]
    Level,
}

impl Mode {
    /// Returns the other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Change => Self::Level,
            Self::Level => Self::Change,
        }
    }

    /// Slug used in export file names.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Change => "change",
            Self::Level => "lq2015",
        }
    }

    /// Human-readable description of the mapped value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Change => "Change in Location Quotient, 2002 – 2015",
            Self::Level => "2015 Location Quotient",
        }
    }
}

/// Lowest job density quintile drawn at full opacity.
///
/// Tracts in lower quintiles are de-emphasized, not hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DensityFloor(u8);

impl DensityFloor {
    /// Highest quintile index.
    pub const MAX: u8 = 4;

    /// Creates a floor.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDensityFloorError`] if `value` is above
    /// [`Self::MAX`].
    pub const fn new(value: u8) -> Result<Self, InvalidDensityFloorError> {
        if value > Self::MAX {
            return Err(InvalidDensityFloorError { value });
        }
        Ok(Self(value))
    }

    /// Returns the quintile index.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Whether a tract with `quintile` is at or above the floor.
    ///
    /// A tract without a quintile never passes, not even a floor of zero.
    #[must_use]
    pub fn admits(self, quintile: Option<u8>) -> bool {
        quintile.is_some_and(|q| q >= self.0)
    }
}

impl Default for DensityFloor {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for DensityFloor {
    type Error = InvalidDensityFloorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DensityFloor> for u8 {
    fn from(floor: DensityFloor) -> Self {
        floor.0
    }
}

/// Error returned when a density floor is outside `0..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDensityFloorError {
    /// The rejected value.
    pub value: u8,
}

impl std::fmt::Display for InvalidDensityFloorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid density floor {}: expected 0-{}",
            self.value,
            DensityFloor::MAX
        )
    }
}

impl std::error::Error for InvalidDensityFloorError {}

/// Everything the user controls that affects the choropleth.
///
/// Immutable: each control produces a new value via the `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    /// Selected job category.
    pub category: Category,
    /// Change or level.
    pub mode: Mode,
    /// Density quintile floor for full opacity.
    pub floor: DensityFloor,
    /// Whether the print crop frame is drawn.
    pub frame_visible: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            category: Category::default(),
            mode: Mode::default(),
            floor: DensityFloor::default(),
            frame_visible: true,
        }
    }
}

impl ViewState {
    /// Returns a copy with `category` selected.
    #[must_use]
    pub const fn with_category(self, category: Category) -> Self {
        Self { category, ..self }
    }

    /// Returns a copy with `mode` selected.
    #[must_use]
    pub const fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// Returns a copy with the mode flipped.
    #[must_use]
    pub const fn toggled_mode(self) -> Self {
        self.with_mode(self.mode.toggled())
    }

    /// Returns a copy with `floor` selected.
    #[must_use]
    pub const fn with_floor(self, floor: DensityFloor) -> Self {
        Self { floor, ..self }
    }

    /// Returns a copy with the frame shown or hidden.
    #[must_use]
    pub const fn with_frame(self, frame_visible: bool) -> Self {
        Self {
            frame_visible,
            ..self
        }
    }

    /// Artifact name of the map export, e.g. `map-prof-lq2015`.
    #[must_use]
    pub fn map_export_name(&self) -> String {
        format!("map-{}-{}", self.category.code(), self.mode.slug())
    }

    /// Artifact name of the legend export, e.g. `legend-prof-change`.
    #[must_use]
    pub fn legend_export_name(&self) -> String {
        format!("legend-{}-{}", self.category.code(), self.mode.slug())
    }
}

/// Values resolved for one tract and one category.
///
/// `None` means the source property was missing or not numeric. It is
/// never conflated with zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TractValues {
    /// Change in location quotient, 2002 to 2015.
    pub change: Option<f64>,
    /// 2015 location quotient.
    pub level: Option<f64>,
}

impl TractValues {
    /// The value mapped in `mode`.
    #[must_use]
    pub const fn for_mode(&self, mode: Mode) -> Option<f64> {
        match mode {
            Mode::Change => self.change,
            Mode::Level => self.level,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_codes_roundtrip() {
        for category in Category::ALL {
            assert_eq!(category.to_string(), category.code());
            assert_eq!(category.code().parse::<Category>().unwrap(), *category);
        }
    }

    #[test]
    fn category_property_names() {
        assert_eq!(Category::Prof.change_property(), "prof_c");
        assert_eq!(Category::Make.level_property(), "make_15");
    }

    #[test]
    fn defaults_match_initial_view() {
        let view = ViewState::default();
        assert_eq!(view.category, Category::Prof);
        assert_eq!(view.mode, Mode::Level);
        assert_eq!(view.floor.value(), 1);
        assert!(view.frame_visible);
    }

    #[test]
    fn export_names_follow_view() {
        let view = ViewState::default().with_floor(DensityFloor::new(0).unwrap());
        assert_eq!(view.map_export_name(), "map-prof-lq2015");
        assert_eq!(view.legend_export_name(), "legend-prof-lq2015");

        let changed = view.toggled_mode();
        assert_eq!(changed.map_export_name(), "map-prof-change");
        assert_eq!(
            changed.with_category(Category::Supp).legend_export_name(),
            "legend-supp-change"
        );
    }

    #[test]
    fn with_methods_leave_original_untouched() {
        let view = ViewState::default();
        let next = view.with_category(Category::Make).with_frame(false);
        assert_eq!(view.category, Category::Prof);
        assert!(view.frame_visible);
        assert_eq!(next.category, Category::Make);
        assert!(!next.frame_visible);
        assert_eq!(next.mode, view.mode);
    }

    #[test]
    fn density_floor_range() {
        for v in 0..=DensityFloor::MAX {
            assert_eq!(DensityFloor::new(v).unwrap().value(), v);
        }
        assert_eq!(
            DensityFloor::new(5),
            Err(InvalidDensityFloorError { value: 5 })
        );
    }

    #[test]
    fn density_floor_admits() {
        let floor = DensityFloor::new(2).unwrap();
        assert!(floor.admits(Some(2)));
        assert!(floor.admits(Some(4)));
        assert!(!floor.admits(Some(1)));
        assert!(!floor.admits(None));
        assert!(DensityFloor::new(0).unwrap().admits(Some(0)));
        assert!(!DensityFloor::new(0).unwrap().admits(None));
    }

    #[test]
    fn values_for_mode() {
        let values = TractValues {
            change: Some(-0.4),
            level: None,
        };
        assert_eq!(values.for_mode(Mode::Change), Some(-0.4));
        assert_eq!(values.for_mode(Mode::Level), None);
    }
}
