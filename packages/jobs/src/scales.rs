//! The classifier and legend for the current category and mode.
//!
//! Change mode uses the configured fixed thresholds with the category's
//! diverging ramp. Level mode computes breaks from the category's level
//! values across all tracts, using the configured strategy and the
//! category's sequential ramp. The legend is always derived from the same
//! classifier that colors the map.

use jobs_map_classify::{
    Classifier, ClusterScale, Extent, Legend, QuantileScale, ThresholdScale,
};
use jobs_map_jobs_models::config::{LevelScale, MapConfig};
use jobs_map_jobs_models::{Category, Mode};
use jobs_map_palette::{Color, NO_DATA};

use crate::{ScaleError, Tract};

/// One of the supported classification strategies.
#[derive(Debug, Clone, PartialEq)]
pub enum Scale {
    /// Fixed breakpoints.
    Threshold(ThresholdScale),
    /// Ckmeans natural breaks.
    Cluster(ClusterScale),
    /// Equal-count quantiles.
    Quantile(QuantileScale),
}

impl Scale {
    fn inner(&self) -> &dyn Classifier {
        match self {
            Self::Threshold(s) => s,
            Self::Cluster(s) => s,
            Self::Quantile(s) => s,
        }
    }
}

impl Classifier for Scale {
    fn breaks(&self) -> &[f64] {
        self.inner().breaks()
    }

    fn ramp(&self) -> &[Color] {
        self.inner().ramp()
    }
}

/// Classifier, data extent and legend for one category and mode.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveScale {
    /// Category the scale was built for.
    pub category: Category,
    /// Mode the scale was built for.
    pub mode: Mode,
    scale: Scale,
    extent: Option<Extent>,
    legend: Legend,
}

impl ActiveScale {
    /// Builds the scale for `category` in `mode` from `tracts`.
    ///
    /// # Errors
    ///
    /// Returns an error if the category has no ramp binding or the
    /// configured breakpoints do not fit the ramp.
    pub fn build(
        config: &MapConfig,
        tracts: &[Tract],
        category: Category,
        mode: Mode,
    ) -> Result<Self, ScaleError> {
        let binding = config
            .category(category)
            .ok_or(ScaleError::UnknownCategory { category })?;
        let ramp = binding.scheme(mode).colors().to_vec();

        let values: Vec<f64> = tracts
            .iter()
            .filter_map(|t| t.values(category).for_mode(mode))
            .collect();
        let extent = Extent::of(values.iter().copied());

        let scale = match (mode, config.level.scale) {
            (Mode::Change, _) => {
                Scale::Threshold(ThresholdScale::new(config.change.breaks.clone(), ramp)?)
            }
            (Mode::Level, LevelScale::Cluster) => Scale::Cluster(ClusterScale::new(values, ramp)?),
            (Mode::Level, LevelScale::Quantile) => {
                Scale::Quantile(QuantileScale::new(values, ramp)?)
            }
        };

        let legend = Legend::from_classifier(&scale, extent, mode.label());

        log::debug!(
            "Scale for {category}/{mode}: breaks {:?}, extent {extent:?}",
            scale.breaks()
        );

        Ok(Self {
            category,
            mode,
            scale,
            extent,
            legend,
        })
    }

    /// Fill for a resolved value: the no-data swatch for `None`, the
    /// classified swatch otherwise.
    #[must_use]
    pub fn color_for(&self, value: Option<f64>) -> Color {
        value.map_or(NO_DATA, |v| self.scale.classify(v))
    }

    /// The underlying classifier.
    #[must_use]
    pub const fn scale(&self) -> &Scale {
        &self.scale
    }

    /// Extent of the resolved values, `None` when every tract lacks data.
    #[must_use]
    pub const fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Legend entries and ticks for this scale.
    #[must_use]
    pub const fn legend(&self) -> &Legend {
        &self.legend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{map_config, tracts_from_features};
    use jobs_map_palette::Scheme;
    use jobs_map_topology::Feature;
    use serde_json::{Value, json};

    fn tracts() -> Vec<Tract> {
        let rows = [
            json!({"GEOID": "a", "prof_c": -2.0, "prof_15": 0.2, "make_15": 1.0}),
            json!({"GEOID": "b", "prof_c": -0.1, "prof_15": 0.9, "make_15": 1.0}),
            json!({"GEOID": "c", "prof_c": 2.0, "prof_15": 1.1, "make_15": 4.0}),
            json!({"GEOID": "d", "prof_c": 0.0, "prof_15": 2.4}),
            json!({"GEOID": "e", "prof_15": 3.8, "make_15": 9.0}),
            json!({"GEOID": "f", "prof_c": null, "prof_15": 6.5}),
        ];
        tracts_from_features(
            rows.into_iter()
                .map(|row| {
                    let Value::Object(properties) = row else {
                        panic!("expected object");
                    };
                    Feature {
                        id: None,
                        properties,
                        geometry: None,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn change_mode_uses_fixed_thresholds() {
        let scale = ActiveScale::build(&map_config(), &tracts(), Category::Prof, Mode::Change)
            .unwrap();
        let ramp = Scheme::BrBG.colors();

        assert_eq!(scale.scale().breaks(), &[-1.5, -0.1, 0.1, 1.5]);
        assert_eq!(scale.color_for(Some(-2.0)), ramp[0]);
        assert_eq!(scale.color_for(Some(-0.1)), ramp[2]);
        assert_eq!(scale.color_for(Some(2.0)), ramp[4]);
        assert_eq!(scale.color_for(None), NO_DATA);
    }

    #[test]
    fn none_is_no_data_in_both_modes() {
        for mode in [Mode::Change, Mode::Level] {
            let scale = ActiveScale::build(&map_config(), &tracts(), Category::Supp, mode).unwrap();
            assert_eq!(scale.color_for(None), NO_DATA);
            assert!(scale.extent().is_none());
        }
    }

    #[test]
    fn level_mode_clusters_category_values() {
        let scale =
            ActiveScale::build(&map_config(), &tracts(), Category::Make, Mode::Level).unwrap();

        assert!(matches!(scale.scale(), Scale::Cluster(_)));
        assert_eq!(scale.scale().breaks(), &[4.0, 9.0]);
        assert_eq!(scale.extent(), Some(Extent { min: 1.0, max: 9.0 }));
        assert_eq!(scale.color_for(Some(4.0)), Scheme::YlGnBu.colors()[1]);
    }

    #[test]
    fn legend_breaks_track_the_classifier() {
        let config = map_config();
        let tracts = tracts();
        for category in Category::ALL {
            for mode in [Mode::Change, Mode::Level] {
                let scale = ActiveScale::build(&config, &tracts, *category, mode).unwrap();
                assert_eq!(scale.legend().breaks(), scale.scale().breaks());
                assert_eq!(scale.legend().title, mode.label());
            }
        }
    }

    #[test]
    fn quantile_strategy_is_selectable() {
        let mut config = map_config();
        config.level.scale = LevelScale::Quantile;
        let scale = ActiveScale::build(&config, &tracts(), Category::Prof, Mode::Level).unwrap();
        assert!(matches!(scale.scale(), Scale::Quantile(_)));
        assert_eq!(scale.legend().breaks(), scale.scale().breaks());
    }

    #[test]
    fn missing_binding_is_an_error() {
        let mut config = map_config();
        config.categories.retain(|c| c.category != Category::Serv);
        assert!(matches!(
            ActiveScale::build(&config, &tracts(), Category::Serv, Mode::Level),
            Err(ScaleError::UnknownCategory { category: Category::Serv })
        ));
    }
}
