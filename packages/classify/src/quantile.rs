//! Equal-count classification.

use jobs_map_palette::Color;

use crate::{
    Bucket, ClassifyError, Classifier, Extent, buckets_within, sorted_finite,
    strictly_increasing_above,
};

/// Data-driven scale splitting the observed values into equal-count
/// groups, one per ramp color.
///
/// Thresholds are the `i / n` quantiles (linear interpolation between
/// closest ranks). Repeated thresholds, which occur with heavily repeated
/// values, are collapsed so that every bucket is non-empty.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantileScale {
    thresholds: Vec<f64>,
    ramp: Vec<Color>,
    extent: Option<Extent>,
}

impl QuantileScale {
    /// Builds the scale from `values`; non-finite values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError::EmptyRamp`] if `ramp` is empty.
    pub fn new(
        values: impl IntoIterator<Item = f64>,
        ramp: Vec<Color>,
    ) -> Result<Self, ClassifyError> {
        if ramp.is_empty() {
            return Err(ClassifyError::EmptyRamp);
        }

        let sorted = sorted_finite(values);
        let extent = Extent::of(sorted.iter().copied());
        let n = ramp.len();

        #[allow(clippy::cast_precision_loss)]
        let raw: Vec<f64> = if sorted.is_empty() {
            Vec::new()
        } else {
            (1..n)
                .map(|i| quantile_sorted(&sorted, i as f64 / n as f64))
                .collect()
        };
        let thresholds =
            extent.map_or_else(Vec::new, |e| strictly_increasing_above(raw, e.min));

        Ok(Self {
            thresholds,
            ramp,
            extent,
        })
    }

    /// The computed quantile thresholds.
    #[must_use]
    pub fn quantiles(&self) -> &[f64] {
        &self.thresholds
    }

    /// Contiguous buckets covering exactly `[min, max]` of the data.
    #[must_use]
    pub fn buckets(&self) -> Vec<Bucket> {
        self.extent
            .map_or_else(Vec::new, |extent| buckets_within(self, extent))
    }
}

impl Classifier for QuantileScale {
    fn breaks(&self) -> &[f64] {
        &self.thresholds
    }

    fn ramp(&self) -> &[Color] {
        &self.ramp
    }
}

/// The `p`-quantile of a non-empty ascending slice (R-7 definition).
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let i = h.floor() as usize;
    if i + 1 >= sorted.len() {
        return sorted[sorted.len() - 1];
    }
    let lo = sorted[i];
    let hi = sorted[i + 1];
    (hi - lo).mul_add(h - h.floor(), lo)
}
