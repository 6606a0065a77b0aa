#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Choropleth classification scales and legend building.
//!
//! A [`Classifier`] partitions the real line into ordered buckets and maps
//! each bucket to one swatch of a ramp. Three strategies are provided:
//!
//! - [`ThresholdScale`]: fixed, manually chosen breakpoints.
//! - [`ClusterScale`]: natural breaks computed with ckmeans (optimal 1-D
//!   k-means) from the observed values.
//! - [`QuantileScale`]: equal-count breaks from the observed values.
//!
//! All scales share one boundary rule: a value exactly equal to a
//! breakpoint belongs to the bucket *above* it, so every bucket is
//! `[start, end)` except the last, which is unbounded above.
//!
//! The [`legend`] module turns the active classifier into the ordered
//! `(start, end, color)` entries drawn in a map legend.

pub mod ckmeans;
pub mod cluster;
pub mod legend;
pub mod quantile;
pub mod threshold;

use jobs_map_palette::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use cluster::ClusterScale;
pub use legend::{Legend, LegendEntry, TickFormat};
pub use quantile::QuantileScale;
pub use threshold::ThresholdScale;

/// Errors raised while constructing a classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// The ramp has no colors.
    #[error("Ramp must contain at least one color")]
    EmptyRamp,

    /// Threshold scales need exactly one fewer breakpoint than colors.
    #[error("Expected {expected} breakpoints for {colors} colors, got {actual}")]
    BreakCount {
        /// Number of colors in the ramp.
        colors: usize,
        /// Required breakpoint count.
        expected: usize,
        /// Provided breakpoint count.
        actual: usize,
    },

    /// Breakpoints must be finite and strictly increasing.
    #[error("Breakpoints must be finite and strictly increasing: {breaks:?}")]
    UnsortedBreaks {
        /// The rejected breakpoints.
        breaks: Vec<f64>,
    },
}

/// A monotonic mapping from real values to ramp swatches.
pub trait Classifier {
    /// The interior breakpoints, strictly increasing. Bucket `i` starts at
    /// `breaks()[i - 1]` (inclusive).
    fn breaks(&self) -> &[f64];

    /// The ramp the buckets draw their swatches from.
    fn ramp(&self) -> &[Color];

    /// Returns the bucket index for `value`.
    ///
    /// NaN is not ordered against any breakpoint and lands in bucket 0.
    fn bucket_index(&self, value: f64) -> usize {
        self.breaks().partition_point(|&b| b <= value)
    }

    /// Returns the swatch for bucket `index`, clamped to the ramp.
    fn swatch(&self, index: usize) -> Color {
        let ramp = self.ramp();
        ramp[index.min(ramp.len().saturating_sub(1))]
    }

    /// Maps `value` to the swatch of its bucket.
    fn classify(&self, value: f64) -> Color {
        self.swatch(self.bucket_index(value))
    }
}

/// Closed range of observed values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Smallest value.
    pub min: f64,
    /// Largest value.
    pub max: f64,
}

impl Extent {
    /// Computes the extent of the finite values in `values`.
    ///
    /// Returns `None` when there are no finite values.
    pub fn of(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some(Self { min: v, max: v }),
                Some(e) => Some(Self {
                    min: e.min.min(v),
                    max: e.max.max(v),
                }),
            })
    }
}

/// One bucket of a data-driven classifier, `[start, end)` except for the
/// last bucket which includes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    /// Inclusive lower bound.
    pub start: f64,
    /// Upper bound.
    pub end: f64,
    /// Swatch assigned to the bucket.
    pub color: Color,
}

/// Splits `extent` at `breaks` into contiguous buckets colored by
/// `classifier`.
///
/// Breaks outside the extent are ignored so the buckets exactly cover
/// `[extent.min, extent.max]`.
#[must_use]
pub fn buckets_within(classifier: &dyn Classifier, extent: Extent) -> Vec<Bucket> {
    let inner: Vec<f64> = classifier
        .breaks()
        .iter()
        .copied()
        .filter(|&b| b > extent.min && b < extent.max)
        .collect();

    let mut starts = Vec::with_capacity(inner.len() + 1);
    starts.push(extent.min);
    starts.extend_from_slice(&inner);

    let mut ends = inner;
    ends.push(extent.max);

    starts
        .into_iter()
        .zip(ends)
        .map(|(start, end)| Bucket {
            start,
            end,
            color: classifier.classify(start),
        })
        .collect()
}

/// Sorts the finite values of `values` ascending, dropping NaN and
/// infinities.
pub(crate) fn sorted_finite(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Removes consecutive duplicates and anything not strictly above `floor`.
pub(crate) fn strictly_increasing_above(mut breaks: Vec<f64>, floor: f64) -> Vec<f64> {
    breaks.retain(|&b| b > floor);
    breaks.dedup_by(|a, b| a == b);
    breaks
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs_map_palette::Scheme;

    #[test]
    fn extent_ignores_non_finite() {
        let extent = Extent::of([3.0, f64::NAN, -1.0, f64::INFINITY, 2.0]).unwrap();
        assert_eq!(extent, Extent { min: -1.0, max: 3.0 });
        assert_eq!(Extent::of([f64::NAN]), None);
        assert_eq!(Extent::of(std::iter::empty()), None);
    }

    #[test]
    fn buckets_within_clip_to_extent() {
        let scale = ThresholdScale::new(
            vec![-1.5, -0.1, 0.1, 1.5],
            Scheme::BrBG.colors().to_vec(),
        )
        .unwrap();
        let buckets = buckets_within(&scale, Extent { min: -1.0, max: 1.0 });

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].start, -1.0);
        assert_eq!(buckets[0].end, -0.1);
        assert_eq!(buckets[0].color, Scheme::BrBG.colors()[1]);
        assert_eq!(buckets[2].end, 1.0);
        assert_eq!(buckets[2].color, Scheme::BrBG.colors()[3]);
    }

    #[test]
    fn strictly_increasing_drops_duplicates_and_floor() {
        assert_eq!(
            strictly_increasing_above(vec![1.0, 1.0, 2.0, 3.0, 3.0], 1.0),
            vec![2.0, 3.0]
        );
    }
}
