//! Natural-breaks classification backed by [`ckmeans`](crate::ckmeans).

use jobs_map_palette::Color;

use crate::{
    Bucket, ClassifyError, Classifier, Extent, buckets_within, ckmeans::ckmeans, sorted_finite,
    strictly_increasing_above,
};

/// Data-driven scale whose breakpoints are the starts of the ckmeans
/// clusters of the observed values.
///
/// Asks for one cluster per ramp color. When the data has fewer distinct
/// values than colors, fewer buckets are produced and the leading swatches
/// of the ramp are used.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterScale {
    breaks: Vec<f64>,
    ramp: Vec<Color>,
    extent: Option<Extent>,
}

impl ClusterScale {
    /// Clusters `values` (non-finite values are ignored) into at most
    /// `ramp.len()` groups.
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
        let clusters = ckmeans(&sorted, ramp.len());

        let starts: Vec<f64> = clusters
            .iter()
            .skip(1)
            .filter_map(|cluster| cluster.first().copied())
            .collect();
        let breaks = extent.map_or_else(Vec::new, |e| strictly_increasing_above(starts, e.min));

        log::debug!(
            "ckmeans: {} values -> {} clusters, breaks {breaks:?}",
            sorted.len(),
            clusters.len()
        );

        Ok(Self {
            breaks,
            ramp,
            extent,
        })
    }

    /// The computed cluster starts (excluding the first), i.e. the legend
    /// breakpoints.
    #[must_use]
    pub fn clusters(&self) -> &[f64] {
        &self.breaks
    }

    /// Extent of the clustered values, `None` when no finite values were
    /// given.
    #[must_use]
    pub const fn extent(&self) -> Option<Extent> {
        self.extent
    }

    /// Contiguous buckets covering exactly `[min, max]` of the data.
    #[must_use]
    pub fn buckets(&self) -> Vec<Bucket> {
        self.extent
            .map_or_else(Vec::new, |extent| buckets_within(self, extent))
    }
}

impl Classifier for ClusterScale {
    fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    fn ramp(&self) -> &[Color] {
        &self.ramp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobs_map_palette::Scheme;

    fn ramp() -> Vec<Color> {
        Scheme::YlGn.colors().to_vec()
    }

    fn assert_covers(buckets: &[Bucket], min: f64, max: f64) {
        assert!(!buckets.is_empty());
        assert_eq!(buckets.first().unwrap().start, min);
        assert_eq!(buckets.last().unwrap().end, max);
        for pair in buckets.windows(2) {
            assert_eq!(pair[0].end, pair[1].start, "gap or overlap in {buckets:?}");
        }
        for bucket in buckets {
            assert!(bucket.start <= bucket.end);
        }
    }

    #[test]
    fn buckets_cover_extent_for_five_classes() {
        let values = [0.1, 0.3, 0.35, 0.8, 0.9, 1.0, 1.7, 2.2, 2.4, 4.9, 5.2, 11.0];
        let scale = ClusterScale::new(values, ramp()).unwrap();

        assert_eq!(scale.breaks().len(), 4);
        assert_covers(&scale.buckets(), 0.1, 11.0);
    }

    #[test]
    fn buckets_cover_extent_for_one_class() {
        let values = [3.0, 1.0, 2.0];
        let scale = ClusterScale::new(values, ramp()[..1].to_vec()).unwrap();

        assert!(scale.breaks().is_empty());
        let buckets = scale.buckets();
        assert_eq!(buckets.len(), 1);
        assert_covers(&buckets, 1.0, 3.0);
        assert_eq!(scale.classify(2.5), ramp()[0]);
    }

    #[test]
    fn classifies_by_cluster() {
        let values = [1.0, 1.1, 3.0, 3.1, 6.0, 6.1, 9.0, 9.2, 15.0, 15.5];
        let scale = ClusterScale::new(values, ramp()).unwrap();
        let c = ramp();

        assert_eq!(scale.clusters(), &[3.0, 6.0, 9.0, 15.0]);
        assert_eq!(scale.classify(1.05), c[0]);
        assert_eq!(scale.classify(3.0), c[1]);
        assert_eq!(scale.classify(9.1), c[3]);
        assert_eq!(scale.classify(100.0), c[4]);
        assert_eq!(scale.classify(-5.0), c[0]);
    }

    #[test]
    fn fewer_distinct_values_than_classes() {
        let scale = ClusterScale::new([2.0, 2.0, 8.0], ramp()).unwrap();

        assert_eq!(scale.clusters(), &[8.0]);
        let buckets = scale.buckets();
        assert_eq!(buckets.len(), 2);
        assert_covers(&buckets, 2.0, 8.0);
        assert_eq!(scale.classify(8.0), ramp()[1]);
    }

    #[test]
    fn empty_input_degrades_gracefully() {
        let scale = ClusterScale::new(std::iter::empty(), ramp()).unwrap();

        assert!(scale.breaks().is_empty());
        assert!(scale.buckets().is_empty());
        assert_eq!(scale.extent(), None);
        assert_eq!(scale.classify(1.0), ramp()[0]);
    }

    #[test]
    fn ignores_non_finite_values() {
        let scale = ClusterScale::new([f64::NAN, 1.0, f64::INFINITY, 2.0], ramp()).unwrap();
        assert_eq!(scale.extent(), Some(Extent { min: 1.0, max: 2.0 }));
    }

    #[test]
    fn rejects_empty_ramp() {
        assert_eq!(
            ClusterScale::new([1.0], Vec::new()),
            Err(ClassifyError::EmptyRamp)
        );
    }
}
