//! Legend entries derived from the active classifier.
//!
//! The legend is a horizontal strip of swatches, one per bucket, with a
//! tick at every bucket boundary. It is always built from the classifier
//! that colors the map so the two can never disagree.

use jobs_map_palette::Color;
use serde::{Deserialize, Serialize};

use crate::{Classifier, Extent};

/// One swatch of a legend strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    /// Value at the left edge of the swatch.
    pub start: f64,
    /// Value at the right edge of the swatch.
    pub end: f64,
    /// Swatch color.
    pub color: Color,
}

/// How the values at entry boundaries are labeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickFormat {
    /// Boundaries are classifier breakpoints; every label shows its value.
    Breakpoints,
    /// Boundaries are fixed display ranges; labels share the precision
    /// suited to the whole domain.
    Domain,
}

/// Ordered legend entries plus the title drawn above them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legend {
    /// Title text.
    pub title: String,
    /// Entries, left to right.
    pub entries: Vec<LegendEntry>,
    /// Tick label format.
    pub format: TickFormat,
}

impl Legend {
    /// Builds a legend from `classifier` over the observed `extent`.
    ///
    /// The legend domain is widened to include every breakpoint, so the
    /// entries always show all buckets of the classifier even when the
    /// data does not reach the outer ones.
    #[must_use]
    pub fn from_classifier(
        classifier: &dyn Classifier,
        extent: Option<Extent>,
        title: impl Into<String>,
    ) -> Self {
        let breaks = classifier.breaks();

        let domain = match (extent, breaks.first(), breaks.last()) {
            (Some(e), Some(&first), Some(&last)) => Some(Extent {
                min: e.min.min(first),
                max: e.max.max(last),
            }),
            (Some(e), _, _) => Some(e),
            (None, Some(&first), Some(&last)) => Some(Extent {
                min: first,
                max: last,
            }),
            (None, _, _) => None,
        };

        let entries = domain.map_or_else(Vec::new, |domain| {
            let mut edges = Vec::with_capacity(breaks.len() + 2);
            edges.push(domain.min);
            edges.extend_from_slice(breaks);
            edges.push(domain.max);

            edges
                .windows(2)
                .enumerate()
                .map(|(i, pair)| LegendEntry {
                    start: pair[0],
                    end: pair[1],
                    color: classifier.swatch(i),
                })
                .collect()
        });

        Self {
            title: title.into(),
            entries,
            format: TickFormat::Breakpoints,
        }
    }

    /// Builds a legend from explicit `(start, end)` ranges, coloring range
    /// `i` with `ramp[i]`.
    #[must_use]
    pub fn from_ranges(ranges: &[(f64, f64)], ramp: &[Color], title: impl Into<String>) -> Self {
        let entries = ranges
            .iter()
            .zip(ramp)
            .map(|(&(start, end), &color)| LegendEntry { start, end, color })
            .collect();

        Self {
            title: title.into(),
            entries,
            format: TickFormat::Domain,
        }
    }

    /// The interior boundaries between entries.
    #[must_use]
    pub fn breaks(&self) -> Vec<f64> {
        self.entries.iter().skip(1).map(|e| e.start).collect()
    }

    /// Every entry boundary, left to right, including both ends of the
    /// domain. An outer entry may have zero width when the data does not
    /// reach past the outermost breakpoint.
    #[must_use]
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self.entries.iter().map(|e| e.start).collect();
        if let Some(last) = self.entries.last() {
            edges.push(last.end);
        }
        edges
    }

    /// Tick values: the distinct entry boundaries.
    #[must_use]
    pub fn ticks(&self) -> Vec<f64> {
        let mut ticks = self.edges();
        ticks.dedup_by(|a, b| a == b);
        ticks
    }
}
