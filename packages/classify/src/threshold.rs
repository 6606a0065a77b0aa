//! Fixed-breakpoint classification.

use jobs_map_palette::Color;

use crate::{ClassifyError, Classifier};

/// Maps values to swatches through manually chosen breakpoints.
///
/// `N - 1` breakpoints split the reals into `N` buckets, one per ramp
/// color. Values below the first breakpoint take the first swatch; values
/// at or above the last take the last swatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdScale {
    breaks: Vec<f64>,
    ramp: Vec<Color>,
}

impl ThresholdScale {
    /// Creates a threshold scale.
    ///
    /// # Errors
    ///
    /// Returns [`ClassifyError`] if the ramp is empty, the breakpoint count
    /// is not one less than the color count, or the breakpoints are not
    /// finite and strictly increasing.
    pub fn new(breaks: Vec<f64>, ramp: Vec<Color>) -> Result<Self, ClassifyError> {
        if ramp.is_empty() {
            return Err(ClassifyError::EmptyRamp);
        }
        if breaks.len() + 1 != ramp.len() {
            return Err(ClassifyError::BreakCount {
                colors: ramp.len(),
                expected: ramp.len() - 1,
                actual: breaks.len(),
            });
        }
        let increasing = breaks.iter().all(|b| b.is_finite())
            && breaks.windows(2).all(|pair| pair[0] < pair[1]);
        if !increasing {
            return Err(ClassifyError::UnsortedBreaks { breaks });
        }

        Ok(Self { breaks, ramp })
    }
}

impl Classifier for ThresholdScale {
    fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    fn ramp(&self) -> &[Color] {
        &self.ramp
    }
}
