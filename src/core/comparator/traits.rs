//! Trait definitions for duplicate decisions.

use crate::core::change::ChangeScore;
use crate::error::CompareError;

/// Fraction of the frame area that may change before two frames count as
/// different
pub const CHANGE_RATIO: f64 = 0.1;

/// Strategy trait for deciding if two frames are duplicates
pub trait ComparisonStrategy: Send + Sync {
    /// Largest score still treated as a duplicate for this frame area
    fn threshold(&self, frame_area: u64) -> f64;

    /// Determine if a scored pair is a duplicate
    fn is_duplicate(&self, score: &ChangeScore) -> bool {
        score.value <= self.threshold(score.frame_area())
    }
}

/// Duplicate when the changed area is at most a fixed share of the frame
#[derive(Debug, Clone, Copy)]
pub struct ChangeRatioStrategy {
    ratio: f64,
}

impl ChangeRatioStrategy {
    /// Create a strategy, rejecting ratios outside `(0, 1]`
    pub fn new(ratio: f64) -> Result<Self, CompareError> {
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(CompareError::InvalidChangeRatio { value: ratio });
        }
        Ok(Self { ratio })
    }
}

impl Default for ChangeRatioStrategy {
    fn default() -> Self {
        Self {
            ratio: CHANGE_RATIO,
        }
    }
}

impl ComparisonStrategy for ChangeRatioStrategy {
    fn threshold(&self, frame_area: u64) -> f64 {
        self.ratio * frame_area as f64
    }
}
