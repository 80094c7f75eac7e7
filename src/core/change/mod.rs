//! # Change Module
//!
//! Measures how much changed between two camera frames.
//!
//! ## How It Works
//! 1. Convert each frame to grayscale, optionally blur, and blank the border
//!    strips where cameras burn in overlays
//! 2. Take the absolute per-pixel difference and keep pixels above 45
//! 3. Dilate the changed pixels so nearby changes merge into regions
//! 4. Trace the outer contour of each region and sum the areas of the
//!    regions that are large enough to matter
//!
//! The sum is the change score. Whether a score means "duplicate" is up to
//! the comparator.

mod detector;
mod preprocess;

pub use detector::{difference_mask, ContourChangeDetector, DIFF_THRESHOLD, DILATE_RADIUS};
pub use preprocess::{preprocess, sigma_for_kernel, BorderMask, PreprocessConfig};

use crate::core::frame::CameraFrame;
use crate::error::CompareError;
use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Outcome of comparing two preprocessed frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChangeScore {
    /// Total area of the counted changed regions, in pixels
    pub value: f64,
    /// Number of regions that counted toward the score
    pub contours: usize,
    /// Width of the compared frames
    pub width: u32,
    /// Height of the compared frames
    pub height: u32,
}

impl ChangeScore {
    /// Pixel area of the compared frames
    pub fn frame_area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Score as a fraction of the frame area
    pub fn changed_fraction(&self) -> f64 {
        match self.frame_area() {
            0 => 0.0,
            area => self.value / area as f64,
        }
    }
}

/// Scores the change between two frames.
///
/// Implement this trait to plug in a different differencing method.
pub trait ChangeDetector: Send + Sync {
    /// Prepare a decoded frame for comparison
    fn preprocess(&self, frame: &CameraFrame) -> GrayImage;

    /// Score the change between two preprocessed frames of equal size.
    ///
    /// Changed regions smaller than `min_contour_area` are ignored.
    fn compare(
        &self,
        prev: &GrayImage,
        next: &GrayImage,
        min_contour_area: f64,
    ) -> Result<ChangeScore, CompareError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changed_fraction_is_relative_to_frame() {
        let score = ChangeScore {
            value: 250.0,
            contours: 2,
            width: 50,
            height: 50,
        };
        assert_eq!(score.frame_area(), 2500);
        assert!((score.changed_fraction() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn empty_frame_has_zero_fraction() {
        let score = ChangeScore {
            value: 0.0,
            contours: 0,
            width: 0,
            height: 0,
        };
        assert_eq!(score.changed_fraction(), 0.0);
    }
}
