//! Contour-based change detection between two preprocessed frames.

use super::preprocess::{preprocess, PreprocessConfig};
use super::{ChangeDetector, ChangeScore};
use crate::core::frame::CameraFrame;
use crate::error::CompareError;
use image::{GrayImage, Luma};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;

/// Per-pixel difference above which a pixel counts as changed
pub const DIFF_THRESHOLD: u8 = 45;

/// Radius of the square dilation, equal to two passes of a 3x3 element
pub const DILATE_RADIUS: u8 = 2;

/// Scores change as the total area of large changed regions.
#[derive(Debug, Clone, Default)]
pub struct ContourChangeDetector {
    config: PreprocessConfig,
}

impl ContourChangeDetector {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }
}

impl ChangeDetector for ContourChangeDetector {
    fn preprocess(&self, frame: &CameraFrame) -> GrayImage {
        preprocess(frame, &self.config)
    }

    fn compare(
        &self,
        prev: &GrayImage,
        next: &GrayImage,
        min_contour_area: f64,
    ) -> Result<ChangeScore, CompareError> {
        let changed = difference_mask(prev, next)?;
        let changed = dilate(&changed, Norm::LInf, DILATE_RADIUS);

        let mut value = 0.0;
        let mut contours = 0;
        for contour in external_contours(&changed) {
            let area = polygon_area(&contour);
            if area < min_contour_area {
                continue;
            }
            value += area;
            contours += 1;
        }

        Ok(ChangeScore {
            value,
            contours,
            width: changed.width(),
            height: changed.height(),
        })
    }
}

/// Binary image of pixels whose absolute difference exceeds
/// [`DIFF_THRESHOLD`]: 255 where changed, 0 elsewhere.
pub fn difference_mask(prev: &GrayImage, next: &GrayImage) -> Result<GrayImage, CompareError> {
    if prev.dimensions() != next.dimensions() {
        return Err(CompareError::DimensionMismatch {
            left_width: prev.width(),
            left_height: prev.height(),
            right_width: next.width(),
            right_height: next.height(),
        });
    }

    Ok(GrayImage::from_fn(prev.width(), prev.height(), |x, y| {
        let delta = prev.get_pixel(x, y).0[0].abs_diff(next.get_pixel(x, y).0[0]);
        if delta > DIFF_THRESHOLD {
            Luma([255])
        } else {
            Luma([0])
        }
    }))
}

/// Outer borders that are not nested inside another region
fn external_contours(mask: &GrayImage) -> impl Iterator<Item = Contour<i32>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
}

/// Shoelace area of the polygon traced by a contour
fn polygon_area(contour: &Contour<i32>) -> f64 {
    let points = &contour.points;
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    twice_area.abs() as f64 / 2.0
}
