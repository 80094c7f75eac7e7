//! Frame preprocessing before differencing.

use crate::core::frame::CameraFrame;
use crate::error::CompareError;
use image::{GrayImage, Luma};
use imageproc::filter::gaussian_blur_f32;
use serde::{Deserialize, Serialize};

/// Border strips to blank out, as percentages of width/height.
///
/// Camera stills carry timestamps and logos along the edges; masking them
/// keeps the overlay from counting as change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderMask {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BorderMask {
    /// Paint the masked strips black in place.
    ///
    /// Strips are filled rectangles with both corners included: the left
    /// strip covers columns `0..=x_min` and the top strip rows `0..=y_min`,
    /// so column 0 and row 0 are blanked even at 0%. The right and bottom
    /// strips start at `width - right%` and `height - bottom%`.
    pub fn apply(&self, gray: &mut GrayImage) {
        let (width, height) = gray.dimensions();
        let x_min = percent_of(self.left, width);
        let y_min = percent_of(self.top, height);
        let x_max = width.saturating_sub(percent_of(self.right, width));
        let y_max = height.saturating_sub(percent_of(self.bottom, height));

        for (x, y, pixel) in gray.enumerate_pixels_mut() {
            if x <= x_min || x >= x_max || y <= y_min || y >= y_max {
                *pixel = Luma([0]);
            }
        }
    }
}

impl Default for BorderMask {
    fn default() -> Self {
        Self {
            left: 5.0,
            top: 10.0,
            right: 5.0,
            bottom: 0.0,
        }
    }
}

fn percent_of(percent: f64, length: u32) -> u32 {
    (percent.clamp(0.0, 100.0) * length as f64 / 100.0) as u32
}

/// How frames are prepared for comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessConfig {
    /// Gaussian kernel sizes applied in order; empty means no blur
    pub blur_kernels: Vec<u32>,
    /// Border strips to blank out; `None` compares the whole frame
    pub mask: Option<BorderMask>,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            blur_kernels: Vec::new(),
            mask: Some(BorderMask::default()),
        }
    }
}

impl PreprocessConfig {
    pub fn validate(&self) -> Result<(), CompareError> {
        match self.blur_kernels.iter().find(|k| **k == 0 || **k % 2 == 0) {
            Some(&size) => Err(CompareError::InvalidBlurKernel { size }),
            None => Ok(()),
        }
    }
}

/// Sigma for a square Gaussian kernel of the given size, matching the
/// usual "sigma = 0" convention of deriving it from the aperture.
pub fn sigma_for_kernel(size: u32) -> f32 {
    0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Grayscale, blur, then mask.
pub fn preprocess(frame: &CameraFrame, config: &PreprocessConfig) -> GrayImage {
    let mut gray = frame.pixels.to_luma8();

    for &kernel in &config.blur_kernels {
        gray = gaussian_blur_f32(&gray, sigma_for_kernel(kernel));
    }

    if let Some(mask) = &config.mask {
        mask.apply(&mut gray);
    }
    gray
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage};
    use std::path::PathBuf;

    fn white_frame(width: u32, height: u32) -> CameraFrame {
        CameraFrame {
            path: PathBuf::from("white.png"),
            pixels: DynamicImage::ImageRgb8(RgbImage::from_pixel(
                width,
                height,
                Rgb([255, 255, 255]),
            )),
        }
    }

    #[test]
    fn default_mask_blanks_left_top_and_right() {
        let gray = preprocess(&white_frame(100, 100), &PreprocessConfig::default());

        assert_eq!(gray.get_pixel(5, 50).0[0], 0);
        assert_eq!(gray.get_pixel(6, 50).0[0], 255);
        assert_eq!(gray.get_pixel(50, 10).0[0], 0);
        assert_eq!(gray.get_pixel(50, 11).0[0], 255);
        assert_eq!(gray.get_pixel(95, 50).0[0], 0);
        assert_eq!(gray.get_pixel(94, 50).0[0], 255);
        assert_eq!(gray.get_pixel(50, 99).0[0], 255);
    }

    #[test]
    fn zero_percent_still_blanks_the_first_row_and_column() {
        let config = PreprocessConfig {
            mask: Some(BorderMask {
                left: 0.0,
                top: 0.0,
                right: 0.0,
                bottom: 0.0,
            }),
            ..Default::default()
        };
        let gray = preprocess(&white_frame(10, 10), &config);

        assert_eq!(gray.get_pixel(0, 5).0[0], 0);
        assert_eq!(gray.get_pixel(5, 0).0[0], 0);
        assert_eq!(gray.get_pixel(1, 1).0[0], 255);
        assert_eq!(gray.get_pixel(9, 9).0[0], 255);
    }

    #[test]
    fn no_mask_keeps_every_pixel() {
        let config = PreprocessConfig {
            mask: None,
            ..Default::default()
        };
        let gray = preprocess(&white_frame(10, 10), &config);
        assert!(gray.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn blur_keeps_dimensions() {
        let config = PreprocessConfig {
            blur_kernels: vec![5, 3],
            mask: None,
        };
        let gray = preprocess(&white_frame(30, 20), &config);
        assert_eq!(gray.dimensions(), (30, 20));
    }

    #[test]
    fn even_kernel_is_rejected() {
        let config = PreprocessConfig {
            blur_kernels: vec![3, 4],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(CompareError::InvalidBlurKernel { size: 4 })
        ));
    }

    #[test]
    fn sigma_grows_with_kernel() {
        assert!((sigma_for_kernel(3) - 0.8).abs() < 1e-6);
        assert!(sigma_for_kernel(7) > sigma_for_kernel(5));
    }
}
