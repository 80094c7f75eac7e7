//! SIMD-accelerated resizing of grayscale frames.
//!
//! Uses fast_image_resize, which picks AVX2/NEON when available.

use crate::error::FrameError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::GrayImage;

/// Reusable resizer for grayscale frames
pub struct FastResizer {
    resizer: Resizer,
}

impl FastResizer {
    /// Create a new fast resizer
    pub fn new() -> Self {
        Self {
            resizer: Resizer::new(),
        }
    }

    /// Resize a grayscale frame to exactly `width` x `height` with a
    /// bilinear filter. Aspect ratio is not preserved.
    pub fn resize_gray(
        &mut self,
        gray: &GrayImage,
        width: u32,
        height: u32,
    ) -> Result<GrayImage, FrameError> {
        let resize_error = |reason: String| FrameError::ResizeFailed {
            width,
            height,
            reason,
        };

        if gray.width() == 0 || gray.height() == 0 {
            return Err(resize_error("Invalid source dimensions".to_string()));
        }
        if width == 0 || height == 0 {
            return Err(resize_error("Invalid destination dimensions".to_string()));
        }
        if gray.dimensions() == (width, height) {
            return Ok(gray.clone());
        }

        let src_image =
            Image::from_vec_u8(gray.width(), gray.height(), gray.as_raw().clone(), PixelType::U8)
                .map_err(|e| resize_error(format!("Failed to create source image: {}", e)))?;

        let mut dst_image = Image::new(width, height, PixelType::U8);

        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

        self.resizer
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| resize_error(e.to_string()))?;

        GrayImage::from_raw(width, height, dst_image.into_vec())
            .ok_or_else(|| resize_error("Failed to create result buffer".to_string()))
    }
}

impl Default for FastResizer {
    fn default() -> Self {
        Self::new()
    }
}
