//! Image decoding with a fast path for JPEG.
//!
//! Uses zune-jpeg for JPEG files (1.5-2x faster than image crate),
//! falls back to image crate for everything else.

use crate::error::FrameError;
use image::{DynamicImage, ImageBuffer, ImageReader, Luma, Rgb, Rgba};
use std::fs;
use std::path::Path;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;
use zune_jpeg::JpegDecoder;

/// Decodes camera frames from disk
pub struct FastDecoder;

impl FastDecoder {
    /// Decode an image from a file path.
    ///
    /// The image crate path sniffs the content, so a file whose extension
    /// lies about its format still decodes.
    pub fn decode(path: &Path) -> Result<DynamicImage, FrameError> {
        if is_jpeg(path) {
            Self::decode_jpeg(path).or_else(|_| Self::decode_fallback(path))
        } else {
            Self::decode_fallback(path)
        }
    }

    fn decode_jpeg(path: &Path) -> Result<DynamicImage, FrameError> {
        let file_bytes = fs::read(path).map_err(|e| FrameError::IoError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let options = DecoderOptions::new_fast().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = JpegDecoder::new_with_options(&file_bytes, options);

        let pixels = decoder.decode().map_err(|e| FrameError::DecodeError {
            path: path.to_path_buf(),
            reason: format!("zune-jpeg decode failed: {:?}", e),
        })?;

        let info = decoder.info().ok_or_else(|| FrameError::DecodeError {
            path: path.to_path_buf(),
            reason: "Failed to get image info".to_string(),
        })?;

        let width = info.width as u32;
        let height = info.height as u32;
        let buffer_error = || FrameError::DecodeError {
            path: path.to_path_buf(),
            reason: "Decoded buffer does not match image dimensions".to_string(),
        };

        match decoder.get_output_colorspace().unwrap_or(ColorSpace::RGB) {
            ColorSpace::RGB => {
                let buffer: ImageBuffer<Rgb<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                Ok(DynamicImage::ImageRgb8(buffer))
            }
            ColorSpace::RGBA => {
                let buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                Ok(DynamicImage::ImageRgba8(buffer))
            }
            ColorSpace::Luma => {
                let buffer: ImageBuffer<Luma<u8>, Vec<u8>> =
                    ImageBuffer::from_raw(width, height, pixels).ok_or_else(buffer_error)?;
                Ok(DynamicImage::ImageLuma8(buffer))
            }
            _ => Self::decode_fallback(path),
        }
    }

    fn decode_fallback(path: &Path) -> Result<DynamicImage, FrameError> {
        let decode_error = |reason: String| FrameError::DecodeError {
            path: path.to_path_buf(),
            reason,
        };

        ImageReader::open(path)
            .map_err(|e| FrameError::IoError {
                path: path.to_path_buf(),
                source: e,
            })?
            .with_guessed_format()
            .map_err(|e| decode_error(e.to_string()))?
            .decode()
            .map_err(|e| decode_error(e.to_string()))
    }
}

fn is_jpeg(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};
    use tempfile::TempDir;

    #[test]
    fn jpeg_detection_ignores_case() {
        assert!(is_jpeg(Path::new("c10-1.jpg")));
        assert!(is_jpeg(Path::new("c10-1.JPEG")));
        assert!(!is_jpeg(Path::new("c10-1.png")));
    }

    #[test]
    fn decodes_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.png");
        GrayImage::from_pixel(12, 7, Luma([90])).save(&path).unwrap();

        let image = FastDecoder::decode(&path).unwrap();
        assert_eq!((image.width(), image.height()), (12, 7));
    }

    #[test]
    fn decodes_jpeg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("frame.jpg");
        RgbImage::from_pixel(32, 24, Rgb([10, 200, 30])).save(&path).unwrap();

        let image = FastDecoder::decode(&path).unwrap();
        assert_eq!((image.width(), image.height()), (32, 24));
    }

    #[test]
    fn content_wins_over_extension() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("real.png");
        GrayImage::from_pixel(5, 5, Luma([1])).save(&png).unwrap();
        let misnamed = dir.path().join("misnamed.bmp");
        fs::copy(&png, &misnamed).unwrap();

        assert!(FastDecoder::decode(&misnamed).is_ok());
    }

    #[test]
    fn garbage_fails_to_decode() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jpg");
        fs::write(&path, b"this is not an image").unwrap();

        assert!(FastDecoder::decode(&path).is_err());
    }
}
