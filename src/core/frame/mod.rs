//! # Frame Module
//!
//! Turns candidate files into decoded camera frames.
//!
//! A candidate that does not decode is not an error for the pipeline; it is
//! reported and left alone on disk.

pub mod decode;
pub mod resize;

pub use decode::FastDecoder;
pub use resize::FastResizer;

use crate::error::FrameError;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// A decoded still from a camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Where the frame was read from
    pub path: PathBuf,
    /// Decoded pixels
    pub pixels: DynamicImage,
}

impl CameraFrame {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Pixel count, used as the frame's resolution
    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }
}

/// Loads frames from disk
pub struct FrameLoader;

impl FrameLoader {
    /// Decode `path` into a frame. Zero-sized images are rejected.
    pub fn load(path: &Path) -> Result<CameraFrame, FrameError> {
        let pixels = FastDecoder::decode(path)?;

        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(FrameError::EmptyImage {
                path: path.to_path_buf(),
            });
        }

        Ok(CameraFrame {
            path: path.to_path_buf(),
            pixels,
        })
    }

    /// Whether `path` decodes as an image at all
    pub fn is_valid_image(path: &Path) -> bool {
        Self::load(path).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn load_reports_dimensions_and_area() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("c21-1.png");
        RgbImage::from_pixel(640, 480, Rgb([0, 0, 0])).save(&path).unwrap();

        let frame = FrameLoader::load(&path).unwrap();
        assert_eq!(frame.width(), 640);
        assert_eq!(frame.height(), 480);
        assert_eq!(frame.area(), 307_200);
        assert_eq!(frame.path, path);
    }

    #[test]
    fn text_file_is_not_a_valid_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.png");
        fs::write(&path, "hello").unwrap();

        assert!(!FrameLoader::is_valid_image(&path));
    }

    #[test]
    fn missing_file_is_not_a_valid_image() {
        assert!(!FrameLoader::is_valid_image(Path::new("/nonexistent/frame.png")));
    }
}
