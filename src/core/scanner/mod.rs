//! # Scanner Module
//!
//! Lists candidate image files in a camera directory.
//!
//! ## Supported Formats
//! - PNG (.png)
//! - JPEG (.jpg, .jpeg)
//! - TIFF (.tiff, .tif)
//! - BMP (.bmp)
//! - GIF (.gif)
//!
//! Only the extension is checked here. Whether the file actually decodes is
//! decided later by the frame loader.
//!
//! ## Example
//! ```rust,ignore
//! use frame_dedup::core::scanner::{DirectoryScanner, ScanConfig};
//!
//! let scanner = DirectoryScanner::new(ScanConfig::default());
//! let listing = scanner.scan(Path::new("/data/camera-7"))?;
//! ```

mod filter;
mod walker;

pub use filter::ImageFilter;
pub use walker::{DirectoryScanner, ScanConfig};

use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A candidate image file found in the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFile {
    /// Path to the file, as listed (links are not resolved)
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Result of listing a directory
#[derive(Debug)]
pub struct ScanResult {
    /// Candidate files, sorted by file name
    pub files: Vec<CandidateFile>,
    /// Entries that could not be read (non-fatal)
    pub errors: Vec<ScanError>,
}
