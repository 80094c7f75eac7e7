//! # Error Module
//!
//! Error types for the frame deduplicator.
//!
//! Unreadable images are not errors: the loader reports them and the
//! pipeline skips them. Everything here is something the caller has to
//! deal with.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum FrameDedupError {
    #[error("Scanning error: {0}")]
    Scan(#[from] ScanError),

    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Deletion error: {0}")]
    Delete(#[from] DeleteError),
}

/// Errors that occur while listing the input directory
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Permission denied accessing: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to read directory entry {path}: {source}")]
    ReadEntry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur while decoding or resizing a frame
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Resize to {width}x{height} failed: {reason}")]
    ResizeFailed {
        width: u32,
        height: u32,
        reason: String,
    },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the change detector
#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Frames differ in size: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    #[error("Invalid change ratio: {value} (must be in (0, 1])")]
    InvalidChangeRatio { value: f64 },

    #[error("Invalid blur kernel: {size} (must be odd and positive)")]
    InvalidBlurKernel { size: u32 },
}

/// Errors that occur while removing duplicates from disk
#[derive(Error, Debug)]
pub enum DeleteError {
    #[error("Permission denied deleting {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Failed to delete {path}: {source}")]
    RemoveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DeleteError {
    /// Classify an I/O failure from `remove_file`
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            DeleteError::PermissionDenied { path }
        } else {
            DeleteError::RemoveFailed { path, source }
        }
    }
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, FrameDedupError>;
