//! Event type definitions for progress reporting.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// All events emitted by the deduplication pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Directory listing events
    Scan(ScanEvent),
    /// Decode and preprocessing events
    Load(LoadEvent),
    /// Pairwise comparison events
    Compare(CompareEvent),
    /// File removal events
    Delete(DeleteEvent),
    /// Pipeline-level events
    Pipeline(PipelineEvent),
}

/// Events during directory listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScanEvent {
    /// Listing has started
    Started { directory: PathBuf },
    /// A candidate image file was found
    FileFound { path: PathBuf },
    /// An entry could not be read but listing continues
    Error { path: PathBuf, message: String },
    /// Listing completed
    Completed { total_files: usize },
}

/// Events while decoding candidate files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadEvent {
    /// Decoding has started
    Started { total_files: usize },
    /// Progress update during decoding
    Progress(LoadProgress),
    /// A file did not decode as an image and will be ignored
    Skipped { path: PathBuf, reason: String },
    /// Decoding completed
    Completed { valid_frames: usize, skipped: usize },
}

/// Progress information during decoding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadProgress {
    /// Number of files processed so far
    pub completed: usize,
    /// Total number of files to process
    pub total: usize,
    /// File just processed
    pub current_path: PathBuf,
}

/// Events during the pairwise sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    /// Sweep has started
    Started { total_frames: usize },
    /// A new anchor frame is being compared against the rest
    AnchorStarted { path: PathBuf, index: usize },
    /// Progress update during the sweep
    Progress(CompareProgress),
    /// A duplicate pair was found
    DuplicateFound { kept: PathBuf, removed: PathBuf, score: f64 },
    /// Sweep completed
    Completed { comparisons: usize, duplicates: usize },
}

/// Progress information during the sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareProgress {
    /// Anchors fully processed so far
    pub anchors_completed: usize,
    /// Total number of anchors
    pub total_anchors: usize,
    /// Duplicates flagged so far
    pub duplicates_found: usize,
}

/// Events during file removal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DeleteEvent {
    /// Removal has started
    Started { total: usize },
    /// A file was removed
    Deleted { path: PathBuf },
    /// Removal completed
    Completed { deleted: usize },
}

/// Pipeline-level events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEvent {
    /// Pipeline has started
    Started,
    /// Moving to a new phase
    PhaseChanged { phase: PipelinePhase },
    /// Pipeline completed successfully
    Completed { summary: PipelineSummary },
    /// Pipeline encountered a fatal error
    Error { message: String },
}

/// Phases of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelinePhase {
    Scanning,
    Loading,
    Comparing,
    Deleting,
}

/// Summary of pipeline results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Candidate image files listed
    pub total_files: usize,
    /// Files that decoded as images
    pub valid_frames: usize,
    /// Duplicates found
    pub duplicate_count: usize,
    /// Files actually removed (zero on a dry run)
    pub deleted_count: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl std::fmt::Display for PipelinePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelinePhase::Scanning => write!(f, "Scanning"),
            PipelinePhase::Loading => write!(f, "Loading"),
            PipelinePhase::Comparing => write!(f, "Comparing"),
            PipelinePhase::Deleting => write!(f, "Deleting"),
        }
    }
}
