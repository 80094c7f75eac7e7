//! # Core Module
//!
//! The UI-agnostic deduplication engine.
//!
//! ## Modules
//! - `scanner` - Lists candidate images in a directory
//! - `frame` - Decodes frames and resizes them
//! - `change` - Scores the change between two frames
//! - `comparator` - Decides which frames are duplicates
//! - `cleaner` - Removes duplicates from disk
//! - `pipeline` - Orchestrates the full workflow

pub mod change;
pub mod cleaner;
pub mod comparator;
pub mod frame;
pub mod pipeline;
pub mod scanner;

// Re-export commonly used types
pub use change::{ChangeDetector, ChangeScore, ContourChangeDetector};
pub use comparator::{DuplicateMatch, PreparedFrame};
pub use frame::CameraFrame;
pub use scanner::CandidateFile;
