//! # Pipeline Module
//!
//! Orchestrates a full deduplication run.
//!
//! ## Pipeline Stages
//! 1. **Scan** - List candidate images in the directory
//! 2. **Load** - Decode and preprocess each candidate, skipping invalid files
//! 3. **Compare** - Sweep all pairs and flag lower-resolution duplicates
//! 4. **Delete** - Remove the flagged files (unless dry run)
//!
//! ## Parallelism
//! Loading uses rayon across CPU cores. The sweep is sequential because each
//! decision depends on which frames were already flagged.
//!
//! ## Memory
//! Every frame is decoded once and its preprocessed grayscale copy is kept
//! until the sweep ends, roughly one byte per pixel per frame. Pairs are
//! never re-read from disk, so a sweep over `n` frames costs `n` decodes
//! instead of `n²`, at the price of holding the whole directory in memory.

mod executor;

pub use executor::{Pipeline, PipelineBuilder, PipelineConfig, PipelineResult};
