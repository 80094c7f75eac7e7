//! # frame-dedup CLI
//!
//! Command-line interface for the camera frame deduplicator.
//!
//! ## Usage
//! ```bash
//! frame-dedup /data/camera-7
//! frame-dedup /data/camera-7 --dry-run --output json
//! ```

mod cli;

use frame_dedup::Result;

fn main() -> Result<()> {
    cli::run()
}
