//! # Frame Dedup
//!
//! Removes near-duplicate stills from a directory of monitoring-camera
//! captures, keeping the higher-resolution copy of each duplicate pair.
//!
//! ## Architecture
//! The library is split into a core engine (UI-agnostic) and presentation layers:
//! - `core` - Listing, decoding, change detection, sweep and deletion
//! - `events` - Event-driven progress reporting
//! - `error` - Error types
//! - `cli` - Command-line interface (binary only)

pub mod core;
pub mod error;
pub mod events;

// Re-export commonly used types at the crate root
pub use error::{FrameDedupError, Result};

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the library.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies. Logs go to
/// stderr so machine-readable output on stdout stays clean.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
