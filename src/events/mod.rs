//! # Events Module
//!
//! Progress reporting over channels, so the CLI can draw a progress bar
//! while the pipeline runs on the calling thread.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Compare(CompareEvent::DuplicateFound { removed, .. }) = event {
//!             println!("duplicate: {}", removed.display());
//!         }
//!     }
//! });
//!
//! pipeline.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
