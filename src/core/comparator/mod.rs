//! # Comparator Module
//!
//! Finds duplicate frames with a pairwise sweep.
//!
//! ## How It Works
//! 1. Every frame is compared once with each frame after it
//! 2. Frames of different sizes are equalized by stretching the smaller one
//! 3. The change detector scores the pair; regions under 0.01% of the
//!    anchor's area are ignored
//! 4. A score at or below 10% of the frame area marks a duplicate, and the
//!    lower-resolution frame goes on the deletion list
//!
//! Frames on the deletion list take no further part in the sweep.

mod traits;

pub use traits::{ChangeRatioStrategy, ComparisonStrategy, CHANGE_RATIO};

use crate::core::change::{ChangeDetector, ChangeScore};
use crate::core::frame::FastResizer;
use crate::error::Result;
use crate::events::{null_sender, CompareEvent, CompareProgress, Event, EventSender};
use image::GrayImage;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Side of the anchor frame, as a fraction, that a changed region must
/// span to count; squared into an area ratio
pub const CONTOUR_AREA_RATIO: f64 = 0.01;

/// A frame ready for comparison
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    /// Where the frame was read from
    pub path: PathBuf,
    /// Decoded width
    pub width: u32,
    /// Decoded height
    pub height: u32,
    /// Preprocessed grayscale pixels
    pub gray: GrayImage,
}

impl PreparedFrame {
    /// Pixel count of the decoded frame
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A duplicate pair and the decision taken
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuplicateMatch {
    /// Frame that stays on disk
    pub kept: PathBuf,
    /// Lower-resolution frame scheduled for deletion
    pub removed: PathBuf,
    /// Change score of the pair
    pub score: f64,
    /// Largest score that still counted as a duplicate
    pub threshold: f64,
    /// Score as a fraction of the compared frame area
    pub changed_fraction: f64,
}

/// Smallest changed region, in pixels, that counts for this anchor
pub fn min_contour_area(anchor: &PreparedFrame) -> f64 {
    anchor.area() as f64 * CONTOUR_AREA_RATIO * CONTOUR_AREA_RATIO
}

/// Which of the pair to delete: the one with fewer pixels, or `b` on a tie
pub fn lower_resolution<'a>(a: &'a PreparedFrame, b: &'a PreparedFrame) -> &'a Path {
    if b.area() > a.area() {
        &a.path
    } else {
        &b.path
    }
}

/// Bring two frames to the same dimensions.
///
/// The frame with the smaller area is stretched to the other's size; when
/// areas match but shapes differ, `b` is stretched to `a`.
pub fn equalize<'a>(
    a: &'a PreparedFrame,
    b: &'a PreparedFrame,
    resizer: &mut FastResizer,
) -> Result<(Cow<'a, GrayImage>, Cow<'a, GrayImage>)> {
    if a.gray.dimensions() == b.gray.dimensions() {
        return Ok((Cow::Borrowed(&a.gray), Cow::Borrowed(&b.gray)));
    }

    if a.area() < b.area() {
        let (width, height) = b.gray.dimensions();
        let stretched = resizer.resize_gray(&a.gray, width, height)?;
        Ok((Cow::Owned(stretched), Cow::Borrowed(&b.gray)))
    } else {
        let (width, height) = a.gray.dimensions();
        let stretched = resizer.resize_gray(&b.gray, width, height)?;
        Ok((Cow::Borrowed(&a.gray), Cow::Owned(stretched)))
    }
}

/// Pairwise duplicate search
pub struct DuplicateFinder<'a> {
    detector: &'a dyn ChangeDetector,
    strategy: &'a dyn ComparisonStrategy,
    resizer: FastResizer,
    comparisons: usize,
}

impl<'a> DuplicateFinder<'a> {
    pub fn new(detector: &'a dyn ChangeDetector, strategy: &'a dyn ComparisonStrategy) -> Self {
        Self {
            detector,
            strategy,
            resizer: FastResizer::new(),
            comparisons: 0,
        }
    }

    /// Number of pairs scored so far
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Score one pair, `anchor` first
    pub fn score_pair(
        &mut self,
        anchor: &PreparedFrame,
        candidate: &PreparedFrame,
    ) -> Result<ChangeScore> {
        let (prev, next) = equalize(anchor, candidate, &mut self.resizer)?;
        let score = self
            .detector
            .compare(&prev, &next, min_contour_area(anchor))?;
        self.comparisons += 1;
        Ok(score)
    }

    pub fn find(&mut self, frames: &[PreparedFrame]) -> Result<Vec<DuplicateMatch>> {
        self.find_with_events(frames, &null_sender())
    }

    /// Sweep all pairs and return the duplicates in the order found
    pub fn find_with_events(
        &mut self,
        frames: &[PreparedFrame],
        events: &EventSender,
    ) -> Result<Vec<DuplicateMatch>> {
        events.send(Event::Compare(CompareEvent::Started {
            total_frames: frames.len(),
        }));

        let mut removed: HashSet<usize> = HashSet::new();
        let mut matches = Vec::new();

        for (i, anchor) in frames.iter().enumerate() {
            if removed.contains(&i) {
                continue;
            }

            tracing::info!("Searching duplicates for {}", anchor.display_name());
            events.send(Event::Compare(CompareEvent::AnchorStarted {
                path: anchor.path.clone(),
                index: i,
            }));

            for (j, candidate) in frames.iter().enumerate().skip(i + 1) {
                if removed.contains(&j) {
                    continue;
                }

                let score = self.score_pair(anchor, candidate)?;
                if !self.strategy.is_duplicate(&score) {
                    continue;
                }

                tracing::info!("Found duplicate {}", candidate.display_name());

                let drop_path = lower_resolution(anchor, candidate);
                let (kept, drop_index) = if drop_path == anchor.path.as_path() {
                    (&candidate.path, i)
                } else {
                    (&anchor.path, j)
                };

                events.send(Event::Compare(CompareEvent::DuplicateFound {
                    kept: kept.clone(),
                    removed: drop_path.to_path_buf(),
                    score: score.value,
                }));

                matches.push(DuplicateMatch {
                    kept: kept.clone(),
                    removed: drop_path.to_path_buf(),
                    score: score.value,
                    threshold: self.strategy.threshold(score.frame_area()),
                    changed_fraction: score.changed_fraction(),
                });
                removed.insert(drop_index);

                if drop_index == i {
                    break;
                }
            }

            events.send(Event::Compare(CompareEvent::Progress(CompareProgress {
                anchors_completed: i + 1,
                total_anchors: frames.len(),
                duplicates_found: matches.len(),
            })));
        }

        tracing::info!("The search has been completed");
        events.send(Event::Compare(CompareEvent::Completed {
            comparisons: self.comparisons,
            duplicates: matches.len(),
        }));

        Ok(matches)
    }
}
