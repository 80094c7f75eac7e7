//! Pipeline execution implementation.

use crate::core::change::{BorderMask, ChangeDetector, ContourChangeDetector, PreprocessConfig};
use crate::core::cleaner::{Cleaner, DeletionReport};
use crate::core::comparator::{
    ChangeRatioStrategy, DuplicateFinder, DuplicateMatch, PreparedFrame, CHANGE_RATIO,
};
use crate::core::frame::FrameLoader;
use crate::core::scanner::{CandidateFile, DirectoryScanner, ScanConfig};
use crate::error::FrameDedupError;
use crate::events::{
    null_sender, Event, EventSender, LoadEvent, LoadProgress, PipelineEvent, PipelinePhase,
    PipelineSummary,
};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

/// Result of pipeline execution
#[derive(Debug)]
pub struct PipelineResult {
    /// Candidate image files listed
    pub total_files: usize,
    /// Files that decoded as images
    pub valid_frames: usize,
    /// Candidates that did not decode and were left alone
    pub skipped: Vec<PathBuf>,
    /// Duplicate pairs, in the order found
    pub matches: Vec<DuplicateMatch>,
    /// Pairs scored during the sweep
    pub comparisons: usize,
    /// What the cleaner did
    pub deletion: DeletionReport,
    /// Bytes on disk held by the flagged duplicates
    pub duplicate_bytes: u64,
    /// Whether removal was skipped
    pub dry_run: bool,
    /// Non-fatal listing errors
    pub errors: Vec<String>,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl PipelineResult {
    /// Paths flagged as duplicates
    pub fn duplicate_paths(&self) -> Vec<PathBuf> {
        self.matches.iter().map(|m| m.removed.clone()).collect()
    }
}

/// Configuration for the pipeline
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the camera frames
    pub directory: PathBuf,
    /// Share of the frame that may change for a pair to be duplicates
    pub change_ratio: f64,
    /// Frame preprocessing
    pub preprocess: PreprocessConfig,
    /// Scanner configuration
    pub scan_config: ScanConfig,
    /// Report duplicates without removing them
    pub dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            change_ratio: CHANGE_RATIO,
            preprocess: PreprocessConfig::default(),
            scan_config: ScanConfig::default(),
            dry_run: false,
        }
    }
}

/// Builder for pipeline configuration
pub struct PipelineBuilder {
    config: PipelineConfig,
    detector: Option<Box<dyn ChangeDetector>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
            detector: None,
        }
    }

    /// Directory to deduplicate
    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.config.directory = directory.into();
        self
    }

    /// Set the duplicate change ratio
    pub fn change_ratio(mut self, ratio: f64) -> Self {
        self.config.change_ratio = ratio;
        self
    }

    /// Gaussian kernel sizes applied before differencing
    pub fn blur_kernels(mut self, kernels: Vec<u32>) -> Self {
        self.config.preprocess.blur_kernels = kernels;
        self
    }

    /// Border strips to blank before differencing
    pub fn mask(mut self, mask: BorderMask) -> Self {
        self.config.preprocess.mask = Some(mask);
        self
    }

    /// Compare whole frames, overlays included
    pub fn no_mask(mut self) -> Self {
        self.config.preprocess.mask = None;
        self
    }

    /// Include hidden files
    pub fn include_hidden(mut self, include: bool) -> Self {
        self.config.scan_config.include_hidden = include;
        self
    }

    /// Set scanner configuration
    pub fn scan_config(mut self, config: ScanConfig) -> Self {
        self.config.scan_config = config;
        self
    }

    /// Report duplicates but keep them on disk
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.config.dry_run = dry_run;
        self
    }

    /// Replace the change detector
    pub fn detector(mut self, detector: Box<dyn ChangeDetector>) -> Self {
        self.detector = Some(detector);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        let preprocess = self.config.preprocess.clone();
        Pipeline {
            config: self.config,
            detector: self
                .detector
                .unwrap_or_else(|| Box::new(ContourChangeDetector::new(preprocess))),
        }
    }
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The frame deduplication pipeline
pub struct Pipeline {
    config: PipelineConfig,
    detector: Box<dyn ChangeDetector>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline without events
    pub fn run(&self) -> Result<PipelineResult, FrameDedupError> {
        self.run_with_events(&null_sender())
    }

    /// Run the pipeline with event reporting
    pub fn run_with_events(
        &self,
        events: &EventSender,
    ) -> Result<PipelineResult, FrameDedupError> {
        let result = self.execute(events);
        if let Err(ref e) = result {
            events.send(Event::Pipeline(PipelineEvent::Error {
                message: e.to_string(),
            }));
        }
        result
    }

    fn execute(&self, events: &EventSender) -> Result<PipelineResult, FrameDedupError> {
        let start_time = Instant::now();

        let strategy = ChangeRatioStrategy::new(self.config.change_ratio)?;
        self.config.preprocess.validate()?;

        events.send(Event::Pipeline(PipelineEvent::Started));

        // Phase 1: Scanning
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Scanning,
        }));

        let scanner = DirectoryScanner::new(self.config.scan_config.clone());
        let scan_result = scanner.scan_with_events(&self.config.directory, events)?;
        let errors: Vec<String> = scan_result.errors.iter().map(|e| e.to_string()).collect();
        let total_files = scan_result.files.len();

        // Phase 2: Loading
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Loading,
        }));
        let (frames, skipped) = self.load_frames(&scan_result.files, events);

        // Phase 3: Comparing
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Comparing,
        }));
        let mut finder = DuplicateFinder::new(self.detector.as_ref(), &strategy);
        let matches = finder.find_with_events(&frames, events)?;
        let comparisons = finder.comparisons();

        let flagged: HashSet<&Path> = matches.iter().map(|m| m.removed.as_path()).collect();
        let duplicate_bytes = scan_result
            .files
            .iter()
            .filter(|file| flagged.contains(file.path.as_path()))
            .map(|file| file.size)
            .sum();

        // Phase 4: Deleting
        events.send(Event::Pipeline(PipelineEvent::PhaseChanged {
            phase: PipelinePhase::Deleting,
        }));
        let duplicates: Vec<PathBuf> = matches.iter().map(|m| m.removed.clone()).collect();
        let deletion = Cleaner::new(self.config.dry_run).delete_with_events(&duplicates, events)?;

        let duration_ms = start_time.elapsed().as_millis() as u64;

        events.send(Event::Pipeline(PipelineEvent::Completed {
            summary: PipelineSummary {
                total_files,
                valid_frames: frames.len(),
                duplicate_count: matches.len(),
                deleted_count: deletion.deleted_count(),
                duration_ms,
            },
        }));

        Ok(PipelineResult {
            total_files,
            valid_frames: frames.len(),
            skipped,
            matches,
            comparisons,
            deletion,
            duplicate_bytes,
            dry_run: self.config.dry_run,
            errors,
            duration_ms,
        })
    }

    /// Decode and preprocess every candidate in parallel, keeping listing
    /// order. Files that fail to decode are skipped.
    fn load_frames(
        &self,
        files: &[CandidateFile],
        events: &EventSender,
    ) -> (Vec<PreparedFrame>, Vec<PathBuf>) {
        events.send(Event::Load(LoadEvent::Started {
            total_files: files.len(),
        }));

        let completed = AtomicUsize::new(0);
        let detector = self.detector.as_ref();

        let loaded: Vec<Result<PreparedFrame, PathBuf>> = files
            .par_iter()
            .map(|file| {
                let outcome = match FrameLoader::load(&file.path) {
                    Ok(frame) => Ok(PreparedFrame {
                        width: frame.width(),
                        height: frame.height(),
                        gray: detector.preprocess(&frame),
                        path: frame.path,
                    }),
                    Err(e) => {
                        tracing::debug!(path = %file.path.display(), error = %e, "skipping invalid image");
                        events.send(Event::Load(LoadEvent::Skipped {
                            path: file.path.clone(),
                            reason: e.to_string(),
                        }));
                        Err(file.path.clone())
                    }
                };

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                events.send(Event::Load(LoadEvent::Progress(LoadProgress {
                    completed: done,
                    total: files.len(),
                    current_path: file.path.clone(),
                })));

                outcome
            })
            .collect();

        let mut frames = Vec::with_capacity(loaded.len());
        let mut skipped = Vec::new();
        for outcome in loaded {
            match outcome {
                Ok(frame) => frames.push(frame),
                Err(path) => skipped.push(path),
            }
        }

        events.send(Event::Load(LoadEvent::Completed {
            valid_frames: frames.len(),
            skipped: skipped.len(),
        }));

        (frames, skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CompareError;
    use image::{Rgb, RgbImage};
    use std::fs;
    use tempfile::TempDir;

    fn save_flat(dir: &TempDir, name: &str, width: u32, height: u32, shade: u8) -> PathBuf {
        let path = dir.path().join(name);
        RgbImage::from_pixel(width, height, Rgb([shade, shade, shade]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn builder_defaults() {
        let pipeline = Pipeline::builder().directory("/cam").build();
        assert_eq!(pipeline.config().change_ratio, CHANGE_RATIO);
        assert!(!pipeline.config().dry_run);
        assert_eq!(pipeline.config().scan_config.max_depth, 1);
    }

    #[test]
    fn pipeline_handles_empty_directory() {
        let dir = TempDir::new().unwrap();
        let result = Pipeline::builder().directory(dir.path()).build().run().unwrap();

        assert_eq!(result.total_files, 0);
        assert!(result.matches.is_empty());
    }

    #[test]
    fn invalid_change_ratio_is_rejected_before_scanning() {
        let result = Pipeline::builder()
            .directory("/nonexistent/camera")
            .change_ratio(2.0)
            .build()
            .run();

        assert!(matches!(
            result,
            Err(FrameDedupError::Compare(CompareError::InvalidChangeRatio { .. }))
        ));
    }

    #[test]
    fn undecodable_files_are_skipped_not_deleted() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"definitely not a png").unwrap();
        save_flat(&dir, "ok.png", 16, 16, 10);

        let result = Pipeline::builder().directory(dir.path()).build().run().unwrap();

        assert_eq!(result.total_files, 2);
        assert_eq!(result.valid_frames, 1);
        assert_eq!(result.skipped, vec![broken.clone()]);
        assert!(broken.exists());
    }

    #[test]
    fn dry_run_reports_without_deleting() {
        let dir = TempDir::new().unwrap();
        let small = save_flat(&dir, "a.png", 40, 30, 120);
        save_flat(&dir, "b.png", 80, 60, 120);

        let result = Pipeline::builder()
            .directory(dir.path())
            .no_mask()
            .dry_run(true)
            .build()
            .run()
            .unwrap();

        assert_eq!(result.duplicate_paths(), vec![small.clone()]);
        assert_eq!(result.deletion.planned, vec![small.clone()]);
        assert_eq!(result.duplicate_bytes, fs::metadata(&small).unwrap().len());
        assert!(small.exists());
    }
}
