//! Directory listing implementation using walkdir.

use super::{filter::ImageFilter, CandidateFile, ScanResult};
use crate::error::ScanError;
use crate::events::{null_sender, Event, EventSender, ScanEvent};
use std::io;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Configuration for the directory scanner
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Whether to include hidden files and directories. On by default so a
    /// plain listing sees every frame.
    pub include_hidden: bool,
    /// How deep to descend; 1 lists only the directory itself
    pub max_depth: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            max_depth: 1,
        }
    }
}

/// Lists candidate images in a single directory
pub struct DirectoryScanner {
    config: ScanConfig,
    filter: ImageFilter,
}

impl DirectoryScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Self {
        let filter = ImageFilter::new().with_hidden(config.include_hidden);
        Self { config, filter }
    }

    /// List the directory without progress reporting
    pub fn scan(&self, directory: &Path) -> Result<ScanResult, ScanError> {
        self.scan_with_events(directory, &null_sender())
    }

    /// List the directory, reporting each candidate through `events`.
    ///
    /// A missing directory is fatal. Unreadable entries, dangling links
    /// included, are collected in [`ScanResult::errors`]. Symlinked frames
    /// are listed under the link's path.
    pub fn scan_with_events(
        &self,
        directory: &Path,
        events: &EventSender,
    ) -> Result<ScanResult, ScanError> {
        if !directory.is_dir() {
            return Err(ScanError::DirectoryNotFound {
                path: directory.to_path_buf(),
            });
        }

        events.send(Event::Scan(ScanEvent::Started {
            directory: directory.to_path_buf(),
        }));

        let mut files = Vec::new();
        let mut errors = Vec::new();

        let include_hidden = self.config.include_hidden;
        let walker = WalkDir::new(directory)
            .min_depth(1)
            .max_depth(self.config.max_depth.max(1))
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| include_hidden || !is_hidden_dir(entry));

        for entry_result in walker {
            let entry = match entry_result {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf).unwrap_or_default();
                    let error = if e.io_error().map(io::Error::kind)
                        == Some(io::ErrorKind::PermissionDenied)
                    {
                        ScanError::PermissionDenied { path: path.clone() }
                    } else {
                        ScanError::ReadEntry {
                            path: path.clone(),
                            source: io::Error::new(io::ErrorKind::Other, e.to_string()),
                        }
                    };

                    events.send(Event::Scan(ScanEvent::Error {
                        path,
                        message: error.to_string(),
                    }));
                    errors.push(error);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.filter.should_include(entry.path()) {
                continue;
            }

            match entry.metadata() {
                Ok(metadata) => {
                    let path = entry.into_path();
                    events.send(Event::Scan(ScanEvent::FileFound { path: path.clone() }));
                    files.push(CandidateFile {
                        size: metadata.len(),
                        path,
                    });
                }
                Err(e) => {
                    let error = ScanError::ReadEntry {
                        path: entry.path().to_path_buf(),
                        source: io::Error::new(io::ErrorKind::Other, e.to_string()),
                    };
                    events.send(Event::Scan(ScanEvent::Error {
                        path: entry.path().to_path_buf(),
                        message: error.to_string(),
                    }));
                    errors.push(error);
                }
            }
        }

        tracing::debug!(
            directory = %directory.display(),
            candidates = files.len(),
            "directory listed"
        );

        events.send(Event::Scan(ScanEvent::Completed {
            total_files: files.len(),
        }));

        Ok(ScanResult { files, errors })
    }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| name.starts_with('.'))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        let mut file = File::create(dir.join(name)).unwrap();
        file.write_all(b"not decoded here").unwrap();
    }

    #[test]
    fn scan_empty_directory_returns_empty_vec() {
        let temp_dir = TempDir::new().unwrap();
        let scanner = DirectoryScanner::new(ScanConfig::default());

        let result = scanner.scan(temp_dir.path()).unwrap();

        assert!(result.files.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn scan_returns_files_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "c23-3.png");
        touch(temp_dir.path(), "c23-1.png");
        touch(temp_dir.path(), "c23-2.jpg");

        let scanner = DirectoryScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        let names: Vec<_> = result
            .files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["c23-1.png", "c23-2.jpg", "c23-3.png"]);
        assert_eq!(result.files[1].size, 16);
    }

    #[test]
    fn scan_excludes_non_image_files() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "frame.png");
        touch(temp_dir.path(), "log.txt");

        let scanner = DirectoryScanner::new(ScanConfig::default());
        let result = scanner.scan(temp_dir.path()).unwrap();

        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].path.ends_with("frame.png"));
    }

    #[test]
    fn scan_does_not_descend_by_default() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("archive");
        fs::create_dir(&nested).unwrap();
        touch(temp_dir.path(), "top.png");
        touch(&nested, "nested.png");

        let flat = DirectoryScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        assert_eq!(flat.files.len(), 1);

        let deep = DirectoryScanner::new(ScanConfig {
            max_depth: 2,
            ..Default::default()
        })
        .scan(temp_dir.path())
        .unwrap();
        assert_eq!(deep.files.len(), 2);
    }

    #[test]
    fn scan_lists_hidden_files_by_default() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), ".c10-1.png");
        touch(temp_dir.path(), "c10-2.png");

        let listed = DirectoryScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();
        assert_eq!(listed.files.len(), 2);

        let skipped = DirectoryScanner::new(ScanConfig {
            include_hidden: false,
            ..Default::default()
        })
        .scan(temp_dir.path())
        .unwrap();
        assert_eq!(skipped.files.len(), 1);
        assert!(skipped.files[0].path.ends_with("c10-2.png"));
    }

    #[test]
    fn scan_skips_hidden_directories_when_asked() {
        let temp_dir = TempDir::new().unwrap();
        let hidden = temp_dir.path().join(".cache");
        fs::create_dir(&hidden).unwrap();
        touch(&hidden, "thumb.png");

        let result = DirectoryScanner::new(ScanConfig {
            include_hidden: false,
            max_depth: 3,
        })
        .scan(temp_dir.path())
        .unwrap();

        assert!(result.files.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn scan_follows_symlinked_frames() {
        let temp_dir = TempDir::new().unwrap();
        let store = TempDir::new().unwrap();
        touch(store.path(), "real.png");
        std::os::unix::fs::symlink(store.path().join("real.png"), temp_dir.path().join("c10-1.png"))
            .unwrap();
        touch(temp_dir.path(), "c10-2.png");

        let result = DirectoryScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(result.files.len(), 2);
        assert!(result.files[0].path.ends_with("c10-1.png"));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_link_is_recorded_not_fatal() {
        let temp_dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("gone.png"), temp_dir.path().join("c10-1.png"))
            .unwrap();
        touch(temp_dir.path(), "c10-2.png");

        let result = DirectoryScanner::new(ScanConfig::default())
            .scan(temp_dir.path())
            .unwrap();

        assert_eq!(result.files.len(), 1);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn scan_nonexistent_directory_is_fatal() {
        let scanner = DirectoryScanner::new(ScanConfig::default());
        let result = scanner.scan(Path::new("/nonexistent/camera/12345"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }

    #[test]
    fn scan_of_a_file_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        touch(temp_dir.path(), "frame.png");

        let scanner = DirectoryScanner::new(ScanConfig::default());
        let result = scanner.scan(&temp_dir.path().join("frame.png"));

        assert!(matches!(result, Err(ScanError::DirectoryNotFound { .. })));
    }
}
