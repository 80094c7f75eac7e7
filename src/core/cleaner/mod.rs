//! # Cleaner Module
//!
//! Removes duplicate frames from disk.
//!
//! Removal stops at the first failure and returns it; files removed before
//! that point stay removed.

use crate::error::DeleteError;
use crate::events::{null_sender, DeleteEvent, Event, EventSender};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// What happened during removal
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeletionReport {
    /// Files removed, in order
    pub deleted: Vec<PathBuf>,
    /// Files that would have been removed on a dry run
    pub planned: Vec<PathBuf>,
}

impl DeletionReport {
    pub fn deleted_count(&self) -> usize {
        self.deleted.len()
    }
}

/// Removes files, or only plans to on a dry run
#[derive(Debug, Clone, Copy, Default)]
pub struct Cleaner {
    dry_run: bool,
}

impl Cleaner {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn delete(&self, paths: &[PathBuf]) -> Result<DeletionReport, DeleteError> {
        self.delete_with_events(paths, &null_sender())
    }

    /// Remove each path in order
    pub fn delete_with_events(
        &self,
        paths: &[PathBuf],
        events: &EventSender,
    ) -> Result<DeletionReport, DeleteError> {
        let mut report = DeletionReport::default();

        if self.dry_run {
            for path in paths {
                tracing::info!("Would delete {}", path.display());
            }
            report.planned = paths.to_vec();
            return Ok(report);
        }

        events.send(Event::Delete(DeleteEvent::Started { total: paths.len() }));

        for path in paths {
            fs::remove_file(path).map_err(|e| DeleteError::from_io(path.clone(), e))?;
            tracing::info!("Image deleted: {}", path.display());
            events.send(Event::Delete(DeleteEvent::Deleted { path: path.clone() }));
            report.deleted.push(path.clone());
        }

        tracing::info!("The deletion has been completed");
        events.send(Event::Delete(DeleteEvent::Completed {
            deleted: report.deleted.len(),
        }));

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"frame").unwrap();
        path
    }

    #[test]
    fn deletes_every_listed_file() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.png");
        let b = touch(&dir, "b.png");
        let keep = touch(&dir, "keep.png");

        let report = Cleaner::new(false).delete(&[a.clone(), b.clone()]).unwrap();

        assert_eq!(report.deleted_count(), 2);
        assert!(!a.exists());
        assert!(!b.exists());
        assert!(keep.exists());
    }

    #[test]
    fn dry_run_leaves_files_in_place() {
        let dir = TempDir::new().unwrap();
        let a = touch(&dir, "a.png");

        let report = Cleaner::new(true).delete(&[a.clone()]).unwrap();

        assert_eq!(report.deleted_count(), 0);
        assert_eq!(report.planned, vec![a.clone()]);
        assert!(a.exists());
    }

    #[test]
    fn failure_stops_removal_and_is_returned() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("already-gone.png");
        let after = touch(&dir, "after.png");

        let result = Cleaner::new(false).delete(&[missing.clone(), after.clone()]);

        match result {
            Err(DeleteError::RemoveFailed { path, .. }) => assert_eq!(path, missing),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(after.exists());
    }

    #[test]
    fn empty_list_is_a_no_op() {
        let report = Cleaner::default().delete(&[]).unwrap();
        assert!(report.deleted.is_empty());
    }
}
