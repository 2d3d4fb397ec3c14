//! Reclaiming staged files abandoned by crashed writers

use hashstore_core::{Error, Result, STAGING_PREFIX};
use serde::Serialize;
use std::fs;
use std::io;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};

use super::types::Store;

/// Outcome of [`Store::sweep_staging`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    /// Staged files removed
    pub removed: usize,
    /// Bytes freed by the removed files
    pub bytes_reclaimed: u64,
    /// Staged files left in place, too young or not removable
    pub skipped: usize,
}

impl Store {
    /// Remove staged files last modified more than `older_than` ago.
    ///
    /// Only names carrying the staging prefix are touched. A file still
    /// being written by a live `put` is younger than any sensible
    /// threshold; choose one well above the longest expected upload.
    pub fn sweep_staging(&self, older_than: Duration) -> Result<SweepReport> {
        let staging_root = self.inner.staging.root();
        let mut report = SweepReport::default();

        let entries = match fs::read_dir(staging_root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(report),
            Err(e) => return Err(Error::file_system(staging_root, "read staging directory", e)),
        };

        let now = SystemTime::now();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable staging entry");
                    continue;
                }
            };
            if !entry.file_name().to_string_lossy().starts_with(STAGING_PREFIX) {
                continue;
            }

            let path = entry.path();
            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping staged file");
                    report.skipped += 1;
                    continue;
                }
            };

            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or(Duration::ZERO);
            if age < older_than {
                report.skipped += 1;
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    report.removed += 1;
                    report.bytes_reclaimed += metadata.len();
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to remove staged file");
                    report.skipped += 1;
                }
            }
        }

        info!(
            removed = report.removed,
            bytes_reclaimed = report.bytes_reclaimed,
            skipped = report.skipped,
            "swept staging directory"
        );
        Ok(report)
    }
}
