//! Moving staged content to its final, content-addressed name
//!
//! The final file is only ever created by a single `link(2)`, which fails
//! with `EEXIST` when the name is taken. Two committers racing on the same
//! digest therefore see exactly one success and one duplicate.

use crate::permissions::create_dir_all_with_mode;
use crate::staging::StagedFile;
use hashstore_core::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, instrument};

/// How a commit terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    /// The staged file became the stored object
    Created,
    /// An object with this digest was already stored; the staged copy was
    /// discarded without comparing bytes
    Duplicate,
}

impl CommitOutcome {
    pub fn is_duplicate(self) -> bool {
        matches!(self, CommitOutcome::Duplicate)
    }
}

/// Links staged files into the sharded tree
#[derive(Debug, Clone, Copy)]
pub struct Committer {
    dir_mode: u32,
}

impl Committer {
    pub fn new(dir_mode: u32) -> Self {
        Self { dir_mode }
    }

    /// Commit `staged` to `final_path`.
    ///
    /// The staged name is removed on every exit path, including errors.
    #[instrument(skip_all, fields(final_path = %final_path.display()))]
    pub fn commit(&self, staged: StagedFile, final_path: &Path) -> Result<CommitOutcome> {
        self.commit_with(staged, final_path, |path| self.create_parent(path))
    }

    /// Link, and on a missing parent run `prepare` before the single retry.
    /// An `AlreadyExists` on either link means another committer stored the
    /// same digest first.
    fn commit_with<F>(
        &self,
        staged: StagedFile,
        final_path: &Path,
        prepare: F,
    ) -> Result<CommitOutcome>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let outcome = match link(staged.path(), final_path) {
            Ok(outcome) => outcome,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                prepare(final_path)?;
                link(staged.path(), final_path)
                    .map_err(|e| Error::file_system(final_path, "link stored file", e))?
            }
            Err(e) => return Err(Error::file_system(final_path, "link stored file", e)),
        };

        staged.discard();
        debug!(duplicate = outcome.is_duplicate(), "commit finished");
        Ok(outcome)
    }

    fn create_parent(&self, final_path: &Path) -> Result<()> {
        let Some(parent) = final_path.parent() else {
            return Ok(());
        };
        create_dir_all_with_mode(parent, self.dir_mode)
            .map_err(|e| Error::file_system(parent, "create shard directory", e))
    }
}

fn link(staged_path: &Path, final_path: &Path) -> io::Result<CommitOutcome> {
    match fs::hard_link(staged_path, final_path) {
        Ok(()) => Ok(CommitOutcome::Created),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(CommitOutcome::Duplicate),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::StagingArea;
    use std::io::Write;
    use tempfile::TempDir;

    fn staged_with(area: &StagingArea, content: &[u8]) -> StagedFile {
        let mut staged = area.stage().unwrap();
        staged.write_all(content).unwrap();
        staged.finish().unwrap();
        staged
    }

    fn staging_is_empty(area: &StagingArea) -> bool {
        fs::read_dir(area.root()).unwrap().next().is_none()
    }

    #[test]
    fn test_commit_creates_missing_shard_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        let final_path = temp_dir.path().join("store/a/b/c/abc");

        let staged = staged_with(&area, b"content");
        let outcome = Committer::new(0o755).commit(staged, &final_path).unwrap();

        assert_eq!(outcome, CommitOutcome::Created);
        assert_eq!(fs::read(&final_path).unwrap(), b"content");
        assert!(staging_is_empty(&area));
    }

    #[test]
    fn test_commit_existing_target_is_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        let final_path = temp_dir.path().join("object");
        fs::write(&final_path, b"original").unwrap();

        let staged = staged_with(&area, b"different bytes");
        let outcome = Committer::new(0o755).commit(staged, &final_path).unwrap();

        assert!(outcome.is_duplicate());
        // Existing content is trusted, never overwritten
        assert_eq!(fs::read(&final_path).unwrap(), b"original");
        assert!(staging_is_empty(&area));
    }

    #[test]
    fn test_commit_failure_still_removes_staged_file() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        // A regular file where a shard directory is expected
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        let final_path = blocker.join("x").join("object");

        let staged = staged_with(&area, b"content");
        let err = Committer::new(0o755).commit(staged, &final_path).unwrap_err();

        assert_eq!(err.kind(), hashstore_core::ErrorKind::FileSystem);
        assert!(staging_is_empty(&area));
    }

    #[test]
    fn test_retry_losing_race_is_duplicate() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        let final_path = temp_dir.path().join("store/a/object");
        let committer = Committer::new(0o755);

        let staged = staged_with(&area, b"ours");
        // Another writer fills the name between our mkdir and the relink
        let outcome = committer
            .commit_with(staged, &final_path, |path| {
                committer.create_parent(path)?;
                fs::write(path, b"theirs").map_err(Error::from)
            })
            .unwrap();

        assert_eq!(outcome, CommitOutcome::Duplicate);
        assert_eq!(fs::read(&final_path).unwrap(), b"theirs");
        assert!(staging_is_empty(&area));
    }

    #[test]
    fn test_retry_failure_is_fatal_and_removes_staged_file() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        let final_path = temp_dir.path().join("store/a/object");
        let committer = Committer::new(0o755);

        let staged = staged_with(&area, b"content");
        // The parent is removed again before the retry can use it
        let err = committer
            .commit_with(staged, &final_path, |path| {
                committer.create_parent(path)?;
                fs::remove_dir(path.parent().unwrap()).map_err(Error::from)
            })
            .unwrap_err();

        assert_eq!(err.kind(), hashstore_core::ErrorKind::FileSystem);
        assert!(!final_path.exists());
        assert!(staging_is_empty(&area));
    }

    #[test]
    fn test_prepare_failure_removes_staged_file() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        let final_path = temp_dir.path().join("store/a/object");

        let staged = staged_with(&area, b"content");
        let err = Committer::new(0o755)
            .commit_with(staged, &final_path, |_| {
                Err(Error::configuration("no shard directories"))
            })
            .unwrap_err();

        assert_eq!(err.kind(), hashstore_core::ErrorKind::Configuration);
        assert!(staging_is_empty(&area));
    }

    #[cfg(unix)]
    #[test]
    fn test_shard_dirs_get_dir_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path().join("staging"), 0o664, 0o755);
        let final_path = temp_dir.path().join("store/a/object");

        let staged = staged_with(&area, b"content");
        Committer::new(0o750).commit(staged, &final_path).unwrap();

        let mode = fs::metadata(temp_dir.path().join("store/a"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}
