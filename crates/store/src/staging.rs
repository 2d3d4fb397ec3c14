//! Temporary files that content is streamed into before it is committed
//!
//! Staged files must live on the same filesystem as the store root:
//! committing is a hard link, which cannot cross devices.

use crate::permissions::{create_dir_all_with_mode, set_file_mode};
use hashstore_core::{Error, Result, STAGING_PREFIX};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Creates uniquely named staged files inside a staging root
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
    file_mode: u32,
    dir_mode: u32,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>, file_mode: u32, dir_mode: u32) -> Self {
        Self {
            root: root.into(),
            file_mode,
            dir_mode,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create a new staged file, creating the staging root on first use.
    pub fn stage(&self) -> Result<StagedFile> {
        let (file, path) = match self.create() {
            Ok(created) => created,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_dir_all_with_mode(&self.root, self.dir_mode)
                    .map_err(|e| Error::file_system(&self.root, "create staging directory", e))?;
                debug!(staging_root = %self.root.display(), "created staging directory");
                self.create()
                    .map_err(|e| Error::file_system(&self.root, "create staged file", e))?
            }
            Err(e) => return Err(Error::file_system(&self.root, "create staged file", e)),
        };

        let staged = StagedFile {
            writer: Some(BufWriter::new(file)),
            path,
            armed: true,
        };

        // On failure `staged` is dropped here, which removes the file
        set_file_mode(&staged.path, self.file_mode)
            .map_err(|e| Error::file_system(&staged.path, "set staged file permissions", e))?;

        Ok(staged)
    }

    fn create(&self) -> io::Result<(File, PathBuf)> {
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempfile_in(&self.root)?
            .keep()
            .map_err(|e| e.error)
    }
}

/// A staged file being filled by the digest engine.
///
/// The platform temp-file primitive does not delete it; instead the value
/// removes its own path when dropped unless it has already been
/// discarded by the committer, so a failed `put` never leaks it while the
/// process is alive.
#[derive(Debug)]
pub struct StagedFile {
    writer: Option<BufWriter<File>>,
    path: PathBuf,
    armed: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush buffered bytes, sync them to disk and close the handle
    pub fn finish(&mut self) -> io::Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// Remove the staged name. Called once the content has either been
    /// linked into place or found to be a duplicate.
    pub fn discard(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if !self.armed {
            return;
        }
        self.armed = false;
        self.writer = None;

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(
                    "Failed to remove staged file {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

impl Write for StagedFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.writer.as_mut() {
            Some(writer) => writer.write(buf),
            None => Err(io::Error::new(
                io::ErrorKind::Other,
                "staged file already finished",
            )),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        self.remove();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_stage_creates_missing_root() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("nested").join("staging");
        let area = StagingArea::new(&root, 0o664, 0o755);

        let staged = area.stage().unwrap();

        assert!(root.is_dir());
        assert!(staged.path().starts_with(&root));
        let name = staged.path().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with(STAGING_PREFIX));
    }

    #[test]
    fn test_staged_names_are_unique() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path(), 0o664, 0o755);

        let a = area.stage().unwrap();
        let b = area.stage().unwrap();

        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_drop_removes_staged_file() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path(), 0o664, 0o755);

        let mut staged = area.stage().unwrap();
        staged.write_all(b"partial").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_finish_persists_content() {
        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path(), 0o664, 0o755);

        let mut staged = area.stage().unwrap();
        staged.write_all(b"foo").unwrap();
        staged.finish().unwrap();

        assert_eq!(fs::read(staged.path()).unwrap(), b"foo");
        assert!(staged.write_all(b"more").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_file_mode_applied() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let area = StagingArea::new(temp_dir.path(), 0o640, 0o755);

        let staged = area.stage().unwrap();
        let mode = fs::metadata(staged.path()).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}
