//! Enumeration and the corruption scan
//!
//! Both walk the full tree on every call. Results are a best-effort
//! snapshot: files created or removed during the walk may or may not be
//! observed.

use crate::address::Address;
use hashstore_core::STAGING_PREFIX;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

use super::types::Store;

type PruneFn = Box<dyn FnMut(&DirEntry) -> bool + Send>;

/// Lazy walk over every stored file, yielding absolute paths.
///
/// The staging directory is skipped when it lives inside the root, so
/// in-flight staged files are never reported as content.
pub struct Files {
    walker: walkdir::FilterEntry<walkdir::IntoIter, PruneFn>,
    staging_root: PathBuf,
}

impl Files {
    fn new(root: &Path, staging_root: &Path) -> Self {
        let pruned = (staging_root != root && staging_root.starts_with(root))
            .then(|| staging_root.to_path_buf());
        let keep: PruneFn = Box::new(move |entry: &DirEntry| match &pruned {
            Some(pruned) => !(entry.file_type().is_dir() && entry.path() == pruned.as_path()),
            None => true,
        });

        Self {
            walker: WalkDir::new(root)
                .min_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_entry(keep),
            staging_root: staging_root.to_path_buf(),
        }
    }

    fn is_staged(&self, path: &Path) -> bool {
        path.parent() == Some(self.staging_root.as_path())
            && path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().starts_with(STAGING_PREFIX))
    }
}

impl Iterator for Files {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            match self.walker.next()? {
                Ok(entry) => {
                    if entry.file_type().is_file() && !self.is_staged(entry.path()) {
                        return Some(entry.into_path());
                    }
                }
                Err(e) => {
                    warn!(
                        path = ?e.path(),
                        error = %e,
                        "skipping unreadable entry during store walk"
                    );
                }
            }
        }
    }
}

impl std::fmt::Debug for Files {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Files")
            .field("staging_root", &self.staging_root)
            .finish_non_exhaustive()
    }
}

/// A stored file whose bytes no longer hash to its name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corruption {
    /// Where the file actually is
    pub path: PathBuf,
    /// Where its current content should live
    pub expected: Address,
}

/// Lazy corruption scan over a store, see [`Store::corrupted`]
#[derive(Debug)]
pub struct Corrupted<'a> {
    store: &'a Store,
    files: Files,
}

impl Iterator for Corrupted<'_> {
    type Item = Corruption;

    fn next(&mut self) -> Option<Corruption> {
        let inner = &self.store.inner;
        loop {
            let path = self.files.next()?;
            let digest = match inner.engine.hash_file(&path, None) {
                Ok(digest) => digest,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable file during scan");
                    continue;
                }
            };

            let expected = inner.sharder.join(&inner.root, &digest);
            if expected != path {
                return Some(Corruption {
                    path,
                    expected: Address::new(digest, expected, false, &inner.root),
                });
            }
        }
    }
}

impl Store {
    /// Every stored file, as absolute paths
    pub fn files(&self) -> Files {
        Files::new(&self.inner.root, self.inner.staging.root())
    }

    /// Number of stored files
    pub fn count(&self) -> usize {
        self.files().count()
    }

    /// Alias of [`count`](Self::count)
    pub fn len(&self) -> usize {
        self.count()
    }

    pub fn is_empty(&self) -> bool {
        self.files().next().is_none()
    }

    /// Sum of the byte sizes of every stored file
    pub fn size(&self) -> u64 {
        self.files()
            .filter_map(|path| match fs::metadata(&path) {
                Ok(metadata) => Some(metadata.len()),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file vanished during size scan");
                    None
                }
            })
            .sum()
    }

    /// Stored files whose location does not match their current content,
    /// each paired with the address that content should have.
    ///
    /// Reports only; nothing is moved or repaired.
    pub fn corrupted(&self) -> Corrupted<'_> {
        Corrupted {
            store: self,
            files: self.files(),
        }
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = PathBuf;
    type IntoIter = Files;

    fn into_iter(self) -> Files {
        self.files()
    }
}
