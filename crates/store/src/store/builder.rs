//! Store construction and validation

use crate::commit::Committer;
use crate::config::StoreConfig;
use crate::hashing::DigestEngine;
use crate::permissions::create_dir_all_with_mode;
use crate::shard::PathSharder;
use crate::staging::StagingArea;
use hashstore_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::types::{Store, StoreInner};

impl Store {
    /// Build a store from `config`.
    ///
    /// The root is created if missing and canonicalised. The staging root
    /// is resolved through its deepest existing ancestor so that it can be
    /// compared with paths under the canonical root; it is created on the
    /// first `put`.
    pub fn new(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let algorithm = config.algorithm;
        let digest_len = algorithm.digest_len();
        let empty_len = algorithm.empty_digest().len();
        if empty_len != digest_len {
            return Err(Error::configuration(format!(
                "{algorithm} produces {empty_len} hex digits, expected {digest_len}"
            )));
        }

        let sharder = PathSharder::new(config.depth, config.width, digest_len)?;

        match create_dir_all_with_mode(&config.root, config.dir_mode) {
            Ok(()) => {}
            Err(e) => return Err(Error::file_system(&config.root, "create store root", e)),
        }
        let root = match config.root.canonicalize() {
            Ok(root) => root,
            Err(e) => return Err(Error::file_system(&config.root, "resolve store root", e)),
        };

        let staging_root = resolve_path(&config.resolved_staging_root())?;

        debug!(
            root = %root.display(),
            staging_root = %staging_root.display(),
            %algorithm,
            depth = config.depth,
            width = config.width,
            "opened store"
        );

        let staging = StagingArea::new(&staging_root, config.file_mode, config.dir_mode);
        let engine = DigestEngine::new(algorithm, config.block_size);
        let committer = Committer::new(config.dir_mode);
        let config = StoreConfig {
            root: root.clone(),
            staging_root: Some(staging_root),
            ..config
        };

        Ok(Self {
            inner: Arc::new(StoreInner {
                config,
                root,
                sharder,
                engine,
                staging,
                committer,
            }),
        })
    }

    /// Build a store at `root` with default settings
    pub fn at(root: impl Into<PathBuf>) -> Result<Self> {
        Self::new(StoreConfig::new(root))
    }
}

/// Absolute form of `path` with every existing prefix canonicalised.
///
/// Components that do not exist yet are appended to the canonical form of
/// the deepest ancestor that does.
fn resolve_path(path: &Path) -> Result<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(|e| Error::file_system(path, "resolve current directory", e))?
    };

    let mut missing = Vec::new();
    let mut existing = absolute.as_path();
    loop {
        match existing.canonicalize() {
            Ok(canonical) => {
                return Ok(missing
                    .iter()
                    .rev()
                    .fold(canonical, |resolved, name| resolved.join(name)));
            }
            Err(e) => match (existing.parent(), existing.components().next_back()) {
                (Some(parent), Some(name)) => {
                    missing.push(name.as_os_str().to_os_string());
                    existing = parent;
                }
                _ => return Err(Error::file_system(path, "resolve staging root", e)),
            },
        }
    }
}
