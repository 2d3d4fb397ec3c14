//! Core store types

use crate::algorithm::HashAlgorithm;
use crate::commit::Committer;
use crate::config::StoreConfig;
use crate::hashing::DigestEngine;
use crate::shard::PathSharder;
use crate::staging::StagingArea;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A content-addressable file store rooted at a directory.
///
/// Cloning is cheap and clones share configuration. The store keeps no
/// in-process state about its contents; the directory tree is the only
/// source of truth, so several stores (or processes) may use one root.
#[derive(Clone)]
pub struct Store {
    pub(super) inner: Arc<StoreInner>,
}

pub(super) struct StoreInner {
    /// Configuration the store was built from, with paths resolved
    pub config: StoreConfig,
    /// Canonical absolute root
    pub root: PathBuf,
    pub sharder: PathSharder,
    pub engine: DigestEngine,
    pub staging: StagingArea,
    pub committer: Committer,
}

impl Store {
    /// Canonical absolute root of the sharded tree
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn staging_root(&self) -> &Path {
        self.inner.staging.root()
    }

    /// Effective configuration, with `root` and `staging_root` resolved
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.inner.engine.algorithm()
    }

    /// Length in hex characters of every digest in this store
    pub fn digest_len(&self) -> usize {
        self.inner.sharder.digest_len()
    }

    /// Digest of zero bytes under this store's algorithm
    pub fn empty_digest(&self) -> String {
        self.algorithm().empty_digest()
    }

    pub fn depth(&self) -> usize {
        self.inner.sharder.depth()
    }

    pub fn width(&self) -> usize {
        self.inner.sharder.width()
    }

    /// Directory segments followed by the digest itself
    pub fn shard<'a>(&self, digest: &'a str) -> Vec<&'a str> {
        self.inner.sharder.shard(digest)
    }

    /// Validated absolute path a digest is (or would be) stored at
    pub fn digest_path(&self, digest: &str) -> hashstore_core::Result<PathBuf> {
        self.inner.sharder.digest_path(&self.inner.root, digest)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.inner.root)
            .field("staging_root", &self.inner.staging.root())
            .field("algorithm", &self.algorithm())
            .field("depth", &self.depth())
            .field("width", &self.width())
            .finish()
    }
}
