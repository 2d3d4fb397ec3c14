//! Mapping between digests and their sharded on-disk location
//!
//! A digest `2c26b4...` with depth 3 and width 1 lives at
//! `root/2/c/2/2c26b4...`: the first `depth * width` hex characters are
//! split into `depth` directory names and the full digest is the file name.

use hashstore_core::{Error, Result};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};
use tracing::warn;

/// Pure digest <-> path mapping for a fixed shard shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSharder {
    depth: usize,
    width: usize,
    digest_len: usize,
}

impl PathSharder {
    /// Create a sharder for digests of `digest_len` hex characters
    pub fn new(depth: usize, width: usize, digest_len: usize) -> Result<Self> {
        if depth == 0 {
            return Err(Error::configuration("shard depth must be greater than 0"));
        }
        if width == 0 {
            return Err(Error::configuration("shard width must be greater than 0"));
        }
        if depth.saturating_mul(width) > digest_len {
            warn!(
                depth,
                width,
                digest_len,
                "shard prefix is longer than the digest; trailing levels collapse"
            );
        }

        Ok(Self {
            depth,
            width,
            digest_len,
        })
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn digest_len(&self) -> usize {
        self.digest_len
    }

    /// Check that `digest` is a hex string of the configured length and
    /// return it in lowercase.
    pub fn validate(&self, digest: &str) -> Result<String> {
        if digest.len() != self.digest_len {
            return Err(Error::malformed_digest(
                digest,
                format!("expected {} hex digits, got {}", self.digest_len, digest.len()),
            ));
        }
        if let Err(e) = hex::decode(digest) {
            return Err(Error::malformed_digest(digest, format!("not hex: {e}")));
        }

        Ok(digest.to_ascii_lowercase())
    }

    /// Split a digest into its directory segments followed by the digest
    /// itself. Empty segments, which only occur when the shard prefix is
    /// longer than the digest, are dropped.
    pub fn shard<'a>(&self, digest: &'a str) -> Vec<&'a str> {
        let len = digest.len();
        let mut segments: Vec<&'a str> = (0..self.depth)
            .filter_map(|level| {
                let start = (level * self.width).min(len);
                let end = ((level + 1) * self.width).min(len);
                digest.get(start..end)
            })
            .filter(|segment| !segment.is_empty())
            .collect();
        segments.push(digest);
        segments
    }

    /// Join the shard segments of an already validated digest onto `root`
    pub(crate) fn join(&self, root: &Path, digest: &str) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.shard(digest));
        path
    }

    /// Validate `digest` and return its absolute location under `root`
    pub fn digest_path(&self, root: &Path, digest: &str) -> Result<PathBuf> {
        let digest = self.validate(digest)?;
        Ok(self.join(root, &digest))
    }
}

/// Recover the digest from a sharded path: the text after its last
/// separator.
///
/// This is a structural inverse only; the returned string is not checked
/// to be a well-formed digest, and is empty for a trailing separator.
pub fn unshard(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = path.to_string_lossy();
    let is_separator = |c: char| c == '/' || c == MAIN_SEPARATOR;
    if !text.contains(is_separator) {
        return Err(Error::malformed_path(path, "path must be absolute"));
    }

    Ok(text.rsplit(is_separator).next().unwrap_or_default().to_string())
}
