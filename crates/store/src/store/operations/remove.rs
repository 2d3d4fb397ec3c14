//! Deleting stored content

use hashstore_core::{Error, Result};
use std::fs;
use std::io;
use std::path::Component;
use tracing::debug;

use crate::store::types::Store;

impl Store {
    /// Remove the stored file for `digest`.
    ///
    /// Shard directories left empty are kept. Not coordinated with
    /// concurrent `put` or `get` of the same digest.
    pub fn delete(&self, digest: &str) -> Result<()> {
        let digest = self.inner.sharder.validate(digest)?;
        let path = self.inner.sharder.join(&self.inner.root, &digest);

        let escapes = path
            .strip_prefix(&self.inner.root)
            .map(|relative| {
                relative
                    .components()
                    .any(|component| !matches!(component, Component::Normal(_)))
            })
            .unwrap_or(true);
        if escapes || path == self.inner.root {
            return Err(Error::path_containment(path, &self.inner.root));
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(%digest, "deleted stored file");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::not_found(digest, path)),
            Err(e) => Err(Error::file_system(path, "remove stored file", e)),
        }
    }
}
