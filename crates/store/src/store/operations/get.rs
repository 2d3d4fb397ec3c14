//! Looking up stored content

use crate::address::Address;
use hashstore_core::{Error, Result};
use std::fs::{self, File};
use std::io;

use crate::store::types::Store;

impl Store {
    /// Address of the stored file for `digest`.
    ///
    /// Lookups never report a duplicate.
    pub fn get(&self, digest: &str) -> Result<Address> {
        let digest = self.inner.sharder.validate(digest)?;
        let path = self.inner.sharder.join(&self.inner.root, &digest);

        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => {
                Ok(Address::new(digest, path, false, &self.inner.root))
            }
            Ok(_) => Err(Error::not_found(digest, path)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::not_found(digest, path)),
            Err(e) => Err(Error::file_system(path, "inspect stored file", e)),
        }
    }

    /// Open the stored file for `digest`, positioned at offset 0
    pub fn open(&self, digest: &str) -> Result<File> {
        self.get(digest)?.open()
    }

    /// Whether content with `digest` is stored. A malformed digest is an
    /// error, not `false`.
    pub fn exists(&self, digest: &str) -> Result<bool> {
        match self.get(digest) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Alias of [`exists`](Self::exists)
    pub fn contains(&self, digest: &str) -> Result<bool> {
        self.exists(digest)
    }
}
