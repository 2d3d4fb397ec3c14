//! The result of storing or looking up content

use hashstore_core::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Where a piece of content lives.
///
/// An address records the root of the store it came from as a plain path.
/// It holds no handle to the store and stays valid after the store value
/// is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Address {
    pub digest: String,
    pub abspath: PathBuf,
    pub is_duplicate: bool,
    pub root: PathBuf,
}

impl Address {
    pub fn new(
        digest: impl Into<String>,
        abspath: impl Into<PathBuf>,
        is_duplicate: bool,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            digest: digest.into(),
            abspath: abspath.into(),
            is_duplicate,
            root: root.into(),
        }
    }

    /// Path of the stored file relative to the store root
    pub fn relative_path(&self) -> &Path {
        self.abspath
            .strip_prefix(&self.root)
            .unwrap_or(&self.abspath)
    }

    /// Open the stored file for reading from offset 0
    pub fn open(&self) -> Result<File> {
        File::open(&self.abspath).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::not_found(&self.digest, &self.abspath)
            } else {
                Error::file_system(&self.abspath, "open stored file", e)
            }
        })
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        let address = Address::new("abc", "/store/a/b/c/abc", false, "/store");
        assert_eq!(address.relative_path(), Path::new("a/b/c/abc"));
    }

    #[test]
    fn test_open_missing_is_not_found() {
        let address = Address::new("abc", "/nonexistent/hashstore/abc", false, "/nonexistent");
        assert!(address.open().unwrap_err().is_not_found());
    }

    #[test]
    fn test_serializes_fields() {
        let address = Address::new("abc", "/store/a/abc", true, "/store");
        let json = serde_json::to_value(&address).unwrap();
        assert_eq!(json["digest"], "abc");
        assert_eq!(json["abspath"], "/store/a/abc");
        assert_eq!(json["is_duplicate"], true);
    }
}
