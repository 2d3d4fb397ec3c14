//! Store facade tests


use crate::store::Store;
use tempfile::TempDir;

pub(super) const FOO_SHA256: &str =
    "2c26b46b68ffc68ff99b453c1d30413413422d706483bfa0f98a5e886266e7ae";

/// A default-configured store in a fresh temporary directory
pub(super) fn temp_store() -> (TempDir, Store) {
    let temp_dir = TempDir::new().unwrap();
    let store = Store::at(temp_dir.path().join("store")).unwrap();
    (temp_dir, store)
}
