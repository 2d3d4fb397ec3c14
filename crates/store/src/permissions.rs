//! Permission bits on created files and directories

use std::fs;
use std::io;
use std::path::Path;

/// Create `dir` and any missing parents with exactly `mode`.
///
/// The umask is cleared for the duration of the call so the requested bits
/// are applied verbatim.
#[cfg(unix)]
pub(crate) fn create_dir_all_with_mode(dir: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    hashstore_utils::with_umask(0, || {
        fs::DirBuilder::new().recursive(true).mode(mode).create(dir)
    })
}

#[cfg(not(unix))]
pub(crate) fn create_dir_all_with_mode(dir: &Path, _mode: u32) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Apply `mode` to an existing file
#[cfg(unix)]
pub(crate) fn set_file_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
pub(crate) fn set_file_mode(_path: &Path, _mode: u32) -> io::Result<()> {
    Ok(())
}
