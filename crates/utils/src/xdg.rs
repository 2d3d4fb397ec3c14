use std::env;
use std::path::PathBuf;

/// XDG Base Directory paths for hashstore
pub struct XdgPaths;

impl XdgPaths {
    /// `$XDG_DATA_HOME/hashstore`, falling back to `~/.local/share/hashstore`.
    ///
    /// This is the default store root.
    pub fn data_dir() -> PathBuf {
        env::var("XDG_DATA_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".local/share"))
                    .unwrap_or_else(|| PathBuf::from(".local/share"))
            })
            .join("hashstore")
    }
}
