//! Store configuration with environment overrides

use crate::algorithm::HashAlgorithm;
use hashstore_core::{
    Error, Result, DEFAULT_BLOCK_SIZE, DEFAULT_DEPTH, DEFAULT_DIR_MODE, DEFAULT_FILE_MODE,
    DEFAULT_WIDTH, HASHSTORE_ALGORITHM_VAR, HASHSTORE_DEPTH_VAR, HASHSTORE_DIR_MODE_VAR,
    HASHSTORE_FILE_MODE_VAR, HASHSTORE_ROOT_VAR, HASHSTORE_STAGING_ROOT_VAR, HASHSTORE_WIDTH_VAR,
    STAGING_DIR_NAME,
};
use hashstore_utils::xdg::XdgPaths;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Construction-time settings of a store. There is no reconfiguration
/// after the store is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base directory of the sharded tree
    pub root: PathBuf,
    /// Directory for staged files; `<root>/.staging` when unset. Must be
    /// on the same filesystem as `root`.
    pub staging_root: Option<PathBuf>,
    /// Number of shard directory levels
    pub depth: usize,
    /// Hex characters per shard directory name
    pub width: usize,
    pub algorithm: HashAlgorithm,
    /// Permission bits for stored and staged files
    pub file_mode: u32,
    /// Permission bits for created directories
    pub dir_mode: u32,
    /// Read size used while hashing
    pub block_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: XdgPaths::data_dir(),
            staging_root: None,
            depth: DEFAULT_DEPTH,
            width: DEFAULT_WIDTH,
            algorithm: HashAlgorithm::default(),
            file_mode: DEFAULT_FILE_MODE,
            dir_mode: DEFAULT_DIR_MODE,
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn builder(root: impl Into<PathBuf>) -> StoreConfigBuilder {
        StoreConfigBuilder::new(root)
    }

    /// The staging directory this configuration resolves to
    pub fn resolved_staging_root(&self) -> PathBuf {
        match &self.staging_root {
            Some(staging_root) => staging_root.clone(),
            None => self.root.join(STAGING_DIR_NAME),
        }
    }

    /// Check the values that cannot be corrected later
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::configuration("store root must not be empty"));
        }
        if self.depth == 0 {
            return Err(Error::configuration("shard depth must be greater than 0"));
        }
        if self.width == 0 {
            return Err(Error::configuration("shard width must be greater than 0"));
        }
        if self.block_size == 0 {
            return Err(Error::configuration("block size must be greater than 0"));
        }
        if self.file_mode > 0o7777 || self.dir_mode > 0o7777 {
            return Err(Error::configuration(format!(
                "permission bits out of range: file {:o}, directory {:o}",
                self.file_mode, self.dir_mode
            )));
        }
        Ok(())
    }

    /// Overlay `HASHSTORE_*` environment variables onto `base`.
    ///
    /// Modes are read as octal. A variable that is set but cannot be parsed
    /// is an error rather than being ignored.
    pub fn from_env(base: StoreConfig) -> Result<StoreConfig> {
        let mut config = base;

        if let Some(root) = env_var(HASHSTORE_ROOT_VAR) {
            config.root = PathBuf::from(root);
        }
        if let Some(staging_root) = env_var(HASHSTORE_STAGING_ROOT_VAR) {
            config.staging_root = Some(PathBuf::from(staging_root));
        }
        if let Some(depth) = env_var(HASHSTORE_DEPTH_VAR) {
            config.depth = parse_usize(HASHSTORE_DEPTH_VAR, &depth)?;
        }
        if let Some(width) = env_var(HASHSTORE_WIDTH_VAR) {
            config.width = parse_usize(HASHSTORE_WIDTH_VAR, &width)?;
        }
        if let Some(algorithm) = env_var(HASHSTORE_ALGORITHM_VAR) {
            config.algorithm = algorithm.parse()?;
        }
        if let Some(mode) = env_var(HASHSTORE_FILE_MODE_VAR) {
            config.file_mode = parse_mode(HASHSTORE_FILE_MODE_VAR, &mode)?;
        }
        if let Some(mode) = env_var(HASHSTORE_DIR_MODE_VAR) {
            config.dir_mode = parse_mode(HASHSTORE_DIR_MODE_VAR, &mode)?;
        }

        Ok(config)
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn parse_usize(name: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::configuration(format!("{name} must be a positive integer, got '{value}'")))
}

/// Parse an octal mode such as `664`, `0664` or `0o664`
pub(crate) fn parse_mode(name: &str, value: &str) -> Result<u32> {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix("0o").unwrap_or(trimmed);
    u32::from_str_radix(digits, 8)
        .map_err(|_| Error::configuration(format!("{name} must be an octal mode, got '{value}'")))
}

/// Fluent construction of a [`StoreConfig`]
#[derive(Debug, Clone)]
pub struct StoreConfigBuilder {
    config: StoreConfig,
    algorithm_name: Option<String>,
}

impl StoreConfigBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            config: StoreConfig::new(root),
            algorithm_name: None,
        }
    }

    pub fn staging_root(mut self, staging_root: impl AsRef<Path>) -> Self {
        self.config.staging_root = Some(staging_root.as_ref().to_path_buf());
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.config.depth = depth;
        self
    }

    pub fn width(mut self, width: usize) -> Self {
        self.config.width = width;
        self
    }

    pub fn algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.config.algorithm = algorithm;
        self.algorithm_name = None;
        self
    }

    /// Select the algorithm by name; unknown names fail in [`build`](Self::build)
    pub fn algorithm_name(mut self, name: impl Into<String>) -> Self {
        self.algorithm_name = Some(name.into());
        self
    }

    pub fn file_mode(mut self, mode: u32) -> Self {
        self.config.file_mode = mode;
        self
    }

    pub fn dir_mode(mut self, mode: u32) -> Self {
        self.config.dir_mode = mode;
        self
    }

    pub fn block_size(mut self, block_size: usize) -> Self {
        self.config.block_size = block_size;
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<StoreConfig> {
        let mut config = self.config;
        if let Some(name) = self.algorithm_name {
            config.algorithm = name.parse()?;
        }
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashstore_core::ErrorKind;
    use serial_test::serial;

    const ALL_VARS: [&str; 7] = [
        HASHSTORE_ROOT_VAR,
        HASHSTORE_STAGING_ROOT_VAR,
        HASHSTORE_DEPTH_VAR,
        HASHSTORE_WIDTH_VAR,
        HASHSTORE_ALGORITHM_VAR,
        HASHSTORE_FILE_MODE_VAR,
        HASHSTORE_DIR_MODE_VAR,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_defaults() {
        let config = StoreConfig::new("/store");
        assert_eq!(config.depth, 3);
        assert_eq!(config.width, 1);
        assert_eq!(config.algorithm, HashAlgorithm::Sha256);
        assert_eq!(config.file_mode, 0o664);
        assert_eq!(config.dir_mode, 0o755);
        assert_eq!(config.block_size, 65536);
        assert_eq!(
            config.resolved_staging_root(),
            PathBuf::from("/store/.staging")
        );
    }

    #[test]
    fn test_builder() {
        let config = StoreConfig::builder("/store")
            .staging_root("/scratch")
            .depth(2)
            .width(2)
            .algorithm_name("SHA-512")
            .dir_mode(0o700)
            .build()
            .unwrap();

        assert_eq!(config.algorithm, HashAlgorithm::Sha512);
        assert_eq!(config.depth, 2);
        assert_eq!(config.width, 2);
        assert_eq!(config.dir_mode, 0o700);
        assert_eq!(config.resolved_staging_root(), PathBuf::from("/scratch"));
    }

    #[test]
    fn test_builder_rejects_unknown_algorithm() {
        let err = StoreConfig::builder("/store")
            .algorithm_name("md5")
            .build()
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_validate_rejects_zero_shape() {
        let mut config = StoreConfig::new("/store");
        config.depth = 0;
        assert!(config.validate().is_err());

        let mut config = StoreConfig::new("/store");
        config.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_mode_forms() {
        assert_eq!(parse_mode("X", "664").unwrap(), 0o664);
        assert_eq!(parse_mode("X", "0755").unwrap(), 0o755);
        assert_eq!(parse_mode("X", "0o700").unwrap(), 0o700);
        assert!(parse_mode("X", "999").is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_overlays_values() {
        clear_env();
        env::set_var(HASHSTORE_ROOT_VAR, "/env/store");
        env::set_var(HASHSTORE_DEPTH_VAR, "2");
        env::set_var(HASHSTORE_ALGORITHM_VAR, "sha3_256");
        env::set_var(HASHSTORE_FILE_MODE_VAR, "0640");

        let config = StoreConfig::from_env(StoreConfig::new("/base")).unwrap();
        clear_env();

        assert_eq!(config.root, PathBuf::from("/env/store"));
        assert_eq!(config.depth, 2);
        assert_eq!(config.width, 1);
        assert_eq!(config.algorithm, HashAlgorithm::Sha3_256);
        assert_eq!(config.file_mode, 0o640);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_garbage() {
        clear_env();
        env::set_var(HASHSTORE_WIDTH_VAR, "wide");

        let result = StoreConfig::from_env(StoreConfig::new("/base"));
        clear_env();

        assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: StoreConfig =
            serde_json::from_str(r#"{"root": "/data", "algorithm": "sha512"}"#).unwrap();
        assert_eq!(config.root, PathBuf::from("/data"));
        assert_eq!(config.algorithm, HashAlgorithm::Sha512);
        assert_eq!(config.depth, 3);
    }
}
