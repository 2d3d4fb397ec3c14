/// Constants used throughout the hashstore codebase
// Shard shape
pub const DEFAULT_DEPTH: usize = 3;
pub const DEFAULT_WIDTH: usize = 1;

// Permission bits for created files and directories
pub const DEFAULT_FILE_MODE: u32 = 0o664;
pub const DEFAULT_DIR_MODE: u32 = 0o755;

// Read block size used while hashing
pub const DEFAULT_BLOCK_SIZE: usize = 256 * 128 * 2;

// Staging
pub const STAGING_DIR_NAME: &str = ".staging";
pub const STAGING_PREFIX: &str = "_tmp";

// Environment variable names
pub const HASHSTORE_ROOT_VAR: &str = "HASHSTORE_ROOT";
pub const HASHSTORE_STAGING_ROOT_VAR: &str = "HASHSTORE_STAGING_ROOT";
pub const HASHSTORE_DEPTH_VAR: &str = "HASHSTORE_DEPTH";
pub const HASHSTORE_WIDTH_VAR: &str = "HASHSTORE_WIDTH";
pub const HASHSTORE_ALGORITHM_VAR: &str = "HASHSTORE_ALGORITHM";
pub const HASHSTORE_FILE_MODE_VAR: &str = "HASHSTORE_FILE_MODE";
pub const HASHSTORE_DIR_MODE_VAR: &str = "HASHSTORE_DIR_MODE";
