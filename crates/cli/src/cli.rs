use crate::commands::Commands;
use clap::Parser;
use hashstore_store::{Result, StoreConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hashstore")]
#[command(about = "Content-addressable file storage", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Store root directory [env: HASHSTORE_ROOT]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Directory for staged files; must share a filesystem with the root
    #[arg(long, global = true, value_name = "DIR")]
    pub staging_root: Option<PathBuf>,

    /// Number of shard directory levels
    #[arg(long, global = true)]
    pub depth: Option<usize>,

    /// Hex characters per shard directory name
    #[arg(long, global = true)]
    pub width: Option<usize>,

    /// Hash algorithm (sha256, sha512, sha3_256, ...)
    #[arg(long, global = true)]
    pub algorithm: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Defaults, then `HASHSTORE_*` variables, then flags
    pub fn store_config(&self) -> Result<StoreConfig> {
        let mut config = StoreConfig::from_env(StoreConfig::default())?;

        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(staging_root) = &self.staging_root {
            config.staging_root = Some(staging_root.clone());
        }
        if let Some(depth) = self.depth {
            config.depth = depth;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(algorithm) = &self.algorithm {
            config.algorithm = algorithm.parse()?;
        }

        config.validate()?;
        Ok(config)
    }
}
