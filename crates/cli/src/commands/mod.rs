use clap::Subcommand;
use hashstore_store::Store;
use std::io::Write;
use std::path::PathBuf;

mod content;
mod maintenance;

/// Whether a command's answer was positive; maps onto the exit code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Absent content for `exists`, corruption found by `verify`
    Failure,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Store files, or standard input when given `-`
    Put {
        /// Files to store
        #[arg(required = true, value_name = "PATH|-")]
        paths: Vec<PathBuf>,
    },

    /// Print the stored path of a digest
    Get {
        digest: String,
    },

    /// Write stored content to standard output
    Cat {
        digest: String,
    },

    /// Exit with status 1 unless the digest is stored
    Exists {
        digest: String,
    },

    /// Remove stored content
    #[command(visible_alias = "rm")]
    Delete {
        digest: String,
    },

    /// List every stored file
    Ls,

    /// Show the number and total size of stored files
    Stats,

    /// Report files whose content no longer matches their name
    Verify,

    /// Remove staged files abandoned by interrupted writes
    Sweep {
        /// Only remove staged files older than this many seconds
        #[arg(long, default_value = "86400")]
        older_than_secs: u64,
    },

    /// Print the effective store configuration as JSON
    Config,
}

impl Commands {
    /// Subcommand name used in log spans
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Put { .. } => "put",
            Commands::Get { .. } => "get",
            Commands::Cat { .. } => "cat",
            Commands::Exists { .. } => "exists",
            Commands::Delete { .. } => "delete",
            Commands::Ls => "ls",
            Commands::Stats => "stats",
            Commands::Verify => "verify",
            Commands::Sweep { .. } => "sweep",
            Commands::Config => "config",
        }
    }

    pub fn execute(self, store: &Store, json: bool, out: &mut dyn Write) -> eyre::Result<Status> {
        match self {
            Commands::Put { paths } => content::put(store, &paths, json, out),
            Commands::Get { digest } => content::get(store, &digest, json, out),
            Commands::Cat { digest } => content::cat(store, &digest, out),
            Commands::Exists { digest } => content::exists(store, &digest, json, out),
            Commands::Delete { digest } => content::delete(store, &digest, json, out),
            Commands::Ls => maintenance::ls(store, json, out),
            Commands::Stats => maintenance::stats(store, json, out),
            Commands::Verify => maintenance::verify(store, json, out),
            Commands::Sweep { older_than_secs } => {
                maintenance::sweep(store, older_than_secs, json, out)
            }
            Commands::Config => maintenance::config(store, out),
        }
    }
}

fn write_json<T: serde::Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> eyre::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
