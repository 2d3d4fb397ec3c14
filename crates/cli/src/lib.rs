//! Command-line front end for a hashstore
//!
//! All storage behaviour lives in `hashstore-store`; this crate only maps
//! arguments onto store operations and renders their results as text or
//! JSON.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{Commands, Status};

use eyre::WrapErr;
use hashstore_store::Store;
use std::io::Write;

/// Open the store described by `cli` and run its subcommand, writing
/// results to `out`
pub fn run(cli: Cli, out: &mut dyn Write) -> eyre::Result<Status> {
    let config = cli.store_config()?;
    let store = Store::new(config.clone())
        .wrap_err_with(|| format!("failed to open store at {}", config.root.display()))?;

    let _span = hashstore_utils::tracing::store_span(cli.command.name(), store.root()).entered();
    cli.command.execute(&store, cli.json, out)
}
