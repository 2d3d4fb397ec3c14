use clap::Parser;
use hashstore::{run, Cli, Status};
use std::io::Write;

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    hashstore_utils::tracing::init().map_err(|e| eyre::eyre!(e))?;

    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let status = run(cli, &mut out)?;
    out.flush()?;

    if status == Status::Failure {
        std::process::exit(1);
    }
    Ok(())
}
