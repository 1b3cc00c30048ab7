use anyhow::Result;
use clap::Parser;
use tracing::debug;

use skatt_cli::app;
use skatt_cli::cli::Cli;
use skatt_cli::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;
    debug!(?cli, "parsed command line");

    let report = app::run(&cli)?;
    print!("{report}");

    Ok(())
}
