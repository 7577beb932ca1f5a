pub mod args;
pub mod commands;

pub use args::Cli;

use crate::error::Result;
use crate::logging;

/// Parses the command line, sets up logging and runs the chosen command.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);
    commands::execute(cli)
}
