use clap::Parser;

mod cli;
mod cmd;
mod error;
mod io;
mod logging;

use cli::{Cli, Command};
use error::CliError;
use logging::Verbosity;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        eprintln!("{}", e.message());
        std::process::exit(e.exit_code());
    }
}

fn dispatch(cli: Cli) -> Result<(), CliError> {
    logging::init(
        Verbosity::from_flags(cli.quiet, cli.verbose),
        cli.log_file.as_deref(),
    )?;
    let config = cli.config.as_deref();

    match cli.command {
        Command::Run {
            source,
            report,
            day,
            sheet,
            dry_run,
        } => cmd::run::run(config, source, report, day, sheet, dry_run),
        Command::Config { action } => cmd::config::run(config, action),
        Command::Mapping { action } => cmd::mapping::run(config, action),
    }
}
