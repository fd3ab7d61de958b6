/// Tracing subscriber setup for the `reportfill` binary.
///
/// Log lines go to stderr so stdout stays clean for `config show` and
/// `mapping list`. `--log-file` adds a second, ANSI-free layer appending to a
/// file. `RUST_LOG` overrides the default level unless `-q` or `-v` is given.
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::CliError;
use crate::io::io_error_to_cli;

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// `-q`: warnings and errors only.
    Quiet,
    /// Neither flag: `RUST_LOG`, or `info`.
    Normal,
    /// `-v`: debug detail.
    Verbose,
}

impl Verbosity {
    /// Picks the level from the two mutually exclusive flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    fn filter(self) -> EnvFilter {
        match self {
            Self::Quiet => EnvFilter::new("warn"),
            Self::Verbose => EnvFilter::new("debug"),
            Self::Normal => {
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
            }
        }
    }
}

/// Installs the global subscriber.
///
/// # Errors
///
/// Returns an I/O variant of [`CliError`] if the log file cannot be opened.
/// A subscriber that is already installed is left in place.
pub fn init(verbosity: Verbosity, log_file: Option<&Path>) -> Result<(), CliError> {
    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| io_error_to_cli(&e, path))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(verbosity.filter()),
            )
        }
        None => None,
    };

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(verbosity.filter());

    if tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
    Ok(())
}
