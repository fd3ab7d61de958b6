//! Implementation of `reportfill run`.
//!
//! Loads the configuration, then writes one day of figures from the sales
//! export into the report workbook.
//!
//! Flags:
//! - `--day <1-31>`: day of month selecting the target column (required).
//! - `--sheet <NAME>`: report sheet to update (default `Sheet1`).
//! - `--dry-run`: log each cell that would be written, save nothing.
//!
//! Unresolved names, unknown sector labels and tables that could not be
//! located are logged as warnings; they do not fail the run.
//!
//! Exit codes: 0 = report updated, 1 = invalid configuration or failed
//! update, 2 = configuration unreadable.
use std::path::{Path, PathBuf};

use reportfill_core::Day;
use reportfill_excel::UpdateRequest;

use crate::error::CliError;
use crate::io::ConfigSession;

/// Runs the `run` command.
///
/// # Errors
///
/// Returns the configuration errors of [`ConfigSession::load`], and
/// [`CliError::UpdateFailed`] if the update did not complete.
pub fn run(
    config_path: Option<&Path>,
    source: PathBuf,
    report: PathBuf,
    day: Day,
    sheet: String,
    dry_run: bool,
) -> Result<(), CliError> {
    let session = ConfigSession::load(config_path)?;
    let request = UpdateRequest {
        source,
        report,
        sheet,
        day,
        dry_run,
    };
    if reportfill_excel::run(&session.config, &request) {
        Ok(())
    } else {
        Err(CliError::UpdateFailed)
    }
}
