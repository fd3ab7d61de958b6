//! Implementation of `reportfill mapping`.
//!
//! - `list <manager|region>`: print `key;sector` lines to stdout.
//! - `set <kind> <KEY> <SECTOR>`: add or replace one entry and save.
//! - `remove <kind> <KEY>`: remove one entry and save. The key matches
//!   exactly or by normalized form.
//! - `import <FILE>`: replace the mappings found in a CSV or workbook.
//! - `export <FILE>`: write `<stem>_managers.csv` and `<stem>_regions.csv`.
//!
//! Edits are saved to the configuration path. When no file exists yet, the
//! built-in default is edited and saved to `./config.json`.
//!
//! Exit codes: 0 = success, 1 = key not found or invalid configuration,
//! 2 = unreadable file or blank argument.
use std::path::Path;

use reportfill_core::GroupingMethod;
use reportfill_excel::{CSV_DELIMITER, export_mappings, import_mappings};

use crate::cli::{MappingAction, MappingKind};
use crate::error::CliError;
use crate::io::ConfigSession;

/// Runs the `mapping` command.
///
/// # Errors
///
/// See the module documentation for the failure cases of each action.
pub fn run(config_path: Option<&Path>, action: MappingAction) -> Result<(), CliError> {
    let mut session = ConfigSession::load(config_path)?;
    match action {
        MappingAction::List { kind } => {
            list(&session, kind);
            Ok(())
        }
        MappingAction::Set { kind, key, sector } => set(&mut session, kind, &key, &sector),
        MappingAction::Remove { kind, key } => remove(&mut session, kind, &key),
        MappingAction::Import { file } => {
            let replaced = import_mappings(&file)?.apply(&mut session.config);
            session.save()?;
            for method in replaced {
                println!(
                    "{method}: {} entries",
                    session.config.mapping(method).len()
                );
            }
            Ok(())
        }
        MappingAction::Export { file } => {
            let written = export_mappings(&session.config, &file)?;
            if written.is_empty() {
                tracing::warn!("both mappings are empty, nothing exported");
            }
            for path in written {
                println!("{}", path.display());
            }
            Ok(())
        }
    }
}

fn list(session: &ConfigSession, kind: MappingKind) {
    let delimiter = char::from(CSV_DELIMITER);
    for (key, sector) in session.config.mapping(kind.into()) {
        println!("{key}{delimiter}{sector}");
    }
}

fn set(
    session: &mut ConfigSession,
    kind: MappingKind,
    key: &str,
    sector: &str,
) -> Result<(), CliError> {
    if key.trim().is_empty() || sector.trim().is_empty() {
        return Err(CliError::InvalidArgument {
            detail: "mapping key and sector must not be blank".to_owned(),
        });
    }
    let method = GroupingMethod::from(kind);
    let previous = session.config.set_mapping(method, key, sector);
    session.save()?;
    match previous {
        Some(old) => tracing::info!(%method, key, %old, new = sector.trim(), "mapping entry replaced"),
        None => tracing::info!(%method, key, sector = sector.trim(), "mapping entry added"),
    }
    Ok(())
}

fn remove(session: &mut ConfigSession, kind: MappingKind, key: &str) -> Result<(), CliError> {
    let method = GroupingMethod::from(kind);
    let Some(sector) = session.config.remove_mapping(method, key) else {
        return Err(CliError::MappingKeyNotFound {
            kind: method.to_string(),
            key: key.to_owned(),
        });
    };
    session.save()?;
    tracing::info!(%method, key, %sector, "mapping entry removed");
    Ok(())
}
