//! Implementation of `reportfill config`.
//!
//! - `init [--force]`: write the built-in default to the configuration path.
//! - `validate`: report every missing section or field at once.
//! - `show`: print the effective configuration as JSON to stdout. Without a
//!   configuration file this is the built-in default.
//! - `set grouping-method <manager|region>` and `set column <FIELD> <HEADER>`:
//!   change one setting and save.
//! - `table list|add-region|add-points|remove`: edit the table list. Adding a
//!   table whose name exists replaces it in place.
//! - `points list|add|remove|rename <TABLE> ...`: edit a point table's
//!   accepted names.
//!
//! Edits are saved to the configuration path. When no file exists yet, the
//! built-in default is edited and saved to `./config.json`.
//!
//! Exit codes: 0 = success, 1 = invalid configuration, existing file on
//! `init`, unknown table or point, or duplicate point, 2 = configuration
//! unreadable or unusable argument.
use std::path::Path;

use reportfill_core::{
    Config, LayoutError, PointTable, RegionTable, checked_range, column_index, validate_config,
};

use crate::cli::{
    ColumnField, ConfigAction, PointTableArgs, PointsAction, RegionTableArgs, SetTarget,
    TableAction,
};
use crate::error::CliError;
use crate::io::{ConfigSession, locate_config, read_config_value, write_config};

/// Runs the `config` command.
///
/// # Errors
///
/// See the module documentation for the failure cases of each action.
pub fn run(config_path: Option<&Path>, action: ConfigAction) -> Result<(), CliError> {
    match action {
        ConfigAction::Init { force } => init(config_path, force),
        ConfigAction::Validate => validate(config_path),
        ConfigAction::Show => show(config_path),
        ConfigAction::Set { target } => {
            let mut session = ConfigSession::load(config_path)?;
            set(&mut session, target)
        }
        ConfigAction::Table { action } => {
            let mut session = ConfigSession::load(config_path)?;
            table(&mut session, action)
        }
        ConfigAction::Points { action } => {
            let mut session = ConfigSession::load(config_path)?;
            points(&mut session, action)
        }
    }
}

fn init(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let location = locate_config(config_path);
    if location.exists && !force {
        return Err(CliError::ConfigExists {
            path: location.path,
        });
    }
    let config = Config::default_template().map_err(|e| CliError::ConfigParse {
        path: location.path.clone(),
        detail: e.to_string(),
    })?;
    write_config(&location.path, &config)?;
    tracing::info!(path = %location.path.display(), "default configuration written");
    println!("{}", location.path.display());
    Ok(())
}

fn validate(config_path: Option<&Path>) -> Result<(), CliError> {
    let location = locate_config(config_path);
    if !location.exists {
        return Err(CliError::FileNotFound {
            path: location.path,
        });
    }
    let value = read_config_value(&location.path)?;
    let diagnostics = validate_config(&value);
    if !diagnostics.is_empty() {
        return Err(CliError::InvalidConfig {
            path: location.path,
            diagnostics,
        });
    }
    // Shape is complete; this still catches wrong value types.
    Config::from_value(value).map_err(|e| CliError::ConfigParse {
        path: location.path.clone(),
        detail: e.to_string(),
    })?;
    println!("{}: ok", location.path.display());
    Ok(())
}

fn show(config_path: Option<&Path>) -> Result<(), CliError> {
    let session = ConfigSession::load(config_path)?;
    let text = session
        .config
        .to_json_pretty()
        .map_err(|e| CliError::ConfigParse {
            path: session.path.clone(),
            detail: e.to_string(),
        })?;
    println!("{text}");
    Ok(())
}

// ---------------------------------------------------------------------------
// Editing
// ---------------------------------------------------------------------------

fn set(session: &mut ConfigSession, target: SetTarget) -> Result<(), CliError> {
    match target {
        SetTarget::GroupingMethod { method } => {
            let method = method.into();
            session.config.grouping_method = method;
            session.save()?;
            tracing::info!(%method, "grouping method set");
        }
        SetTarget::Column { field, header } => {
            let header = non_blank("column header", &header)?;
            let columns = &mut session.config.source_columns;
            let slot = match field {
                ColumnField::Region => &mut columns.region,
                ColumnField::Manager => &mut columns.manager,
                ColumnField::Point => &mut columns.point,
                ColumnField::BmsSales => &mut columns.bms_sales,
                ColumnField::FmsSales => &mut columns.fms_sales,
            };
            let old = std::mem::replace(slot, header.to_owned());
            session.save()?;
            tracing::info!(field = ?field, %old, new = header, "source column set");
        }
    }
    Ok(())
}

fn table(session: &mut ConfigSession, action: TableAction) -> Result<(), CliError> {
    match action {
        TableAction::List => {
            for t in &session.config.region_tables {
                println!("region\t{}\t{}", t.measure, t.name);
            }
            for t in &session.config.new_points_tables {
                println!("points\t{}\t{}", t.measure, t.name);
            }
            Ok(())
        }
        TableAction::AddRegion(args) => {
            let table = region_table(args)?;
            let name = table.name.clone();
            let replaced = session.config.upsert_region_table(table);
            session.save()?;
            log_upsert("region", &name, replaced);
            Ok(())
        }
        TableAction::AddPoints(args) => {
            let table = point_table(args)?;
            let name = table.name.clone();
            let replaced = session.config.upsert_point_table(table);
            session.save()?;
            log_upsert("points", &name, replaced);
            Ok(())
        }
        TableAction::Remove { name } => {
            let removed = session.config.remove_table(&name);
            if removed == 0 {
                return Err(CliError::TableNotFound { name });
            }
            session.save()?;
            tracing::info!(table = %name, removed, "table removed");
            Ok(())
        }
    }
}

fn points(session: &mut ConfigSession, action: PointsAction) -> Result<(), CliError> {
    match action {
        PointsAction::List { table } => {
            for name in &point_table_mut(&mut session.config, &table)?.point_names {
                println!("{name}");
            }
            Ok(())
        }
        PointsAction::Add { table, name } => {
            let name = non_blank("point name", &name)?;
            if !point_table_mut(&mut session.config, &table)?.add_point(name) {
                return Err(CliError::PointExists {
                    table,
                    name: name.to_owned(),
                });
            }
            session.save()?;
            tracing::info!(%table, point = name, "point added");
            Ok(())
        }
        PointsAction::Remove { table, name } => {
            let target = point_table_mut(&mut session.config, &table)?;
            let Some(removed) = target.remove_point(&name) else {
                return Err(CliError::PointNotFound { table, name });
            };
            session.save()?;
            tracing::info!(%table, point = %removed, "point removed");
            Ok(())
        }
        PointsAction::Rename { table, old, new } => {
            let new = non_blank("point name", &new)?;
            let target = point_table_mut(&mut session.config, &table)?;
            let Some(previous) = target.rename_point(&old, new) else {
                return Err(CliError::PointNotFound { table, name: old });
            };
            session.save()?;
            tracing::info!(%table, old = %previous, new, "point renamed");
            Ok(())
        }
    }
}

fn point_table_mut<'a>(
    config: &'a mut Config,
    name: &str,
) -> Result<&'a mut PointTable, CliError> {
    config
        .point_table_mut(name)
        .ok_or_else(|| CliError::TableNotFound {
            name: name.to_owned(),
        })
}

/// Builds a sector table after checking its rows and column letters.
fn region_table(args: RegionTableArgs) -> Result<RegionTable, CliError> {
    let name = non_blank("table name", &args.name)?;
    let checks = || -> Result<(), LayoutError> {
        checked_range(name, "day_row", args.day_row, args.day_row)?;
        checked_range(name, "rows", args.data_start_row, args.data_end_row)?;
        for letters in [&args.region_col, &args.day_start_col, &args.day_end_col] {
            column_index(letters.trim())?;
        }
        Ok(())
    };
    checks().map_err(layout_to_cli)?;
    Ok(RegionTable {
        name: name.to_owned(),
        measure: args.measure.into(),
        day_row: args.day_row,
        data_start_row: args.data_start_row,
        data_end_row: args.data_end_row,
        region_col: args.region_col.trim().to_owned(),
        day_start_col: args.day_start_col.trim().to_owned(),
        day_end_col: args.day_end_col.trim().to_owned(),
    })
}

/// Builds a point table after checking its rows, column letters and names.
fn point_table(args: PointTableArgs) -> Result<PointTable, CliError> {
    let name = non_blank("table name", &args.name)?;
    let checks = || -> Result<(), LayoutError> {
        checked_range(name, "rows", args.start_row, args.end_row)?;
        column_index(args.point_col.trim())?;
        column_index(args.data_col.trim())?;
        Ok(())
    };
    checks().map_err(layout_to_cli)?;
    let mut table = PointTable {
        name: name.to_owned(),
        measure: args.measure.into(),
        point_names: Vec::new(),
        start_row: args.start_row,
        end_row: args.end_row,
        point_col: args.point_col.trim().to_owned(),
        data_col: args.data_col.trim().to_owned(),
    };
    for point in &args.points {
        if !table.add_point(point) {
            tracing::warn!(table = name, %point, "blank or duplicate point name skipped");
        }
    }
    Ok(table)
}

fn log_upsert(kind: &str, name: &str, replaced: bool) {
    if replaced {
        tracing::info!(kind, table = name, "table replaced");
    } else {
        tracing::info!(kind, table = name, "table added");
    }
}

fn non_blank<'a>(what: &str, value: &'a str) -> Result<&'a str, CliError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::InvalidArgument {
            detail: format!("{what} must not be blank"),
        });
    }
    Ok(trimmed)
}

fn layout_to_cli(e: LayoutError) -> CliError {
    CliError::InvalidArgument {
        detail: e.to_string(),
    }
}
