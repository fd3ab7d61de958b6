/// One end-to-end update of a report sheet.
///
/// ```text
/// SourceTable ─records─▶ SourceRow[] ─Resolver─▶ Aggregate ─▶ sector tables
///                              └──────PointIndex──────────────▶ point tables
/// ```
///
/// Only a missing source column aborts the run, and it does so before the sheet
/// is touched. Each table is processed independently: a layout error is logged,
/// recorded as [`UpdateWarning::TableFailed`] and the next table proceeds.
use std::fmt;

use crate::aggregate::Aggregate;
use crate::config::Config;
use crate::newtypes::Day;
use crate::report::{UpdateReport, UpdateWarning};
use crate::resolve::Resolver;
use crate::sheet::Sheet;
use crate::source::SourceTable;
use crate::writer::{PointIndex, write_point_table, write_region_table};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Problems that stop a run before any table is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Configured source headers absent from the dataset after normalization.
    MissingColumns {
        /// The configured header text of each missing column.
        columns: Vec<String>,
    },
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns { columns } => {
                write!(f, "source data is missing columns: {}", columns.join(", "))
            }
        }
    }
}

impl std::error::Error for PipelineError {}

// ---------------------------------------------------------------------------
// update_sheet
// ---------------------------------------------------------------------------

/// Writes the values for `day` into every declared table of `sheet`.
///
/// Sector tables are written first, then point tables, each in declaration
/// order. Writes already made stay in the sheet whatever happens to later
/// tables; persisting them is the caller's decision.
///
/// # Errors
///
/// Returns [`PipelineError::MissingColumns`] if `source` lacks a configured
/// column. The sheet is untouched in that case.
pub fn update_sheet<S: Sheet + ?Sized>(
    sheet: &mut S,
    config: &Config,
    source: &SourceTable,
    day: Day,
) -> Result<UpdateReport, PipelineError> {
    let rows = source.records(&config.source_columns)?;
    tracing::debug!(rows = rows.len(), sheet = sheet.name(), %day, "loaded source rows");

    let mut resolver = Resolver::new(config);
    let aggregate = Aggregate::build(&rows, |row| resolver.group_key(row));
    let method = resolver.method();

    let mut report = UpdateReport::default();
    for name in resolver.into_unresolved() {
        report.warn(UpdateWarning::Unresolved { method, name });
    }
    if let Some(totals) = aggregate.unresolved() {
        tracing::debug!(bms = totals.bms, fms = totals.fms, "totals of unresolved rows");
    }

    for table in &config.region_tables {
        match write_region_table(sheet, table, &aggregate, day, &mut report) {
            Ok(()) => {
                report.tables_updated += 1;
                tracing::info!(table = %table.name, "table updated");
            }
            Err(e) => {
                tracing::error!(table = %table.name, error = %e, "table update failed");
                report.tables_failed += 1;
                report.warnings.push(UpdateWarning::TableFailed {
                    table: table.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let points = PointIndex::build(&rows);
    for table in &config.new_points_tables {
        match write_point_table(sheet, table, &points, day, &mut report) {
            Ok(()) => {
                report.tables_updated += 1;
                tracing::info!(table = %table.name, "point table updated");
            }
            Err(e) => {
                tracing::error!(table = %table.name, error = %e, "point table update failed");
                report.tables_failed += 1;
                report.warnings.push(UpdateWarning::TableFailed {
                    table: table.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::config::GroupingMethod;
    use crate::sheet::{CellValue, GridSheet};
    use crate::test_helpers::{config_with_mappings, day, num, point_table, region_table, text};

    fn source() -> SourceTable {
        SourceTable::from_grid(vec![
            vec![
                text("Регион"),
                text("РегМенеджер"),
                text("Приёмный пункт"),
                text("ЛЧМ Приём"),
                text("ЛЦМ Приём"),
            ],
            vec![text("Томская"), text("Иванов И.И."), text("Зуевка"), num(50.0), num(1.0)],
            vec![text("Томская"), text("Петров П.П."), text("пп Итатка"), num(70.0), num(2.0)],
            vec![text("Омская"), text("Сидоров С.С."), text("Асино"), num(5.0), num(0.0)],
        ])
    }

    fn report_sheet() -> GridSheet {
        let mut sheet = GridSheet::new("Sheet1");
        for d in 1..=31u32 {
            sheet.set(9, 4 + d, CellValue::Number(f64::from(d)));
        }
        sheet.set_text(10, 4, "СекторА");
        sheet.set_text(30, 4, "Зуевка");
        sheet.set_text(31, 4, "Итатка");
        sheet
    }

    #[test]
    fn manager_grouping_end_to_end() {
        let mut config = config_with_mappings(
            GroupingMethod::Manager,
            &[("Иванов", "СекторА"), ("Петров", "СекторА")],
            &[],
        );
        config.region_tables.push(region_table("E", "AI", 10, 10));
        config
            .new_points_tables
            .push(point_table(&["Зуевка", "Итатка"], 30, 31));
        let mut sheet = report_sheet();

        let report = update_sheet(&mut sheet, &config, &source(), day(15)).expect("run");

        // Day 15 is column S (19) in the sector header.
        assert_eq!(sheet.number(10, 19), Some(120.0));
        // Point table: E + 14 = S as well.
        assert_eq!(sheet.number(30, 19), Some(50.0));
        assert_eq!(sheet.number(31, 19), Some(70.0));
        assert_eq!(report.tables_updated, 2);
        assert_eq!(
            report.warnings,
            vec![UpdateWarning::Unresolved {
                method: GroupingMethod::Manager,
                name: "Сидоров".to_owned(),
            }]
        );
    }

    #[test]
    fn region_grouping_uses_region_mapping() {
        let mut config = config_with_mappings(
            GroupingMethod::Region,
            &[],
            &[("Томская", "СекторА"), ("Омская", "СекторА")],
        );
        config.region_tables.push(region_table("E", "AI", 10, 10));
        let mut sheet = report_sheet();
        let report = update_sheet(&mut sheet, &config, &source(), day(1)).expect("run");
        assert_eq!(sheet.number(10, 5), Some(125.0));
        assert!(report.is_clean(), "{:?}", report.warnings);
    }

    #[test]
    fn failing_table_does_not_stop_the_next() {
        let mut config = config_with_mappings(
            GroupingMethod::Manager,
            &[("Иванов", "СекторА")],
            &[],
        );
        config.region_tables.push(region_table("1A", "AI", 10, 10));
        config.region_tables.push(region_table("E", "AI", 10, 10));
        let mut sheet = report_sheet();
        let report = update_sheet(&mut sheet, &config, &source(), day(2)).expect("run");
        assert_eq!(report.tables_failed, 1);
        assert_eq!(report.tables_updated, 1);
        assert_eq!(sheet.number(10, 6), Some(50.0));
        assert!(
            report
                .warnings
                .iter()
                .any(|w| matches!(w, UpdateWarning::TableFailed { .. }))
        );
    }

    #[test]
    fn missing_column_aborts_before_writing() {
        let mut config = config_with_mappings(GroupingMethod::Manager, &[], &[]);
        config.source_columns.point = "Пункт приёма".to_owned();
        config.region_tables.push(region_table("E", "AI", 10, 10));
        let mut sheet = report_sheet();
        let before = sheet.len();
        let err = update_sheet(&mut sheet, &config, &source(), day(1)).expect_err("missing");
        assert_eq!(err.to_string(), "source data is missing columns: Пункт приёма");
        assert_eq!(sheet.len(), before);
    }
}
