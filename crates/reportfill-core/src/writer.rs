/// Writes one day's values into the declared tables of a report sheet.
///
/// Both writers walk their table's row range top to bottom, read the label
/// cell of each row and write a number into that row's day column. Blank
/// labels are skipped without a warning. Every other row receives a value,
/// zero when nothing matched, so a re-run for the same day overwrites stale
/// figures.
///
/// Layout problems (bad column letters, reversed ranges, missing day header)
/// are detected before the first write, so a failing table leaves the sheet
/// untouched.
use std::collections::{HashMap, HashSet};

use crate::aggregate::{Aggregate, Totals};
use crate::config::{PointTable, RegionTable};
use crate::layout::{LayoutError, checked_range, column_index, find_day_column, point_day_column};
use crate::newtypes::Day;
use crate::normalize::normalize;
use crate::report::{UpdateReport, UpdateWarning};
use crate::sheet::Sheet;
use crate::source::SourceRow;

/// Leading token some exports put before a point name (`"пп Зуевка"`).
pub const POINT_PREFIX: &str = "пп";

/// Value written when a label has nothing to report.
pub const DEFAULT_VALUE: f64 = 0.0;

// ---------------------------------------------------------------------------
// Sector tables
// ---------------------------------------------------------------------------

/// Fills the day column of a sector table from `aggregate`.
///
/// Labels are matched against sector names exactly, without normalization.
///
/// # Errors
///
/// Returns a [`LayoutError`] if the descriptor is unusable or the header row
/// does not hold `day`. Nothing is written in that case.
pub fn write_region_table<S: Sheet + ?Sized>(
    sheet: &mut S,
    table: &RegionTable,
    aggregate: &Aggregate,
    day: Day,
    report: &mut UpdateReport,
) -> Result<(), LayoutError> {
    let label_col = column_index(&table.region_col)?;
    let rows = checked_range(&table.name, "rows", table.data_start_row, table.data_end_row)?;
    let day_col = find_day_column(sheet, table, day)?;
    tracing::debug!(table = %table.name, day_col, "located day column");

    for row in rows {
        let Some(label) = sheet.cell(row, label_col).as_label() else {
            continue;
        };
        let value = match aggregate.sector(&label) {
            Some(totals) => totals.get(table.measure),
            None => {
                report.warn(UpdateWarning::UnknownSector {
                    table: table.name.clone(),
                    row,
                    label,
                });
                DEFAULT_VALUE
            }
        };
        sheet.set_number(row, day_col, value);
        report.push_write(&table.name, row, day_col, value);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Point tables
// ---------------------------------------------------------------------------

/// Source measures keyed by normalized point name.
///
/// Only the first source row for each point is kept; later duplicates are
/// ignored rather than summed.
#[derive(Debug, Clone, Default)]
pub struct PointIndex {
    first: HashMap<String, Totals>,
}

impl PointIndex {
    /// Indexes `rows` by normalized point name.
    pub fn build(rows: &[SourceRow]) -> Self {
        let mut first = HashMap::new();
        for row in rows {
            let key = normalize(&row.point);
            if !key.is_empty() {
                first.entry(key).or_insert_with(|| Totals::of_row(row));
            }
        }
        Self { first }
    }

    /// Measures for an already-normalized point name, trying the bare name
    /// first and then the prefixed spelling.
    pub fn lookup(&self, normalized: &str) -> Option<&Totals> {
        self.first
            .get(normalized)
            .or_else(|| self.first.get(&format!("{POINT_PREFIX} {normalized}")))
    }

    /// Number of distinct points.
    pub fn len(&self) -> usize {
        self.first.len()
    }

    /// Returns `true` when no source row named a point.
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Fills the day column of a point table from `points`.
///
/// A row is looked up only if its normalized label appears in the table's
/// normalized `point_names`. Rows are matched by content, never by position
/// in that list.
///
/// # Errors
///
/// Returns a [`LayoutError`] if a column letter is invalid or the row range
/// is reversed. Nothing is written in that case.
pub fn write_point_table<S: Sheet + ?Sized>(
    sheet: &mut S,
    table: &PointTable,
    points: &PointIndex,
    day: Day,
    report: &mut UpdateReport,
) -> Result<(), LayoutError> {
    let label_col = column_index(&table.point_col)?;
    let target_col = point_day_column(table, day)?;
    let rows = checked_range(&table.name, "rows", table.start_row, table.end_row)?;
    let declared: HashSet<String> = table.point_names.iter().map(|p| normalize(p)).collect();

    for row in rows {
        let Some(label) = sheet.cell(row, label_col).as_label() else {
            continue;
        };
        let normalized = normalize(&label);

        let value = if !declared.contains(&normalized) {
            report.warn(UpdateWarning::PointNotDeclared {
                table: table.name.clone(),
                row,
                label,
            });
            DEFAULT_VALUE
        } else if let Some(totals) = points.lookup(&normalized) {
            totals.get(table.measure)
        } else {
            report.warn(UpdateWarning::PointNotInSource {
                table: table.name.clone(),
                row,
                label,
            });
            DEFAULT_VALUE
        };
        sheet.set_number(row, target_col, value);
        report.push_write(&table.name, row, target_col, value);
    }
    Ok(())
}
