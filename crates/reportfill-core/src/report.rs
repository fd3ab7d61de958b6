/// What a run did to the sheet and what it could not reconcile.
use std::fmt;

use crate::config::GroupingMethod;

// ---------------------------------------------------------------------------
// UpdateWarning
// ---------------------------------------------------------------------------

/// A non-fatal data-quality finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateWarning {
    /// A source name had no entry in the active mapping.
    Unresolved {
        /// Which mapping was consulted.
        method: GroupingMethod,
        /// The surname or region text that missed.
        name: String,
    },
    /// A sector table row carries a label with no aggregated total.
    UnknownSector {
        /// Table name.
        table: String,
        /// Sheet row.
        row: u32,
        /// The label as read from the sheet.
        label: String,
    },
    /// A declared point has no row in the source export.
    PointNotInSource {
        /// Table name.
        table: String,
        /// Sheet row.
        row: u32,
        /// The label as read from the sheet.
        label: String,
    },
    /// A sheet row names a point missing from the table's `point_names`.
    PointNotDeclared {
        /// Table name.
        table: String,
        /// Sheet row.
        row: u32,
        /// The label as read from the sheet.
        label: String,
    },
    /// A table could not be processed at all.
    TableFailed {
        /// Table name.
        table: String,
        /// Why it failed.
        error: String,
    },
}

impl fmt::Display for UpdateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved { method, name } => {
                write!(f, "{method} {name:?} is not in the {method} mapping")
            }
            Self::UnknownSector { table, row, label } => {
                write!(f, "table {table:?} row {row}: no totals for {label:?}, wrote 0")
            }
            Self::PointNotInSource { table, row, label } => {
                write!(f, "table {table:?} row {row}: point {label:?} not found in source data, wrote 0")
            }
            Self::PointNotDeclared { table, row, label } => {
                write!(f, "table {table:?} row {row}: point {label:?} is not in point_names, wrote 0")
            }
            Self::TableFailed { table, error } => {
                write!(f, "table {table:?} skipped: {error}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// CellWrite / UpdateReport
// ---------------------------------------------------------------------------

/// One numeric value written into the sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct CellWrite {
    /// Table that produced the write.
    pub table: String,
    /// 1-based sheet row.
    pub row: u32,
    /// 1-based sheet column.
    pub column: u32,
    /// Value written.
    pub value: f64,
}

/// Outcome of updating one sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateReport {
    /// Every write, in the order performed.
    pub writes: Vec<CellWrite>,
    /// Every warning, in the order raised.
    pub warnings: Vec<UpdateWarning>,
    /// Tables processed to completion.
    pub tables_updated: usize,
    /// Tables abandoned because of a layout error.
    pub tables_failed: usize,
}

impl UpdateReport {
    /// Records a write.
    pub fn push_write(&mut self, table: &str, row: u32, column: u32, value: f64) {
        self.writes.push(CellWrite {
            table: table.to_owned(),
            row,
            column,
            value,
        });
    }

    /// Records a warning and emits it as a `tracing` event.
    pub fn warn(&mut self, warning: UpdateWarning) {
        tracing::warn!("{warning}");
        self.warnings.push(warning);
    }

    /// The value written at `(row, column)`, if any. The last write wins.
    pub fn written(&self, row: u32, column: u32) -> Option<f64> {
        self.writes
            .iter()
            .rev()
            .find(|w| w.row == row && w.column == column)
            .map(|w| w.value)
    }

    /// Returns `true` if no warning was raised and no table failed.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.tables_failed == 0
    }
}
