/// Spreadsheet adapters for reportfill.
///
/// This crate connects the file-agnostic engine in `reportfill-core` to real
/// workbooks. `calamine` and `umya-spreadsheet` are confined here and do not
/// bleed into `reportfill-core` or `reportfill-cli`.
///
/// | Concern | Library |
/// |---|---|
/// | Sales export (`.xlsx`, `.xls`, `.ods`) | `calamine`, read-only |
/// | Report template (`.xlsx`) | `umya-spreadsheet`, read-modify-write |
/// | Mapping exchange files | `csv` + `encoding_rs` (Windows-1251) |
///
/// # Run sequence
///
/// 1. Read the first sheet of the source export.
/// 2. Open the report and borrow the named sheet.
/// 3. Run [`reportfill_core::update_sheet`].
/// 4. Save the report in place, unless this is a dry run.
///
/// A failure at any step leaves the report file as it was.
use std::path::PathBuf;

use reportfill_core::{Config, Day, UpdateReport, cell_ref, update_sheet};

pub mod error;
pub mod mapping_io;
pub mod report;
pub mod source;

#[cfg(test)]
mod test_support;

pub use error::ExcelError;
pub use mapping_io::{
    CSV_DELIMITER, ImportedMappings, export_mappings, export_paths, import_mappings,
};
pub use report::{ReportSheet, ReportWorkbook};
pub use source::{read_first_sheet, read_source};

/// Sheet updated when no name is given.
pub const DEFAULT_SHEET: &str = "Sheet1";

/// Inputs of one update run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Sales export to read.
    pub source: PathBuf,
    /// Report workbook to update in place.
    pub report: PathBuf,
    /// Name of the sheet inside the report.
    pub sheet: String,
    /// Day of month selecting the target column.
    pub day: Day,
    /// Compute and log every write without saving the report.
    pub dry_run: bool,
}

/// Runs one update and returns its report.
///
/// # Errors
///
/// Returns an [`ExcelError`] if the source cannot be read, the report or its
/// sheet cannot be opened, the source lacks a configured column, or saving
/// fails. Per-table layout problems are not errors; they appear in the
/// returned [`UpdateReport`].
pub fn try_run(config: &Config, request: &UpdateRequest) -> Result<UpdateReport, ExcelError> {
    let source = read_source(&request.source)?;
    let mut workbook = ReportWorkbook::open(&request.report)?;

    let report = {
        let mut sheet = workbook.sheet_mut(&request.sheet)?;
        update_sheet(&mut sheet, config, &source, request.day)?
    };

    if request.dry_run {
        for write in &report.writes {
            tracing::info!(
                table = %write.table,
                cell = %cell_ref(write.row, write.column),
                value = write.value,
                "dry run: would write"
            );
        }
    } else {
        workbook.save()?;
    }
    Ok(report)
}

/// Runs one update and reports success as a boolean.
///
/// Nothing escapes this function: every error is logged with its context and
/// turned into `false`. Warnings and per-table failures are logged too; a run
/// with warnings still returns `true`.
pub fn run(config: &Config, request: &UpdateRequest) -> bool {
    tracing::info!(
        source = %request.source.display(),
        report = %request.report.display(),
        sheet = %request.sheet,
        day = %request.day,
        dry_run = request.dry_run,
        "starting report update"
    );
    match try_run(config, request) {
        Ok(report) => {
            tracing::info!(
                cells = report.writes.len(),
                warnings = report.warnings.len(),
                tables_updated = report.tables_updated,
                tables_failed = report.tables_failed,
                "report update finished"
            );
            true
        }
        Err(e) => {
            tracing::error!(error = %e, "report update failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use std::path::Path;

    use reportfill_core::{CellValue, Sheet, UpdateWarning};

    use super::*;
    use crate::test_support::{minimal_config, sample_report, sample_source};

    fn day(n: u32) -> Day {
        Day::try_from(n).expect("valid day")
    }

    fn request(dir: &Path, d: u32, dry_run: bool) -> UpdateRequest {
        UpdateRequest {
            source: sample_source(dir),
            report: sample_report(dir),
            sheet: DEFAULT_SHEET.to_owned(),
            day: day(d),
            dry_run,
        }
    }

    fn reopen(path: &Path, row: u32, col: u32) -> CellValue {
        let mut book = ReportWorkbook::open(path).expect("reopen");
        let sheet = book.sheet_mut(DEFAULT_SHEET).expect("sheet");
        sheet.cell(row, col)
    }

    #[test]
    fn end_to_end_update_saves_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = request(dir.path(), 15, false);
        let report = try_run(&minimal_config(), &request).expect("run");

        // Day 15 sits in column S (19) for both tables.
        assert_eq!(reopen(&request.report, 10, 19), CellValue::Number(120.0));
        assert_eq!(reopen(&request.report, 11, 19), CellValue::Number(0.0));
        assert_eq!(reopen(&request.report, 30, 19), CellValue::Number(50.0));
        assert_eq!(reopen(&request.report, 31, 19), CellValue::Number(70.0));
        assert_eq!(report.tables_updated, 2);
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            UpdateWarning::Unresolved { name, .. } if name == "Сидоров"
        )));
        assert!(report.warnings.iter().any(|w| matches!(
            w,
            UpdateWarning::UnknownSector { label, .. } if label == "СекторБ"
        )));
    }

    #[test]
    fn dry_run_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = request(dir.path(), 3, true);
        let before = std::fs::read(&request.report).expect("read report");
        let report = try_run(&minimal_config(), &request).expect("run");
        assert_eq!(report.written(10, 7), Some(120.0));
        assert_eq!(std::fs::read(&request.report).expect("read report"), before);
    }

    #[test]
    fn missing_sheet_fails_the_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut request = request(dir.path(), 1, false);
        request.sheet = "Отчет".to_owned();
        assert!(matches!(
            try_run(&minimal_config(), &request),
            Err(ExcelError::MissingSheet { .. })
        ));
        assert!(!run(&minimal_config(), &request));
    }

    #[test]
    fn missing_source_column_fails_before_saving() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = request(dir.path(), 1, false);
        let before = std::fs::read(&request.report).expect("read report");
        let mut config = minimal_config();
        config.source_columns.fms_sales = "ЛЦМ Отгрузка".to_owned();
        let err = try_run(&config, &request).expect_err("column missing");
        assert!(err.to_string().contains("ЛЦМ Отгрузка"), "{err}");
        assert_eq!(std::fs::read(&request.report).expect("read report"), before);
    }

    #[test]
    fn missing_source_file_returns_false() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut request = request(dir.path(), 1, false);
        request.source = dir.path().join("nowhere.xlsx");
        assert!(!run(&minimal_config(), &request));
    }

    #[test]
    fn day_without_header_column_fails_table_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let request = request(dir.path(), 31, false);
        let mut config = minimal_config();
        config.region_tables[0].day_end_col = "AH".to_owned();
        let report = try_run(&config, &request).expect("run");
        assert_eq!(report.tables_failed, 1);
        // The point table still wrote its column (E + 30 = AI).
        assert_eq!(reopen(&request.report, 30, 35), CellValue::Number(50.0));
    }
}
