/// Reads the sales export with `calamine`.
///
/// Only the first worksheet is used. Its first used row is the header.
/// Cells are converted to [`CellValue`] without interpretation; measure
/// parsing and header matching happen in `reportfill-core`.
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use reportfill_core::{CellValue, SourceTable};

use crate::error::ExcelError;

/// Loads the first worksheet of `path` as a [`SourceTable`].
///
/// `.xlsx`, `.xlsm`, `.xls` and `.ods` are accepted; the format is chosen by
/// extension.
///
/// # Errors
///
/// Returns [`ExcelError::Open`] if the file cannot be read as a workbook and
/// [`ExcelError::NoWorksheet`] if it has no sheets.
pub fn read_source(path: &Path) -> Result<SourceTable, ExcelError> {
    let grid = read_first_sheet(path)?;
    let table = SourceTable::from_grid(grid);
    tracing::debug!(
        path = %path.display(),
        columns = table.headers().len(),
        rows = table.len(),
        "read source dataset"
    );
    Ok(table)
}

/// Reads the first worksheet of `path` as rows of cells, header included.
///
/// # Errors
///
/// See [`read_source`].
pub fn read_first_sheet(path: &Path) -> Result<Vec<Vec<CellValue>>, ExcelError> {
    let open_error = |detail: String| ExcelError::Open {
        path: path.display().to_string(),
        detail,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| open_error(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ExcelError::NoWorksheet {
            path: path.display().to_string(),
        })?
        .map_err(|e| open_error(e.to_string()))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect())
}

/// Converts a `calamine` cell into the engine's scalar form.
///
/// Dates keep their textual form; error cells read as empty.
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Text(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_support::{sample_source, write_rows};

    #[test]
    fn converts_scalar_cells() {
        assert_eq!(cell_value(&Data::Int(7)), CellValue::Number(7.0));
        assert_eq!(cell_value(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(
            cell_value(&Data::String("Зуевка".to_owned())),
            CellValue::Text("Зуевка".to_owned())
        );
        assert_eq!(cell_value(&Data::Empty), CellValue::Empty);
    }

    #[test]
    fn reads_first_sheet_with_header() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = sample_source(dir.path());
        let table = read_source(&path).expect("readable");
        assert_eq!(table.headers()[0], "Регион");
        assert_eq!(table.len(), 3);
        assert_eq!(table.column("ЛЧМ ПРИЕМ"), Some(3));
    }

    #[test]
    fn blank_rows_in_source_are_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("gaps.xlsx");
        write_rows(
            &path,
            &[
                &["Регион", "ЛЧМ Приём"],
                &["Томская", "10"],
                &["", ""],
                &["Омская", "5"],
            ],
        );
        let table = read_source(&path).expect("readable");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = read_source(&dir.path().join("absent.xlsx")).expect_err("absent");
        assert!(matches!(err, ExcelError::Open { .. }), "{err}");
    }
}
