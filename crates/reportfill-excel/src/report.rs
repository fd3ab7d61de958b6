/// Read-modify-write access to the report workbook with `umya-spreadsheet`.
///
/// The whole workbook is loaded into memory, one sheet is borrowed as a
/// [`Sheet`], and the workbook is written back to its original path only when
/// [`ReportWorkbook::save`] is called. Styles, formulas and merged ranges of
/// untouched cells survive the round trip.
use std::path::{Path, PathBuf};

use umya_spreadsheet::{Spreadsheet, Worksheet};

use reportfill_core::{CellValue, Sheet};

use crate::error::ExcelError;

/// An open `.xlsx` report.
pub struct ReportWorkbook {
    path: PathBuf,
    book: Spreadsheet,
}

impl std::fmt::Debug for ReportWorkbook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportWorkbook")
            .field("path", &self.path)
            .field("sheets", &self.sheet_names())
            .finish()
    }
}

impl ReportWorkbook {
    /// Opens the workbook at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ExcelError::Open`] if the file is missing or not an `.xlsx`.
    pub fn open(path: &Path) -> Result<Self, ExcelError> {
        let book = umya_spreadsheet::reader::xlsx::read(path).map_err(|e| ExcelError::Open {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            book,
        })
    }

    /// The path the workbook was opened from and will be saved to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sheet names in workbook order.
    pub fn sheet_names(&self) -> Vec<String> {
        self.book
            .get_sheet_collection()
            .iter()
            .map(|ws| ws.get_name().to_owned())
            .collect()
    }

    /// Borrows the sheet called `name` for reading and writing.
    ///
    /// # Errors
    ///
    /// Returns [`ExcelError::MissingSheet`] if no sheet has that name.
    pub fn sheet_mut(&mut self, name: &str) -> Result<ReportSheet<'_>, ExcelError> {
        let available = self.sheet_names();
        match self.book.get_sheet_by_name_mut(name) {
            Some(worksheet) => Ok(ReportSheet {
                name: name.to_owned(),
                worksheet,
            }),
            None => Err(ExcelError::MissingSheet {
                sheet: name.to_owned(),
                available,
            }),
        }
    }

    /// Writes the workbook back to [`ReportWorkbook::path`].
    ///
    /// # Errors
    ///
    /// Returns [`ExcelError::Save`] if the file cannot be written.
    pub fn save(&self) -> Result<(), ExcelError> {
        self.save_as(&self.path)
    }

    /// Writes the workbook to another path.
    ///
    /// # Errors
    ///
    /// Returns [`ExcelError::Save`] if the file cannot be written.
    pub fn save_as(&self, path: &Path) -> Result<(), ExcelError> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path).map_err(|e| ExcelError::Save {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }
}

/// One worksheet of a [`ReportWorkbook`].
#[derive(Debug)]
pub struct ReportSheet<'a> {
    name: String,
    worksheet: &'a mut Worksheet,
}

impl Sheet for ReportSheet<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, col: u32) -> CellValue {
        let Some(cell) = self.worksheet.get_cell((col, row)) else {
            return CellValue::Empty;
        };
        if let Some(number) = cell.get_value_number() {
            return CellValue::Number(number);
        }
        let text = cell.get_value();
        if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.into_owned())
        }
    }

    fn set_number(&mut self, row: u32, col: u32, value: f64) {
        self.worksheet.get_cell_mut((col, row)).set_value_number(value);
    }
}
