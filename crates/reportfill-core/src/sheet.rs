/// Scalar cell access shared by the locator and the writer.
///
/// The engine never sees a concrete spreadsheet library. It reads and writes
/// single cells through the [`Sheet`] trait, addressed by 1-based
/// `(row, column)` coordinates exactly as they appear in a spreadsheet UI
/// (`E9` is row 9, column 5). Formatting, formulas and merged cells are not
/// part of this contract.
use std::collections::HashMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue
// ---------------------------------------------------------------------------

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    /// Text content, stored as written.
    Text(String),
    /// Any numeric content (integers are widened to `f64`).
    Number(f64),
    /// A boolean cell.
    Bool(bool),
}

impl CellValue {
    /// Returns `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Interprets the cell as a whole number.
    ///
    /// Integral floats and text holding an integer qualify; fractional
    /// values, booleans and blanks do not.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Number(n) if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 => {
                Some(*n as i64)
            }
            Self::Text(s) => s.trim().parse::<i64>().ok(),
            Self::Number(_) | Self::Empty | Self::Bool(_) => None,
        }
    }

    /// Reads a sheet label: the trimmed display text of the cell, or `None`
    /// when the cell is blank or holds a placeholder.
    ///
    /// Numeric zero and `false` count as blank, as does the literal text
    /// `"None"` that some export tools leave in empty label cells.
    pub fn as_label(&self) -> Option<String> {
        let text = match self {
            Self::Empty | Self::Bool(false) => return None,
            Self::Number(n) if *n == 0.0 => return None,
            Self::Number(n) => format_number(*n),
            Self::Bool(true) => "true".to_owned(),
            Self::Text(s) => s.trim().to_owned(),
        };
        if text.is_empty() || text == "None" {
            None
        } else {
            Some(text)
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Formats a number the way a spreadsheet shows it: whole values without a
/// fractional part.
pub fn format_number(n: f64) -> String {
    if n == n.floor() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Sheet
// ---------------------------------------------------------------------------

/// Read/write access to one worksheet by 1-based `(row, column)`.
///
/// Writes must be visible to subsequent reads on the same handle. The engine
/// assumes exclusive access for the duration of one run and performs no
/// locking of its own.
pub trait Sheet {
    /// The worksheet name, used in log messages.
    fn name(&self) -> &str;

    /// Reads the cell at `(row, col)`. Cells outside the used range are
    /// [`CellValue::Empty`].
    fn cell(&self, row: u32, col: u32) -> CellValue;

    /// Writes a numeric value into `(row, col)`.
    fn set_number(&mut self, row: u32, col: u32, value: f64);
}

// ---------------------------------------------------------------------------
// GridSheet
// ---------------------------------------------------------------------------

/// A sparse in-memory [`Sheet`].
///
/// Useful for previewing a run without a workbook on disk and as the sheet
/// double in tests.
#[derive(Debug, Clone, Default)]
pub struct GridSheet {
    name: String,
    cells: HashMap<(u32, u32), CellValue>,
}

impl GridSheet {
    /// Creates an empty sheet called `name`.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            cells: HashMap::new(),
        }
    }

    /// Sets any cell value; used to lay out templates.
    pub fn set(&mut self, row: u32, col: u32, value: CellValue) {
        if matches!(value, CellValue::Empty) {
            self.cells.remove(&(row, col));
        } else {
            self.cells.insert((row, col), value);
        }
    }

    /// Convenience for text cells.
    pub fn set_text(&mut self, row: u32, col: u32, text: &str) {
        self.set(row, col, CellValue::Text(text.to_owned()));
    }

    /// Returns the number stored at `(row, col)`, if the cell is numeric.
    pub fn number(&self, row: u32, col: u32) -> Option<f64> {
        match self.cells.get(&(row, col)) {
            Some(CellValue::Number(n)) => Some(*n),
            Some(CellValue::Empty | CellValue::Text(_) | CellValue::Bool(_)) | None => None,
        }
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if no cell holds a value.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Sheet for GridSheet {
    fn name(&self) -> &str {
        &self.name
    }

    fn cell(&self, row: u32, col: u32) -> CellValue {
        self.cells.get(&(row, col)).cloned().unwrap_or_default()
    }

    fn set_number(&mut self, row: u32, col: u32, value: f64) {
        self.cells.insert((row, col), CellValue::Number(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_from_number_and_text() {
        assert_eq!(CellValue::Number(15.0).as_integer(), Some(15));
        assert_eq!(CellValue::Text(" 7 ".to_owned()).as_integer(), Some(7));
        assert_eq!(CellValue::Number(15.5).as_integer(), None);
        assert_eq!(CellValue::Text("итого".to_owned()).as_integer(), None);
        assert_eq!(CellValue::Empty.as_integer(), None);
    }

    #[test]
    fn label_skips_blanks_and_placeholders() {
        assert_eq!(CellValue::Empty.as_label(), None);
        assert_eq!(CellValue::Text("   ".to_owned()).as_label(), None);
        assert_eq!(CellValue::Text("None".to_owned()).as_label(), None);
        assert_eq!(CellValue::Number(0.0).as_label(), None);
        assert_eq!(
            CellValue::Text(" Томский (ТС) ".to_owned()).as_label(),
            Some("Томский (ТС)".to_owned())
        );
        assert_eq!(CellValue::Number(12.0).as_label(), Some("12".to_owned()));
    }

    #[test]
    fn grid_sheet_round_trips_writes() {
        let mut sheet = GridSheet::new("Sheet1");
        assert!(sheet.is_empty());
        sheet.set_number(3, 4, 120.0);
        assert_eq!(sheet.cell(3, 4), CellValue::Number(120.0));
        assert_eq!(sheet.number(3, 4), Some(120.0));
        assert_eq!(sheet.cell(1, 1), CellValue::Empty);
        sheet.set(3, 4, CellValue::Empty);
        assert_eq!(sheet.len(), 0);
    }

    #[test]
    fn display_formats_whole_numbers_without_fraction() {
        assert_eq!(CellValue::Number(31.0).to_string(), "31");
        assert_eq!(CellValue::Number(2.5).to_string(), "2.5");
    }
}
