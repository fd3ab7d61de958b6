/// Column arithmetic and target-cell location for declared report tables.
///
/// Spreadsheet columns are written as bijective base-26 letters: `A`=1 …
/// `Z`=26, `AA`=27. There is no zero digit, so `A` is not a leading zero.
///
/// Two lookup modes exist:
///
/// - **Day-column search** for [`RegionTable`]s: scan the header row across
///   the declared column range for a cell whose integer value is the day.
///   The first match in left-to-right order wins.
/// - **Offset column** for [`PointTable`]s: `data_col + (day - 1)`. No search
///   and no check against the sheet width.
use std::fmt;
use std::ops::RangeInclusive;

use crate::config::{PointTable, RegionTable};
use crate::newtypes::Day;
use crate::sheet::Sheet;

// ---------------------------------------------------------------------------
// LayoutError
// ---------------------------------------------------------------------------

/// Structural problems with a table descriptor or the sheet it points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// A column reference contains something other than ASCII letters, is
    /// empty, or is too long to address.
    InvalidColumn {
        /// The rejected column reference.
        letters: String,
    },
    /// A declared row is 0. Sheet rows are numbered from 1.
    InvalidRow {
        /// Table name.
        table: String,
        /// Which field holds the row (`"rows"` or `"day_row"`).
        what: &'static str,
    },
    /// A declared range has its start after its end.
    InvalidRange {
        /// Table name.
        table: String,
        /// Which range (`"rows"` or `"day columns"`).
        what: &'static str,
        /// Declared start.
        start: String,
        /// Declared end.
        end: String,
    },
    /// No header cell in the declared range holds the requested day.
    DayColumnNotFound {
        /// Table name.
        table: String,
        /// The requested day.
        day: Day,
        /// Header row that was scanned.
        row: u32,
        /// First scanned column, as letters.
        start_col: String,
        /// Last scanned column, as letters.
        end_col: String,
    },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidColumn { letters } => {
                write!(f, "invalid column reference {letters:?}")
            }
            Self::InvalidRow { table, what } => {
                write!(f, "table {table:?}: {what} refers to row 0, rows start at 1")
            }
            Self::InvalidRange {
                table,
                what,
                start,
                end,
            } => write!(f, "table {table:?}: {what} range {start}..{end} is reversed"),
            Self::DayColumnNotFound {
                table,
                day,
                row,
                start_col,
                end_col,
            } => write!(
                f,
                "table {table:?}: no column for day {day} in {start_col}{row}:{end_col}{row}"
            ),
        }
    }
}

impl std::error::Error for LayoutError {}

// ---------------------------------------------------------------------------
// Column letters
// ---------------------------------------------------------------------------

/// Converts column letters (`"E"`, `"ai"`) to a 1-based column index.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidColumn`] for empty input, any non-ASCII-letter
/// character, or a reference beyond `u32`.
pub fn column_index(letters: &str) -> Result<u32, LayoutError> {
    let invalid = || LayoutError::InvalidColumn {
        letters: letters.to_owned(),
    };
    if letters.is_empty() {
        return Err(invalid());
    }
    let mut index: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = u32::from(ch.to_ascii_uppercase()) - u32::from('A') + 1;
        index = index
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(invalid)?;
    }
    Ok(index)
}

/// Converts a 1-based column index back to letters. Index 0 yields `""`.
pub fn column_letters(index: u32) -> String {
    let mut n = index;
    let mut letters = Vec::new();
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}

/// Formats an A1-style reference such as `"E10"`.
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{row}", column_letters(col))
}

/// Checks `1 <= start <= end` and returns the inclusive range.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidRow`] when `start` is 0 and
/// [`LayoutError::InvalidRange`] when the range is reversed.
pub fn checked_range(
    table: &str,
    what: &'static str,
    start: u32,
    end: u32,
) -> Result<RangeInclusive<u32>, LayoutError> {
    if start == 0 {
        return Err(LayoutError::InvalidRow {
            table: table.to_owned(),
            what,
        });
    }
    if start > end {
        return Err(LayoutError::InvalidRange {
            table: table.to_owned(),
            what,
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(start..=end)
}

// ---------------------------------------------------------------------------
// Locators
// ---------------------------------------------------------------------------

/// Finds the column of `day` in the header row of a sector table.
///
/// Header cells that are blank or not whole numbers are skipped. If the header
/// repeats a day number, the leftmost occurrence is returned.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidRow`], [`LayoutError::InvalidColumn`] or
/// [`LayoutError::InvalidRange`] for a bad descriptor and
/// [`LayoutError::DayColumnNotFound`] when the header does not contain the
/// day.
pub fn find_day_column<S: Sheet + ?Sized>(
    sheet: &S,
    table: &RegionTable,
    day: Day,
) -> Result<u32, LayoutError> {
    if table.day_row == 0 {
        return Err(LayoutError::InvalidRow {
            table: table.name.clone(),
            what: "day_row",
        });
    }
    let start = column_index(&table.day_start_col)?;
    let end = column_index(&table.day_end_col)?;
    if start > end {
        return Err(LayoutError::InvalidRange {
            table: table.name.clone(),
            what: "day columns",
            start: table.day_start_col.clone(),
            end: table.day_end_col.clone(),
        });
    }
    let wanted = i64::from(day.get());
    (start..=end)
        .find(|&col| sheet.cell(table.day_row, col).as_integer() == Some(wanted))
        .ok_or_else(|| LayoutError::DayColumnNotFound {
            table: table.name.clone(),
            day,
            row: table.day_row,
            start_col: table.day_start_col.clone(),
            end_col: table.day_end_col.clone(),
        })
}

/// Computes the target column of `day` in a point table.
///
/// # Errors
///
/// Returns [`LayoutError::InvalidColumn`] if `data_col` is not a valid column
/// reference or the offset overflows.
pub fn point_day_column(table: &PointTable, day: Day) -> Result<u32, LayoutError> {
    let data_col = column_index(&table.data_col)?;
    data_col
        .checked_add(day.offset())
        .ok_or_else(|| LayoutError::InvalidColumn {
            letters: table.data_col.clone(),
        })
}
