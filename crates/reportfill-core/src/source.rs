/// The incoming sales export as a header plus rows of scalar cells.
///
/// Headers are compared in normalized form only, so `"Приёмный пункт"` in the
/// configuration matches `"ПРИЕМНЫЙ  ПУНКТ"` in the file. Readers hand the
/// table over unmodified; [`SourceTable::records`] projects it onto the five
/// logical fields the engine needs.
use crate::config::{MeasureType, SourceColumns};
use crate::normalize::normalize;
use crate::pipeline::PipelineError;
use crate::sheet::CellValue;

// ---------------------------------------------------------------------------
// SourceTable
// ---------------------------------------------------------------------------

/// A rectangular dataset with one header row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTable {
    headers: Vec<String>,
    normalized_headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    /// Builds a table from a header row and data rows. Fully blank rows are
    /// dropped.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let normalized_headers = headers.iter().map(|h| normalize(h)).collect();
        let rows = rows
            .into_iter()
            .filter(|row| !row.iter().all(CellValue::is_blank))
            .collect();
        Self {
            headers,
            normalized_headers,
            rows,
        }
    }

    /// Builds a table from raw grid rows, taking the first row as the header.
    pub fn from_grid(mut grid: Vec<Vec<CellValue>>) -> Self {
        if grid.is_empty() {
            return Self::default();
        }
        let header_row = grid.remove(0);
        let headers = header_row.iter().map(ToString::to_string).collect();
        Self::new(headers, grid)
    }

    /// Header text as it appears in the source.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column whose normalized header equals `header`
    /// (compared after normalizing `header` as well).
    pub fn column(&self, header: &str) -> Option<usize> {
        let wanted = normalize(header);
        self.normalized_headers.iter().position(|h| *h == wanted)
    }

    /// Projects every row onto the logical source fields.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::MissingColumns`] listing each configured
    /// header that has no normalized counterpart in the table.
    pub fn records(&self, columns: &SourceColumns) -> Result<Vec<SourceRow>, PipelineError> {
        let mut missing = Vec::new();
        let mut positions = [0usize; 5];
        for (slot, (_, header)) in positions.iter_mut().zip(columns.entries()) {
            match self.column(header) {
                Some(index) => *slot = index,
                None => missing.push(header.to_owned()),
            }
        }
        if !missing.is_empty() {
            return Err(PipelineError::MissingColumns { columns: missing });
        }
        let [region, manager, point, bms, fms] = positions;

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
                SourceRow {
                    region: cell(region).to_string().trim().to_owned(),
                    manager: cell(manager).to_string().trim().to_owned(),
                    point: cell(point).to_string().trim().to_owned(),
                    bms: parse_measure(&cell(bms)),
                    fms: parse_measure(&cell(fms)),
                }
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// SourceRow
// ---------------------------------------------------------------------------

/// One sales record reduced to the fields the engine uses.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRow {
    /// Region as written in the export.
    pub region: String,
    /// Manager full name as written in the export.
    pub manager: String,
    /// Intake point name as written in the export.
    pub point: String,
    /// Ferrous measure.
    pub bms: f64,
    /// Non-ferrous measure.
    pub fms: f64,
}

impl SourceRow {
    /// Value of `measure`; non-finite values read as zero.
    pub fn measure(&self, measure: MeasureType) -> f64 {
        let value = match measure {
            MeasureType::Bms => self.bms,
            MeasureType::Fms => self.fms,
        };
        finite_or_zero(value)
    }
}

/// Reads a measure cell. Numbers pass through; text is parsed after removing
/// spaces (including no-break spaces) and accepting a decimal comma. Blank,
/// boolean, unparseable and non-finite values read as zero.
pub fn parse_measure(cell: &CellValue) -> f64 {
    match cell {
        CellValue::Number(n) => finite_or_zero(*n),
        CellValue::Text(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !c.is_whitespace())
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            cleaned.parse::<f64>().map_or(0.0, finite_or_zero)
        }
        CellValue::Empty | CellValue::Bool(_) => 0.0,
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;
    use crate::test_helpers::{num, source_columns, text};

    #[test]
    fn measure_parsing() {
        assert_eq!(parse_measure(&num(12.5)), 12.5);
        assert_eq!(parse_measure(&text("1 234,5")), 1234.5);
        assert_eq!(parse_measure(&text("1\u{a0}000")), 1000.0);
        assert_eq!(parse_measure(&text("н/д")), 0.0);
        assert_eq!(parse_measure(&text("NaN")), 0.0);
        assert_eq!(parse_measure(&num(f64::NAN)), 0.0);
        assert_eq!(parse_measure(&CellValue::Empty), 0.0);
        assert_eq!(parse_measure(&CellValue::Bool(true)), 0.0);
    }

    #[test]
    fn headers_match_after_normalization() {
        let table = SourceTable::new(
            vec!["  РЕГИОН ".to_owned(), "Приемный  пункт".to_owned()],
            Vec::new(),
        );
        assert_eq!(table.column("Регион"), Some(0));
        assert_eq!(table.column("Приёмный пункт"), Some(1));
        assert_eq!(table.column("Менеджер"), None);
    }

    #[test]
    fn blank_rows_are_dropped() {
        let table = SourceTable::from_grid(vec![
            vec![text("A"), text("B")],
            vec![text("x"), num(1.0)],
            vec![CellValue::Empty, text("  ")],
            vec![text("y"), CellValue::Empty],
        ]);
        assert_eq!(table.headers(), ["A", "B"]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn empty_grid_gives_empty_table() {
        let table = SourceTable::from_grid(Vec::new());
        assert!(table.is_empty());
        assert!(table.headers().is_empty());
    }

    #[test]
    fn records_project_logical_fields() {
        let table = SourceTable::from_grid(vec![
            vec![
                text("ЛЦМ Приём"),
                text("Регион"),
                text("РегМенеджер"),
                text("Приёмный пункт"),
                text("ЛЧМ Приём"),
            ],
            vec![text("3,5"), text(" Томская "), text("Иванов И.И."), text("Зуевка"), num(50.0)],
            vec![num(1.0), text("Томская"), text("Петров"), text("Итатка")],
        ]);
        let rows = table.records(&source_columns()).expect("columns present");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].region, "Томская");
        assert_eq!(rows[0].manager, "Иванов И.И.");
        assert_eq!(rows[0].bms, 50.0);
        assert_eq!(rows[0].fms, 3.5);
        // Short rows read missing cells as blank.
        assert_eq!(rows[1].bms, 0.0);
    }

    #[test]
    fn missing_columns_are_all_listed() {
        let table = SourceTable::from_grid(vec![vec![text("Регион"), text("ЛЧМ Приём")]]);
        let err = table.records(&source_columns()).expect_err("columns missing");
        assert_eq!(
            err,
            PipelineError::MissingColumns {
                columns: vec![
                    "РегМенеджер".to_owned(),
                    "Приёмный пункт".to_owned(),
                    "ЛЦМ Приём".to_owned(),
                ]
            }
        );
    }

    #[test]
    fn non_finite_measure_reads_zero() {
        let row = SourceRow {
            bms: f64::INFINITY,
            fms: 2.0,
            ..SourceRow::default()
        };
        assert_eq!(row.measure(MeasureType::Bms), 0.0);
        assert_eq!(row.measure(MeasureType::Fms), 2.0);
    }
}
