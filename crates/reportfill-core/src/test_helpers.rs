//! Shared fixture constructors for the unit test modules of `reportfill-core`.
//!
//! Compiled only in test builds. Integration tests in other crates build their
//! own fixtures because this module is not part of the library.
#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use crate::config::{Config, GroupingMethod, MeasureType, PointTable, RegionTable, SourceColumns};
use crate::newtypes::Day;
use crate::sheet::CellValue;
use crate::source::SourceRow;

/// A text cell.
pub fn text(s: &str) -> CellValue {
    CellValue::Text(s.to_owned())
}

/// A numeric cell.
pub fn num(n: f64) -> CellValue {
    CellValue::Number(n)
}

/// Parses a day, panicking outside 1..=31.
pub fn day(n: u32) -> Day {
    Day::try_from(n).expect("valid Day")
}

/// The column headers of the standard export.
pub fn source_columns() -> SourceColumns {
    SourceColumns {
        region: "Регион".to_owned(),
        manager: "РегМенеджер".to_owned(),
        point: "Приёмный пункт".to_owned(),
        bms_sales: "ЛЧМ Приём".to_owned(),
        fms_sales: "ЛЦМ Приём".to_owned(),
    }
}

/// A source row with the given fields.
pub fn row(region: &str, manager: &str, point: &str, bms: f64, fms: f64) -> SourceRow {
    SourceRow {
        region: region.to_owned(),
        manager: manager.to_owned(),
        point: point.to_owned(),
        bms,
        fms,
    }
}

/// A `bms` sector table: header on row 9, labels in column D, days between
/// `day_start` and `day_end`, data rows `first..=last`.
pub fn region_table(day_start: &str, day_end: &str, first: u32, last: u32) -> RegionTable {
    RegionTable {
        name: "ЛЧМ по секторам".to_owned(),
        measure: MeasureType::Bms,
        day_row: 9,
        data_start_row: first,
        data_end_row: last,
        region_col: "D".to_owned(),
        day_start_col: day_start.to_owned(),
        day_end_col: day_end.to_owned(),
    }
}

/// A `bms` point table with labels in column D and day 1 in column E.
pub fn point_table(names: &[&str], first: u32, last: u32) -> PointTable {
    PointTable {
        name: "ЛЧМ новые пункты".to_owned(),
        measure: MeasureType::Bms,
        point_names: names.iter().map(|n| (*n).to_owned()).collect(),
        start_row: first,
        end_row: last,
        point_col: "D".to_owned(),
        data_col: "E".to_owned(),
    }
}

/// A configuration with no tables and the given mappings.
pub fn config_with_mappings(
    method: GroupingMethod,
    managers: &[(&str, &str)],
    regions: &[(&str, &str)],
) -> Config {
    let to_map = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect()
    };
    Config {
        region_tables: Vec::new(),
        new_points_tables: Vec::new(),
        source_columns: source_columns(),
        grouping_method: method,
        manager_mapping: to_map(managers),
        region_mapping: to_map(regions),
    }
}
