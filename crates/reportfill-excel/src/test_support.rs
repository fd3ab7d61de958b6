//! Workbook fixtures for the unit tests of `reportfill-excel`.
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};

use reportfill_core::Config;

/// Writes `rows` into `Sheet1` of a new `.xlsx` at `path`, starting at A1.
///
/// Cells that parse as numbers are stored as numbers; empty strings leave the
/// cell unset.
pub fn write_rows(path: &Path, rows: &[&[&str]]) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("new_file creates Sheet1");
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            let coordinate = (c as u32 + 1, r as u32 + 1);
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(number) => {
                    sheet.get_cell_mut(coordinate).set_value_number(number);
                }
                Err(_) => {
                    sheet.get_cell_mut(coordinate).set_value(*value);
                }
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write fixture");
}

/// A three-row sales export.
pub fn sample_source(dir: &Path) -> PathBuf {
    let path = dir.join("source.xlsx");
    write_rows(
        &path,
        &[
            &["Регион", "РегМенеджер", "Приёмный пункт", "ЛЧМ Приём", "ЛЦМ Приём"],
            &["Томская", "Иванов И.И.", "Зуевка", "50", "1"],
            &["Томская", "Петров П.П.", "пп Итатка", "70", "2"],
            &["Омская", "Сидоров С.С.", "Асино", "5", "0"],
        ],
    );
    path
}

/// A report template: days 1..=31 in E9:AI9, sector labels in D10:D11 and
/// point labels in D30:D31.
pub fn sample_report(dir: &Path) -> PathBuf {
    let path = dir.join("report.xlsx");
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("new_file creates Sheet1");
    for day in 1..=31u32 {
        sheet.get_cell_mut((4 + day, 9)).set_value_number(day);
    }
    sheet.get_cell_mut((4, 10)).set_value("СекторА");
    sheet.get_cell_mut((4, 11)).set_value("СекторБ");
    sheet.get_cell_mut((4, 30)).set_value("Зуевка");
    sheet.get_cell_mut((4, 31)).set_value("Итатка");
    umya_spreadsheet::writer::xlsx::write(&book, &path).expect("write fixture");
    path
}

/// A configuration matching [`sample_source`] and [`sample_report`].
pub fn minimal_config() -> Config {
    Config::from_json(
        r#"{
            "grouping_method": "manager",
            "manager_mapping": {"Иванов": "СекторА", "Петров": "СекторА"},
            "region_mapping": {},
            "source_columns": {
                "region": "Регион",
                "manager": "РегМенеджер",
                "point": "Приёмный пункт",
                "bms_sales": "ЛЧМ Приём",
                "fms_sales": "ЛЦМ Приём"
            },
            "region_tables": [{
                "name": "ЛЧМ по секторам", "type": "bms", "day_row": 9,
                "data_start_row": 10, "data_end_row": 11, "region_col": "D",
                "day_start_col": "E", "day_end_col": "AI"
            }],
            "new_points_tables": [{
                "name": "ЛЧМ новые пункты", "type": "bms",
                "point_names": ["Зуевка", "Итатка"],
                "start_row": 30, "end_row": 31, "point_col": "D", "data_col": "E"
            }]
        }"#,
    )
    .expect("fixture config")
}
