//! Integration tests for `reportfill run`.
#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::process::Command;

use calamine::{Data, Reader};

/// Path to the compiled `reportfill` binary.
fn reportfill_bin() -> PathBuf {
    let mut path = std::env::current_exe().expect("current exe");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("reportfill");
    path
}

const CONFIG: &str = r#"{
    "grouping_method": "region",
    "manager_mapping": {},
    "region_mapping": {"Томская область": "Томский (ТС)", "Омская область": "Омский (ОС)"},
    "source_columns": {
        "region": "Регион",
        "manager": "РегМенеджер",
        "point": "Приемный пункт",
        "bms_sales": "ЛЧМ Прием",
        "fms_sales": "ЛЦМ Прием"
    },
    "region_tables": [
        {"name": "ЛЧМ", "type": "bms", "day_row": 2, "data_start_row": 3, "data_end_row": 4,
         "region_col": "A", "day_start_col": "B", "day_end_col": "AF"},
        {"name": "ЛЦМ", "type": "fms", "day_row": 6, "data_start_row": 7, "data_end_row": 8,
         "region_col": "A", "day_start_col": "B", "day_end_col": "AF"}
    ],
    "new_points_tables": [
        {"name": "Новые пункты", "type": "bms", "point_names": ["Зуевка"],
         "start_row": 10, "end_row": 10, "point_col": "A", "data_col": "B"}
    ]
}"#;

/// A tempdir holding `config.json`, `source.xlsx` and `report.xlsx`.
struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("config.json"), CONFIG).expect("write config");
        write_source(&dir.path().join("source.xlsx"));
        write_report(&dir.path().join("report.xlsx"));
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn run(&self, extra: &[&str]) -> std::process::Output {
        let mut cmd = Command::new(reportfill_bin());
        cmd.current_dir(self.dir.path())
            .env("HOME", self.dir.path())
            .env_remove("REPORTFILL_CONFIG")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.path("config.json"))
            .arg("run")
            .arg(self.path("source.xlsx"))
            .arg(self.path("report.xlsx"))
            .args(extra);
        cmd.output().expect("run reportfill")
    }
}

fn write_source(path: &Path) {
    let rows: [[&str; 5]; 4] = [
        ["Регион", "РегМенеджер", "Приёмный пункт", "ЛЧМ Приём", "ЛЦМ Приём"],
        ["Томская область", "Иванов И.И.", "пп Зуевка", "1 200,5", "3"],
        ["ТОМСКАЯ ОБЛАСТЬ", "Петров П.П.", "Асино", "100", "4"],
        ["Новосибирская область", "Сидоров С.С.", "Колывань", "9", "9"],
    ];
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("new_file creates Sheet1");
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            sheet
                .get_cell_mut((c as u32 + 1, r as u32 + 1))
                .set_value(*value);
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write source");
}

fn write_report(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_by_name_mut("Sheet1")
        .expect("new_file creates Sheet1");
    for day in 1..=31u32 {
        sheet.get_cell_mut((day + 1, 2)).set_value_number(day);
        sheet.get_cell_mut((day + 1, 6)).set_value_number(day);
    }
    for row in [3, 7] {
        sheet.get_cell_mut((1, row)).set_value("Томский (ТС)");
        sheet.get_cell_mut((1, row + 1)).set_value("Омский (ОС)");
    }
    sheet.get_cell_mut((1, 10)).set_value("Зуевка");
    umya_spreadsheet::writer::xlsx::write(&book, path).expect("write report");
}

/// Reads a cell by 1-based row and column.
fn cell(path: &Path, row: u32, col: u32) -> Data {
    let mut book = calamine::open_workbook_auto(path).expect("open report");
    let range = book.worksheet_range("Sheet1").expect("Sheet1");
    range
        .get_value((row - 1, col - 1))
        .cloned()
        .unwrap_or(Data::Empty)
}

#[test]
fn run_writes_day_column_and_exits_0() {
    let fx = Fixture::new();
    let out = fx.run(&["--day", "5"]);
    assert!(
        out.status.success(),
        "exit code: {:?}, stderr: {}",
        out.status.code(),
        String::from_utf8_lossy(&out.stderr)
    );

    let report = fx.path("report.xlsx");
    // Day 5 is column F (6). Both Tomsk spellings fold into one sector.
    assert_eq!(cell(&report, 3, 6), Data::Float(1300.5));
    assert_eq!(cell(&report, 4, 6), Data::Float(0.0));
    assert_eq!(cell(&report, 7, 6), Data::Float(7.0));
    assert_eq!(cell(&report, 8, 6), Data::Float(0.0));
    // Point table: day 1 in B, so day 5 in F; "пп Зуевка" matches "Зуевка".
    assert_eq!(cell(&report, 10, 6), Data::Float(1200.5));
    // Neighbouring days are untouched.
    assert_eq!(cell(&report, 3, 5), Data::Empty);
}

#[test]
fn run_warns_about_unmapped_region() {
    let fx = Fixture::new();
    let out = fx.run(&["--day", "1"]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Новосибирская"), "stderr: {stderr}");
}

#[test]
fn dry_run_leaves_report_unchanged() {
    let fx = Fixture::new();
    let before = std::fs::read(fx.path("report.xlsx")).expect("read report");
    let out = fx.run(&["--day", "5", "--dry-run"]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("would write"), "stderr: {stderr}");
    assert_eq!(
        std::fs::read(fx.path("report.xlsx")).expect("read report"),
        before
    );
}

#[test]
fn missing_sheet_exits_1() {
    let fx = Fixture::new();
    let out = fx.run(&["--day", "5", "--sheet", "Отчет"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Отчет"), "stderr: {stderr}");
}

#[test]
fn day_out_of_range_is_usage_error() {
    let fx = Fixture::new();
    let out = fx.run(&["--day", "32"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn invalid_config_exits_1_before_touching_report() {
    let fx = Fixture::new();
    std::fs::write(fx.path("config.json"), r#"{"grouping_method": "region"}"#)
        .expect("write config");
    let before = std::fs::read(fx.path("report.xlsx")).expect("read report");
    let out = fx.run(&["--day", "5"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("source_columns"), "stderr: {stderr}");
    assert_eq!(
        std::fs::read(fx.path("report.xlsx")).expect("read report"),
        before
    );
}

#[test]
fn missing_config_file_exits_2() {
    let fx = Fixture::new();
    std::fs::remove_file(fx.path("config.json")).expect("remove config");
    let out = fx.run(&["--day", "5"]);
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn log_file_receives_events() {
    let fx = Fixture::new();
    let log = fx.path("run.log");
    let out = fx.run(&["--day", "2", "--log-file", log.to_str().expect("utf-8 path")]);
    assert!(out.status.success());
    let text = std::fs::read_to_string(&log).expect("read log");
    assert!(text.contains("report update finished"), "log: {text}");
    assert!(!text.contains('\u{1b}'), "log file must not carry ANSI escapes");
}
