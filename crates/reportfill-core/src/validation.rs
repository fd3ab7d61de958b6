/// Presence checks for an untyped configuration value.
///
/// [`validate_config`] answers one question: are all required sections and
/// fields there? It does not check types or ranges; those surface when the
/// value is deserialized or when a table is located on the sheet. Every
/// problem is reported, not just the first one.
use serde_json::{Map, Value};

/// Top-level sections every configuration must declare.
pub const REQUIRED_SECTIONS: [&str; 3] = ["region_tables", "new_points_tables", "source_columns"];

/// Logical columns every `source_columns` section must declare.
pub const REQUIRED_SOURCE_COLUMNS: [&str; 5] =
    ["region", "manager", "point", "bms_sales", "fms_sales"];

/// Fields shared by both table kinds.
const COMMON_TABLE_FIELDS: [&str; 2] = ["name", "type"];

/// Fields specific to sector tables.
pub const REGION_TABLE_FIELDS: [&str; 6] = [
    "day_row",
    "data_start_row",
    "data_end_row",
    "region_col",
    "day_start_col",
    "day_end_col",
];

/// Fields specific to point tables.
pub const POINT_TABLE_FIELDS: [&str; 4] = ["start_row", "end_row", "point_col", "data_col"];

/// Which kind of table descriptor is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableKind {
    Region,
    Point,
}

impl TableKind {
    fn section(self) -> &'static str {
        match self {
            Self::Region => "region_tables",
            Self::Point => "new_points_tables",
        }
    }

    fn specific_fields(self) -> &'static [&'static str] {
        match self {
            Self::Region => &REGION_TABLE_FIELDS,
            Self::Point => &POINT_TABLE_FIELDS,
        }
    }
}

/// Returns one message per missing section or field; empty means valid.
pub fn validate_config(config: &Value) -> Vec<String> {
    let Some(root) = config.as_object() else {
        return vec!["configuration must be a JSON object".to_owned()];
    };

    let mut errors = Vec::new();
    for section in REQUIRED_SECTIONS {
        if !root.contains_key(section) {
            errors.push(format!("missing required section: {section}"));
        }
    }

    if let Some(columns) = root.get("source_columns").and_then(Value::as_object) {
        for column in REQUIRED_SOURCE_COLUMNS {
            if !columns.contains_key(column) {
                errors.push(format!("source_columns: missing required column {column}"));
            }
        }
    }

    for kind in [TableKind::Region, TableKind::Point] {
        if let Some(tables) = root.get(kind.section()).and_then(Value::as_array) {
            for (index, table) in tables.iter().enumerate() {
                check_table(kind, index, table, &mut errors);
            }
        }
    }

    errors
}

fn check_table(kind: TableKind, index: usize, table: &Value, errors: &mut Vec<String>) {
    let Some(fields) = table.as_object() else {
        errors.push(format!("{}[{index}]: expected a table object", kind.section()));
        return;
    };
    let label = table_label(kind, index, fields);
    for field in COMMON_TABLE_FIELDS
        .iter()
        .chain(kind.specific_fields().iter())
    {
        if !fields.contains_key(*field) {
            errors.push(format!("{label}: missing field {field}"));
        }
    }
}

/// `table "ЛЧМ по секторам"` when the table is named, `region_tables[2]` otherwise.
fn table_label(kind: TableKind, index: usize, fields: &Map<String, Value>) -> String {
    match fields.get("name").and_then(Value::as_str) {
        Some(name) if !name.trim().is_empty() => format!("table {name:?}"),
        Some(_) | None => format!("{}[{index}]", kind.section()),
    }
}
