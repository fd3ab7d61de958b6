/// Typed run configuration.
///
/// The on-disk form is JSON. Loading goes through three stages so that a
/// broken file is reported field by field instead of as a single serde error:
///
/// 1. Parse the text into an untyped [`serde_json::Value`].
/// 2. Run the presence checks in [`crate::validation::validate_config`].
/// 3. Deserialize into [`Config`]; enum values (`grouping_method`, table
///    `type`) and numeric fields are checked here.
///
/// `source_columns` keeps the header spellings exactly as the user typed them;
/// they are normalized when [`crate::source::SourceTable::records`] matches
/// them against the export's headers.
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalize::normalize;
use crate::validation::validate_config;

/// The built-in configuration shipped with the tool.
const DEFAULT_CONFIG_JSON: &str = include_str!("default_config.json");

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors raised while loading or serializing a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The text is not valid JSON, or a present field has the wrong type or
    /// an unknown enum value.
    Json {
        /// The serde error message.
        detail: String,
    },
    /// Required sections or fields are missing.
    Invalid {
        /// One human-readable line per problem.
        diagnostics: Vec<String>,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { detail } => write!(f, "malformed configuration: {detail}"),
            Self::Invalid { diagnostics } => write!(
                f,
                "configuration has {} problem(s):\n{}",
                diagnostics.len(),
                diagnostics.join("\n")
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which of the two sales measures a table reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureType {
    /// Ferrous scrap intake (the `bms_sales` source column).
    Bms,
    /// Non-ferrous scrap intake (the `fms_sales` source column).
    Fms,
}

impl fmt::Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bms => f.write_str("bms"),
            Self::Fms => f.write_str("fms"),
        }
    }
}

/// How source rows are assigned to sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMethod {
    /// Surname of the row's manager, looked up in `manager_mapping`.
    Manager,
    /// The row's region, looked up in `region_mapping`.
    #[default]
    Region,
}

impl fmt::Display for GroupingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manager => f.write_str("manager"),
            Self::Region => f.write_str("region"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Logical source field → header text in the incoming export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceColumns {
    /// Region of the intake point.
    pub region: String,
    /// Full name of the responsible manager.
    pub manager: String,
    /// Intake point name.
    pub point: String,
    /// Ferrous measure column.
    pub bms_sales: String,
    /// Non-ferrous measure column.
    pub fms_sales: String,
}

impl SourceColumns {
    /// All `(logical name, header)` pairs in declaration order.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("region", &self.region),
            ("manager", &self.manager),
            ("point", &self.point),
            ("bms_sales", &self.bms_sales),
            ("fms_sales", &self.fms_sales),
        ]
    }
}

/// A report block where the day selects the column and the sector label in
/// `region_col` selects the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTable {
    /// Display name used in logs.
    pub name: String,
    /// Measure written into this table.
    #[serde(rename = "type")]
    pub measure: MeasureType,
    /// Row holding the day numbers.
    pub day_row: u32,
    /// First data row (inclusive).
    pub data_start_row: u32,
    /// Last data row (inclusive).
    pub data_end_row: u32,
    /// Column holding sector labels.
    pub region_col: String,
    /// First column of the day header range.
    pub day_start_col: String,
    /// Last column of the day header range.
    pub day_end_col: String,
}

/// A report block with one row per intake point and one column per day,
/// starting at `data_col` for day 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointTable {
    /// Display name used in logs.
    pub name: String,
    /// Measure written into this table.
    #[serde(rename = "type")]
    pub measure: MeasureType,
    /// Point names accepted in this table. Rows are matched by label, not by
    /// position in this list.
    #[serde(default)]
    pub point_names: Vec<String>,
    /// First row (inclusive).
    pub start_row: u32,
    /// Last row (inclusive).
    pub end_row: u32,
    /// Column holding point labels.
    pub point_col: String,
    /// Column of day 1.
    pub data_col: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// The full configuration for one update run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Sector tables, processed in order.
    #[serde(default)]
    pub region_tables: Vec<RegionTable>,
    /// Point tables, processed after all sector tables.
    #[serde(default)]
    pub new_points_tables: Vec<PointTable>,
    /// Header spellings of the source export.
    pub source_columns: SourceColumns,
    /// Which mapping drives sector resolution.
    #[serde(default)]
    pub grouping_method: GroupingMethod,
    /// Manager surname → sector.
    #[serde(default)]
    pub manager_mapping: BTreeMap<String, String>,
    /// Region name → sector.
    #[serde(default)]
    pub region_mapping: BTreeMap<String, String>,
}

impl Config {
    /// Parses and validates a configuration from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed JSON or values of the wrong
    /// type, and [`ConfigError::Invalid`] when required fields are missing.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ConfigError::Json {
                detail: e.to_string(),
            })?;
        Self::from_value(value)
    }

    /// Validates and converts an already-parsed JSON value.
    ///
    /// # Errors
    ///
    /// See [`Config::from_json`].
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let diagnostics = validate_config(&value);
        if !diagnostics.is_empty() {
            return Err(ConfigError::Invalid { diagnostics });
        }
        serde_json::from_value(value).map_err(|e| ConfigError::Json {
            detail: e.to_string(),
        })
    }

    /// Serializes to pretty-printed JSON (4-space indent, non-ASCII verbatim).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser).map_err(|e| ConfigError::Json {
            detail: e.to_string(),
        })?;
        String::from_utf8(out).map_err(|e| ConfigError::Json {
            detail: e.to_string(),
        })
    }

    /// The built-in default configuration.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled template is itself broken.
    pub fn default_template() -> Result<Self, ConfigError> {
        Self::from_json(DEFAULT_CONFIG_JSON)
    }

    /// The mapping consulted under `method`.
    pub fn mapping(&self, method: GroupingMethod) -> &BTreeMap<String, String> {
        match method {
            GroupingMethod::Manager => &self.manager_mapping,
            GroupingMethod::Region => &self.region_mapping,
        }
    }

    /// Mutable access to the mapping consulted under `method`.
    pub fn mapping_mut(&mut self, method: GroupingMethod) -> &mut BTreeMap<String, String> {
        match method {
            GroupingMethod::Manager => &mut self.manager_mapping,
            GroupingMethod::Region => &mut self.region_mapping,
        }
    }

    /// Inserts or replaces one mapping entry; returns the previous sector.
    ///
    /// Keys and sectors are trimmed. Nothing is stored when either is blank.
    pub fn set_mapping(
        &mut self,
        method: GroupingMethod,
        key: &str,
        sector: &str,
    ) -> Option<String> {
        let key = key.trim();
        let sector = sector.trim();
        if key.is_empty() || sector.is_empty() {
            return None;
        }
        self.mapping_mut(method)
            .insert(key.to_owned(), sector.to_owned())
    }

    /// Removes one mapping entry.
    ///
    /// The key is matched exactly first and then by normalized form, so a
    /// user can remove `"Иванов"` by typing `"ИВАНОВ"`.
    pub fn remove_mapping(&mut self, method: GroupingMethod, key: &str) -> Option<String> {
        let mapping = self.mapping_mut(method);
        if let Some(sector) = mapping.remove(key) {
            return Some(sector);
        }
        let wanted = normalize(key);
        let existing = mapping.keys().find(|k| normalize(k) == wanted)?.clone();
        mapping.remove(&existing)
    }

    /// Adds a sector table, or replaces the one with the same name in place.
    ///
    /// Returns `true` if an existing table was replaced.
    pub fn upsert_region_table(&mut self, table: RegionTable) -> bool {
        match self.region_tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => {
                *existing = table;
                true
            }
            None => {
                self.region_tables.push(table);
                false
            }
        }
    }

    /// Adds a point table, or replaces the one with the same name in place.
    ///
    /// A replacement keeps the old `point_names` when the new table has none.
    /// Returns `true` if an existing table was replaced.
    pub fn upsert_point_table(&mut self, mut table: PointTable) -> bool {
        match self.new_points_tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => {
                if table.point_names.is_empty() {
                    table.point_names = std::mem::take(&mut existing.point_names);
                }
                *existing = table;
                true
            }
            None => {
                self.new_points_tables.push(table);
                false
            }
        }
    }

    /// Removes every table, of either kind, called `name`.
    ///
    /// Returns the number of tables removed.
    pub fn remove_table(&mut self, name: &str) -> usize {
        let before = self.region_tables.len() + self.new_points_tables.len();
        self.region_tables.retain(|t| t.name != name);
        self.new_points_tables.retain(|t| t.name != name);
        before - self.region_tables.len() - self.new_points_tables.len()
    }

    /// The point table called `name`.
    pub fn point_table_mut(&mut self, name: &str) -> Option<&mut PointTable> {
        self.new_points_tables.iter_mut().find(|t| t.name == name)
    }
}

impl PointTable {
    /// Appends `name` to `point_names`.
    ///
    /// Returns `false`, leaving the list unchanged, when the name is blank or
    /// its normalized form is already listed.
    pub fn add_point(&mut self, name: &str) -> bool {
        let name = name.trim();
        let wanted = normalize(name);
        if wanted.is_empty() || self.point_names.iter().any(|p| normalize(p) == wanted) {
            return false;
        }
        self.point_names.push(name.to_owned());
        true
    }

    /// Removes a point, matched exactly first and then by normalized form.
    pub fn remove_point(&mut self, name: &str) -> Option<String> {
        let index = self.point_position(name)?;
        Some(self.point_names.remove(index))
    }

    /// Replaces the spelling of one listed point, keeping its position.
    ///
    /// Returns the old spelling, or `None` if `old` is not listed or `new` is
    /// blank.
    pub fn rename_point(&mut self, old: &str, new: &str) -> Option<String> {
        let new = new.trim();
        if new.is_empty() {
            return None;
        }
        let index = self.point_position(old)?;
        self.point_names
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, new.to_owned()))
    }

    fn point_position(&self, name: &str) -> Option<usize> {
        self.point_names.iter().position(|p| p == name).or_else(|| {
            let wanted = normalize(name);
            self.point_names.iter().position(|p| normalize(p) == wanted)
        })
    }
}
