/// Import and export of the name → sector mappings.
///
/// The exchange format is the one spreadsheet users already keep: a
/// semicolon-separated CSV in Windows-1251, or an `.xlsx`/`.xls` sheet, with a
/// header row naming `manager` + `sector` and/or `region` + `sector`. A file
/// may carry both key columns, in which case both mappings are imported from
/// the same rows.
///
/// Export writes one file per non-empty mapping next to the requested path:
/// `report.csv` becomes `report_managers.csv` and `report_regions.csv`.
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1251;

use reportfill_core::{Config, GroupingMethod};

use crate::error::ExcelError;
use crate::source::read_first_sheet;

/// Field delimiter of mapping CSV files.
pub const CSV_DELIMITER: u8 = b';';

const KEY_MANAGER: &str = "manager";
const KEY_REGION: &str = "region";
const KEY_SECTOR: &str = "sector";

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Mappings read from a file. `None` means the file had no column for that
/// mapping, so the existing one should be kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedMappings {
    /// Manager surname → sector, if the file had a `manager` column.
    pub managers: Option<BTreeMap<String, String>>,
    /// Region → sector, if the file had a `region` column.
    pub regions: Option<BTreeMap<String, String>>,
}

impl ImportedMappings {
    /// Replaces each imported mapping in `config` wholesale.
    ///
    /// Returns the methods whose mapping was replaced.
    pub fn apply(self, config: &mut Config) -> Vec<GroupingMethod> {
        let mut replaced = Vec::new();
        if let Some(managers) = self.managers {
            config.manager_mapping = managers;
            replaced.push(GroupingMethod::Manager);
        }
        if let Some(regions) = self.regions {
            config.region_mapping = regions;
            replaced.push(GroupingMethod::Region);
        }
        replaced
    }
}

/// Reads mappings from a `.csv` (Windows-1251, `;`) or spreadsheet file.
///
/// Rows with a blank key or sector are skipped. A later row with the same key
/// overrides an earlier one.
///
/// # Errors
///
/// Returns [`ExcelError::MappingColumns`] if neither key column is present,
/// and I/O, CSV or workbook errors from reading the file.
pub fn import_mappings(path: &Path) -> Result<ImportedMappings, ExcelError> {
    let rows: Vec<Vec<String>> = if is_csv(path) {
        read_csv_rows(path)?
    } else {
        read_first_sheet(path)?
            .into_iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    };

    let mut rows = rows.into_iter();
    let header: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();
    let position = |name: &str| header.iter().position(|h| h == name);
    let (sector, manager, region) = (
        position(KEY_SECTOR),
        position(KEY_MANAGER),
        position(KEY_REGION),
    );
    let Some(sector) = sector.filter(|_| manager.is_some() || region.is_some()) else {
        return Err(mapping_columns_error(path, header));
    };

    let mut imported = ImportedMappings {
        managers: manager.map(|_| BTreeMap::new()),
        regions: region.map(|_| BTreeMap::new()),
    };
    for row in rows {
        let field = |index: usize| row.get(index).map_or("", |s| s.trim());
        let sector_name = field(sector);
        if sector_name.is_empty() {
            continue;
        }
        for (column, target) in [
            (manager, imported.managers.as_mut()),
            (region, imported.regions.as_mut()),
        ] {
            if let (Some(column), Some(target)) = (column, target) {
                let key = field(column);
                if !key.is_empty() {
                    target.insert(key.to_owned(), sector_name.to_owned());
                }
            }
        }
    }

    tracing::info!(
        path = %path.display(),
        managers = imported.managers.as_ref().map_or(0, BTreeMap::len),
        regions = imported.regions.as_ref().map_or(0, BTreeMap::len),
        "imported mappings"
    );
    Ok(imported)
}

fn read_csv_rows(path: &Path) -> Result<Vec<Vec<String>>, ExcelError> {
    let bytes = std::fs::read(path).map_err(|source| ExcelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    // A UTF-8 BOM switches decoding to UTF-8.
    let (text, encoding, had_errors) = WINDOWS_1251.decode(&bytes);
    if had_errors {
        tracing::warn!(path = %path.display(), encoding = encoding.name(), "undecodable bytes replaced");
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(CSV_DELIMITER)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ExcelError::Csv {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        rows.push(record.iter().map(str::to_owned).collect());
    }
    Ok(rows)
}

fn mapping_columns_error(path: &Path, found: Vec<String>) -> ExcelError {
    ExcelError::MappingColumns {
        path: path.display().to_string(),
        found,
    }
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// The two files an export to `path` produces: `<stem>_managers.csv` and
/// `<stem>_regions.csv` in the same directory.
pub fn export_paths(path: &Path) -> (PathBuf, PathBuf) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sibling = |suffix: &str| path.with_file_name(format!("{stem}_{suffix}.csv"));
    (sibling("managers"), sibling("regions"))
}

/// Writes each non-empty mapping of `config` as a Windows-1251 CSV.
///
/// Returns the files written.
///
/// # Errors
///
/// Returns CSV or I/O errors from writing.
pub fn export_mappings(config: &Config, path: &Path) -> Result<Vec<PathBuf>, ExcelError> {
    let (managers_path, regions_path) = export_paths(path);
    let mut written = Vec::new();
    for (mapping, key, target) in [
        (&config.manager_mapping, KEY_MANAGER, managers_path),
        (&config.region_mapping, KEY_REGION, regions_path),
    ] {
        if mapping.is_empty() {
            continue;
        }
        write_mapping_csv(mapping, key, &target)?;
        tracing::info!(path = %target.display(), entries = mapping.len(), "exported mapping");
        written.push(target);
    }
    Ok(written)
}

fn write_mapping_csv(
    mapping: &BTreeMap<String, String>,
    key: &str,
    path: &Path,
) -> Result<(), ExcelError> {
    let csv_error = |detail: String| ExcelError::Csv {
        path: path.display().to_string(),
        detail,
    };
    let mut writer = csv::WriterBuilder::new()
        .delimiter(CSV_DELIMITER)
        .from_writer(Vec::new());
    writer
        .write_record([key, KEY_SECTOR])
        .map_err(|e| csv_error(e.to_string()))?;
    for (name, sector) in mapping {
        writer
            .write_record([name, sector])
            .map_err(|e| csv_error(e.to_string()))?;
    }
    let utf8 = writer.into_inner().map_err(|e| csv_error(e.to_string()))?;
    let text = String::from_utf8(utf8).map_err(|e| csv_error(e.to_string()))?;

    let (bytes, _, unmappable) = WINDOWS_1251.encode(&text);
    if unmappable {
        tracing::warn!(path = %path.display(), "characters outside Windows-1251 written as numeric references");
    }
    std::fs::write(path, &bytes).map_err(|source| ExcelError::Io {
        path: path.display().to_string(),
        source,
    })
}
