//! Clap CLI definition: root struct, subcommands, and shared argument types.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use reportfill_core::{Day, GroupingMethod, MeasureType};
use reportfill_excel::DEFAULT_SHEET;

/// Which mapping a `mapping` subcommand edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MappingKind {
    /// Manager surname → sector.
    Manager,
    /// Region → sector.
    Region,
}

impl From<MappingKind> for GroupingMethod {
    fn from(kind: MappingKind) -> Self {
        match kind {
            MappingKind::Manager => Self::Manager,
            MappingKind::Region => Self::Region,
        }
    }
}

/// Measure written into a table (`--type`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MeasureArg {
    /// Ferrous intake.
    Bms,
    /// Non-ferrous intake.
    Fms,
}

impl From<MeasureArg> for MeasureType {
    fn from(arg: MeasureArg) -> Self {
        match arg {
            MeasureArg::Bms => Self::Bms,
            MeasureArg::Fms => Self::Fms,
        }
    }
}

/// Logical source field whose header text `config set column` changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColumnField {
    /// Region of the intake point.
    Region,
    /// Responsible manager.
    Manager,
    /// Intake point name.
    Point,
    /// Ferrous measure.
    BmsSales,
    /// Non-ferrous measure.
    FmsSales,
}

/// Parses `--day`, accepting 1 to 31.
fn parse_day(s: &str) -> Result<Day, String> {
    let n: u32 = s
        .trim()
        .parse()
        .map_err(|_| format!("{s:?} is not a day number"))?;
    Day::try_from(n).map_err(|e| e.to_string())
}

/// All top-level subcommands exposed by the `reportfill` binary.
#[derive(Subcommand)]
pub enum Command {
    /// Write one day of figures from a sales export into a report workbook.
    Run {
        /// Sales export (.xlsx, .xls or .ods); the first sheet is read.
        #[arg(value_name = "SOURCE")]
        source: PathBuf,
        /// Report workbook (.xlsx) updated in place.
        #[arg(value_name = "REPORT")]
        report: PathBuf,
        /// Day of the month (1-31) selecting the target column.
        #[arg(long, value_parser = parse_day)]
        day: Day,
        /// Sheet of the report to update.
        #[arg(long, default_value = DEFAULT_SHEET)]
        sheet: String,
        /// Compute and log every write without saving the report.
        #[arg(long)]
        dry_run: bool,
    },

    /// Create, check or print the configuration file.
    Config {
        /// Configuration action.
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// List, edit, import or export the name → sector mappings.
    Mapping {
        /// Mapping action.
        #[command(subcommand)]
        action: MappingAction,
    },
}

/// Subcommands of `reportfill config`.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write the built-in default configuration to the configuration path.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Check the configuration for missing sections and fields.
    Validate,
    /// Print the effective configuration as JSON.
    Show,
    /// Change the grouping method or a source column header.
    Set {
        /// Setting to change.
        #[command(subcommand)]
        target: SetTarget,
    },
    /// List, add, replace or remove report tables.
    Table {
        /// Table action.
        #[command(subcommand)]
        action: TableAction,
    },
    /// Edit the point names accepted by a point table.
    Points {
        /// Point list action.
        #[command(subcommand)]
        action: PointsAction,
    },
}

/// Subcommands of `reportfill config set`.
#[derive(Subcommand)]
pub enum SetTarget {
    /// Resolve rows to sectors by manager surname or by region.
    GroupingMethod {
        /// New grouping method.
        #[arg(value_enum)]
        method: MappingKind,
    },
    /// Set the header text of one source column.
    Column {
        /// Logical field.
        #[arg(value_enum)]
        field: ColumnField,
        /// Header text as it appears in the export.
        #[arg(value_name = "HEADER")]
        header: String,
    },
}

/// Layout of a sector table.
#[derive(Args)]
pub struct RegionTableArgs {
    /// Table name; an existing table with this name is replaced.
    #[arg(long)]
    pub name: String,
    /// Measure written into the table.
    #[arg(long = "type", value_enum)]
    pub measure: MeasureArg,
    /// Row holding the day numbers.
    #[arg(long)]
    pub day_row: u32,
    /// First data row.
    #[arg(long)]
    pub data_start_row: u32,
    /// Last data row.
    #[arg(long)]
    pub data_end_row: u32,
    /// Column holding sector labels.
    #[arg(long)]
    pub region_col: String,
    /// First column of the day header range.
    #[arg(long)]
    pub day_start_col: String,
    /// Last column of the day header range.
    #[arg(long)]
    pub day_end_col: String,
}

/// Layout of a point table.
#[derive(Args)]
pub struct PointTableArgs {
    /// Table name; an existing table with this name is replaced.
    #[arg(long)]
    pub name: String,
    /// Measure written into the table.
    #[arg(long = "type", value_enum)]
    pub measure: MeasureArg,
    /// First row.
    #[arg(long)]
    pub start_row: u32,
    /// Last row.
    #[arg(long)]
    pub end_row: u32,
    /// Column holding point labels.
    #[arg(long)]
    pub point_col: String,
    /// Column of day 1.
    #[arg(long)]
    pub data_col: String,
    /// Accepted point name (repeatable). Replacing a table without any
    /// keeps its current list.
    #[arg(long = "point", value_name = "NAME")]
    pub points: Vec<String>,
}

/// Subcommands of `reportfill config table`.
#[derive(Subcommand)]
pub enum TableAction {
    /// Print one line per table: kind, measure and name.
    List,
    /// Add or replace a sector table.
    AddRegion(RegionTableArgs),
    /// Add or replace a point table.
    AddPoints(PointTableArgs),
    /// Remove every table with this name.
    Remove {
        /// Table name.
        #[arg(value_name = "TABLE")]
        name: String,
    },
}

/// Subcommands of `reportfill config points`.
#[derive(Subcommand)]
pub enum PointsAction {
    /// Print the accepted point names, one per line.
    List {
        /// Point table name.
        #[arg(value_name = "TABLE")]
        table: String,
    },
    /// Accept one more point name.
    Add {
        /// Point table name.
        #[arg(value_name = "TABLE")]
        table: String,
        /// Point name.
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Stop accepting a point name (matched exactly, then by normalized form).
    Remove {
        /// Point table name.
        #[arg(value_name = "TABLE")]
        table: String,
        /// Point name.
        #[arg(value_name = "NAME")]
        name: String,
    },
    /// Change the spelling of an accepted point name.
    Rename {
        /// Point table name.
        #[arg(value_name = "TABLE")]
        table: String,
        /// Current name.
        #[arg(value_name = "OLD")]
        old: String,
        /// New name.
        #[arg(value_name = "NEW")]
        new: String,
    },
}

/// Subcommands of `reportfill mapping`.
#[derive(Subcommand)]
pub enum MappingAction {
    /// Print the entries of one mapping as `key;sector` lines.
    List {
        /// Mapping to print.
        #[arg(value_enum)]
        kind: MappingKind,
    },
    /// Add or replace one entry.
    Set {
        /// Mapping to edit.
        #[arg(value_enum)]
        kind: MappingKind,
        /// Manager surname or region name.
        #[arg(value_name = "KEY")]
        key: String,
        /// Sector label written in the report.
        #[arg(value_name = "SECTOR")]
        sector: String,
    },
    /// Remove one entry (matched exactly, then by normalized form).
    Remove {
        /// Mapping to edit.
        #[arg(value_enum)]
        kind: MappingKind,
        /// Manager surname or region name.
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Replace mappings from a `;`-separated Windows-1251 CSV or a workbook
    /// with `manager`/`region` and `sector` columns.
    Import {
        /// File to import.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Write `<stem>_managers.csv` and `<stem>_regions.csv`.
    Export {
        /// Base path of the exported files.
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Root CLI struct.
#[derive(Parser)]
#[command(
    name = "reportfill",
    version,
    about = "Fill daily sales figures into spreadsheet reports",
    long_about = "Reads a daily sales export, resolves managers or regions to sectors,\n\
                  sums the two sales measures and writes them into the day column of\n\
                  the tables declared in the configuration."
)]
pub struct Cli {
    /// Active subcommand.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file. Without it, ./config.json, the executable's
    /// directory and the home directory are searched in that order.
    #[arg(long, short = 'c', global = true, env = "REPORTFILL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Only log warnings and errors (incompatible with `--verbose`).
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail such as located columns (incompatible with `--quiet`).
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Also append log output to this file.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}
