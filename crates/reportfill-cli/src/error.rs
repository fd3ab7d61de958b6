/// CLI error types with associated exit codes.
///
/// [`CliError`] is the top-level error type for the `reportfill` binary. Every
/// variant maps to a stable exit code (1 or 2) via [`CliError::exit_code`]:
///
/// - Exit code **2**: input failure. A file could not be read, a workbook
///   could not be opened, or an argument was unusable.
/// - Exit code **1**: logical failure. The inputs were readable but the
///   configuration is invalid or the update did not complete.
use std::fmt;
use std::path::PathBuf;

use reportfill_excel::ExcelError;

// ---------------------------------------------------------------------------
// CliError
// ---------------------------------------------------------------------------

/// All error conditions that the `reportfill` CLI can produce.
#[derive(Debug)]
pub enum CliError {
    // --- Exit code 2: input failures ---
    /// A file argument could not be found on the filesystem.
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// The process lacks permission to read or write a file.
    PermissionDenied {
        /// The path that could not be accessed.
        path: PathBuf,
    },

    /// The configuration file is larger than the loader accepts.
    FileTooLarge {
        /// The offending path.
        path: PathBuf,
        /// The size limit in bytes.
        limit: u64,
        /// The actual size in bytes.
        actual: u64,
    },

    /// A generic I/O error not covered by the more specific variants above.
    IoError {
        /// A human-readable label for the file.
        source: String,
        /// The underlying I/O error message.
        detail: String,
    },

    /// The configuration file is not well-formed JSON.
    ConfigParse {
        /// The configuration path.
        path: PathBuf,
        /// The parser message.
        detail: String,
    },

    /// A command-line value was rejected after parsing.
    InvalidArgument {
        /// What was wrong with it.
        detail: String,
    },

    /// A workbook or mapping file could not be read or written.
    Excel(ExcelError),

    // --- Exit code 1: logical failures ---
    /// The configuration is missing required sections or fields.
    InvalidConfig {
        /// The configuration path.
        path: PathBuf,
        /// One line per problem.
        diagnostics: Vec<String>,
    },

    /// `config init` would overwrite an existing file.
    ConfigExists {
        /// The existing file.
        path: PathBuf,
    },

    /// The update run did not complete. Details have already been logged.
    UpdateFailed,

    /// `mapping remove` found no matching entry.
    MappingKeyNotFound {
        /// Which mapping was searched.
        kind: String,
        /// The key that was requested.
        key: String,
    },

    /// No table, or no point table, has the requested name.
    TableNotFound {
        /// The requested table name.
        name: String,
    },

    /// The point table does not list the requested point.
    PointNotFound {
        /// Point table name.
        table: String,
        /// The requested point.
        name: String,
    },

    /// The point table already lists the point (compared in normalized form).
    PointExists {
        /// Point table name.
        table: String,
        /// The point that was added.
        name: String,
    },
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::FileNotFound { .. }
            | Self::PermissionDenied { .. }
            | Self::FileTooLarge { .. }
            | Self::IoError { .. }
            | Self::ConfigParse { .. }
            | Self::InvalidArgument { .. }
            | Self::Excel(_) => 2,

            Self::InvalidConfig { .. }
            | Self::ConfigExists { .. }
            | Self::UpdateFailed
            | Self::MappingKeyNotFound { .. }
            | Self::TableNotFound { .. }
            | Self::PointNotFound { .. }
            | Self::PointExists { .. } => 1,
        }
    }

    /// Returns a human-readable error message suitable for printing to stderr.
    pub fn message(&self) -> String {
        match self {
            Self::FileNotFound { path } => {
                format!("error: file not found: {}", path.display())
            }
            Self::PermissionDenied { path } => {
                format!("error: permission denied: {}", path.display())
            }
            Self::FileTooLarge {
                path,
                limit,
                actual,
            } => format!(
                "error: file too large: {} is {actual} bytes, limit is {limit} bytes",
                path.display()
            ),
            Self::IoError { source, detail } => {
                format!("error: I/O error on {source}: {detail}")
            }
            Self::ConfigParse { path, detail } => {
                format!("error: cannot parse {}: {detail}", path.display())
            }
            Self::InvalidArgument { detail } => format!("error: {detail}"),
            Self::Excel(e) => format!("error: {e}"),
            Self::InvalidConfig { path, diagnostics } => {
                let mut msg = format!(
                    "error: invalid configuration {} ({} problem(s))",
                    path.display(),
                    diagnostics.len()
                );
                for line in diagnostics {
                    msg.push_str("\n  ");
                    msg.push_str(line);
                }
                msg
            }
            Self::ConfigExists { path } => format!(
                "error: {} already exists (use --force to overwrite)",
                path.display()
            ),
            Self::UpdateFailed => "error: report update failed, see log for details".to_owned(),
            Self::MappingKeyNotFound { kind, key } => {
                format!("error: no {kind} mapping entry for {key:?}")
            }
            Self::TableNotFound { name } => format!("error: no table named {name:?}"),
            Self::PointNotFound { table, name } => {
                format!("error: table {table:?} does not list point {name:?}")
            }
            Self::PointExists { table, name } => {
                format!("error: table {table:?} already lists point {name:?}")
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for CliError {}

impl From<ExcelError> for CliError {
    fn from(e: ExcelError) -> Self {
        Self::Excel(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
