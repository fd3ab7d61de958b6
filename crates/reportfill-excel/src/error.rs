/// Errors produced by the spreadsheet adapters.
use reportfill_core::PipelineError;

/// Every failure that can stop a run or a mapping import/export.
///
/// Paths are carried as display strings so the messages can be logged as-is.
#[derive(Debug, thiserror::Error)]
pub enum ExcelError {
    /// A workbook could not be opened or parsed.
    #[error("cannot open workbook {path}: {detail}")]
    Open {
        /// The workbook path.
        path: String,
        /// Library error text.
        detail: String,
    },

    /// The source workbook has no worksheet to read.
    #[error("workbook {path} contains no worksheets")]
    NoWorksheet {
        /// The workbook path.
        path: String,
    },

    /// The report workbook has no sheet with the requested name.
    #[error("sheet {sheet:?} not found (available: {})", .available.join(", "))]
    MissingSheet {
        /// The requested sheet name.
        sheet: String,
        /// Sheet names present in the workbook.
        available: Vec<String>,
    },

    /// Writing the updated report failed.
    #[error("cannot save workbook {path}: {detail}")]
    Save {
        /// The workbook path.
        path: String,
        /// Library error text.
        detail: String,
    },

    /// A plain file operation failed.
    #[error("{path}: {source}")]
    Io {
        /// The file involved.
        path: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A mapping CSV could not be read or written.
    #[error("{path}: invalid CSV: {detail}")]
    Csv {
        /// The CSV path.
        path: String,
        /// Parser or writer error text.
        detail: String,
    },

    /// A mapping file has neither `manager`+`sector` nor `region`+`sector`
    /// columns.
    #[error("{path}: expected columns manager;sector and/or region;sector, found {found:?}")]
    MappingColumns {
        /// The mapping file path.
        path: String,
        /// The headers that were found.
        found: Vec<String>,
    },

    /// The update pipeline rejected the source data.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
