#![deny(clippy::print_stdout, clippy::print_stderr)]

pub mod aggregate;
pub mod config;
pub mod layout;
pub mod newtypes;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod sheet;
pub mod source;
pub mod validation;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use aggregate::{Aggregate, Totals};
pub use config::{
    Config, ConfigError, GroupingMethod, MeasureType, PointTable, RegionTable, SourceColumns,
};
pub use layout::{
    LayoutError, cell_ref, checked_range, column_index, column_letters, find_day_column,
    point_day_column,
};
pub use newtypes::{Day, NewtypeError};
pub use normalize::{fold_confusable, normalize, normalize_cell};
pub use pipeline::{PipelineError, update_sheet};
pub use report::{CellWrite, UpdateReport, UpdateWarning};
pub use resolve::{GroupKey, MappingIndex, Resolver, extract_surname};
pub use sheet::{CellValue, GridSheet, Sheet, format_number};
pub use source::{SourceRow, SourceTable, parse_measure};
pub use validation::validate_config;
pub use writer::{DEFAULT_VALUE, POINT_PREFIX, PointIndex, write_point_table, write_region_table};

/// Returns the version of the reportfill-core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
