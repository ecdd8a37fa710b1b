//! Error types for the transform pipeline.
//!
//! Every error is local to a single request: load failures reject that
//! upload, filter failures abort that filter application, and neither
//! touches a previously stored table.

use thiserror::Error;

use crate::filter::FilterOperator;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors surfaced by the tabular transform core.
#[derive(Error, Debug)]
pub enum TableError {
    /// Input was empty, or parsed to a table with no rows and no columns.
    /// Header-only input (columns but zero rows) is not empty.
    #[error("input is empty")]
    EmptyInput,

    /// Input could not be parsed as delimited tabular text.
    #[error("unable to parse delimited input: {0}")]
    MalformedInput(String),

    /// A numeric comparison was requested with a literal that does not
    /// parse as a number. Aborts the whole filter application.
    #[error("filter value '{value}' is not numeric for operator '{operator}'")]
    NonNumericFilterValue {
        value: String,
        operator: FilterOperator,
    },

    /// An operator name from the request payload is not recognized.
    #[error("unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// Engine fault while evaluating a table operation.
    #[error(transparent)]
    Engine(#[from] polars::prelude::PolarsError),
}
