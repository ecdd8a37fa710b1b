//! In-memory tabular transform pipeline for CSV dashboards.
//!
//! The pipeline is a set of pure functions over polars tables: load
//! delimited bytes, classify columns as numeric or categorical, apply
//! request-scoped filter conditions against the original table, and derive
//! summary statistics and renderer-agnostic chart specifications. The
//! hosting request layer owns uploads, sessions, rendering, and error
//! presentation; it hands tables in and gets typed results back.
//!
//! Filters are never cumulative: each application re-derives from the
//! original table, and the [`store::DatasetStore`] keeps exactly one
//! original and one filtered snapshot per dataset.

pub mod chart_data;
pub mod classify;
pub mod error;
pub mod filter;
pub mod loader;
pub mod statistics;
pub mod store;

pub use chart_data::{
    bar_chart, correlation_heatmap, histogram, CategoryCount, ChartSpec, HistogramBin,
    LayoutHints, HISTOGRAM_BINS, TOP_CATEGORY_LIMIT,
};
pub use classify::{classify_columns, ColumnClassification};
pub use error::{Result, TableError};
pub use filter::{apply_filters, FilterCondition, FilterOperator};
pub use loader::{load_table, serialize_table};
pub use statistics::{
    summarize, unique_values, ColumnSummary, SummaryReport, TablePreview, PREVIEW_ROW_LIMIT,
    UNIQUE_VALUE_LIMIT,
};
pub use store::{DatasetSnapshot, DatasetStore};
