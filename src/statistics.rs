//! Summary statistics and row previews.
//!
//! Statistics for every numeric column are computed in a single lazy
//! aggregation pass so large tables are scanned once.

use std::collections::BTreeSet;

use log::debug;
use polars::polars_compute::rolling::QuantileMethod;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::classify_columns;
use crate::error::Result;

/// Rows included in a table preview unless the caller overrides the cap.
pub const PREVIEW_ROW_LIMIT: usize = 100;

/// Cap on distinct values returned by [`unique_values`].
pub const UNIQUE_VALUE_LIMIT: usize = 200;

/// Descriptive statistics for one numeric column.
///
/// `count` is the number of non-missing cells. `median` is the
/// linear-interpolated 50th percentile and `std` the sample standard
/// deviation (N-1 denominator). Moments that are undefined for the data
/// (e.g. `std` of a single value) are NaN, which serializes to JSON null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub column: String,
    pub count: u64,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// First rows of a table rendered to text, in original order. Missing
/// cells render as the empty string, matching their CSV serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Preview plus per-numeric-column statistics. `stats` is empty when the
/// table has no numeric columns; that is a defined state for downstream
/// rendering, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryReport {
    pub preview: TablePreview,
    pub stats: Vec<ColumnSummary>,
}

/// Build the summary report for a table: the first `preview_rows` rows and
/// statistics for each numeric column in table order.
pub fn summarize(df: &DataFrame, preview_rows: usize) -> Result<SummaryReport> {
    let preview = preview_table(df, preview_rows)?;
    let stats = numeric_summaries(df)?;
    debug!(
        "summarized {} rows: {} preview rows, {} numeric columns",
        df.height(),
        preview.rows.len(),
        stats.len()
    );
    Ok(SummaryReport { preview, stats })
}

/// Distinct values of a column, for the host's filter-builder listing.
/// Missing cells are dropped, values are rendered to text, sorted
/// ascending, and capped at `limit`. An absent column yields an empty
/// list rather than an error.
pub fn unique_values(df: &DataFrame, column: &str, limit: usize) -> Result<Vec<String>> {
    let Ok(column) = df.column(column) else {
        return Ok(Vec::new());
    };

    let series = column.as_materialized_series();
    let mut distinct = BTreeSet::new();
    for i in 0..series.len() {
        let value = series.get(i)?;
        if matches!(value, AnyValue::Null) {
            continue;
        }
        distinct.insert(cell_text(&value));
    }
    Ok(distinct.into_iter().take(limit).collect())
}

/// Text form of a cell; missing renders as the empty string.
pub(crate) fn cell_text(value: &AnyValue) -> String {
    match value {
        AnyValue::Null => String::new(),
        other => other.str_value().to_string(),
    }
}

fn preview_table(df: &DataFrame, max_rows: usize) -> Result<TablePreview> {
    let head = df.head(Some(max_rows));
    let columns: Vec<String> = head
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();

    let mut rows = Vec::with_capacity(head.height());
    for i in 0..head.height() {
        let mut row = Vec::with_capacity(head.width());
        for column in head.get_columns() {
            row.push(cell_text(&column.get(i)?));
        }
        rows.push(row);
    }

    Ok(TablePreview { columns, rows })
}

/// One aggregation pass over all numeric columns: count, mean, median,
/// std, min, max per column.
fn numeric_summaries(df: &DataFrame) -> Result<Vec<ColumnSummary>> {
    let numeric = classify_columns(df).numeric;
    if numeric.is_empty() {
        return Ok(Vec::new());
    }

    let mut exprs = Vec::with_capacity(numeric.len() * 6);
    for name in &numeric {
        let prefix = format!("{}::", name);
        let c = col(name.as_str()).cast(DataType::Float64);
        exprs.push(c.clone().count().alias(format!("{}count", prefix)));
        exprs.push(c.clone().mean().alias(format!("{}mean", prefix)));
        exprs.push(
            c.clone()
                .quantile(lit(0.5), QuantileMethod::Linear)
                .alias(format!("{}median", prefix)),
        );
        exprs.push(c.clone().std(1).alias(format!("{}std", prefix)));
        exprs.push(c.clone().min().alias(format!("{}min", prefix)));
        exprs.push(c.max().alias(format!("{}max", prefix)));
    }

    let agg = df.clone().lazy().select(exprs).collect()?;

    let mut summaries = Vec::with_capacity(numeric.len());
    for name in numeric {
        let prefix = format!("{}::", name);
        summaries.push(ColumnSummary {
            count: get_u64(&agg, &format!("{}count", prefix)),
            mean: get_f64(&agg, &format!("{}mean", prefix)),
            median: get_f64(&agg, &format!("{}median", prefix)),
            std: get_f64(&agg, &format!("{}std", prefix)),
            min: get_f64(&agg, &format!("{}min", prefix)),
            max: get_f64(&agg, &format!("{}max", prefix)),
            column: name,
        });
    }
    Ok(summaries)
}

fn get_f64(df: &DataFrame, name: &str) -> f64 {
    df.column(name)
        .ok()
        .and_then(|c| c.get(0).ok())
        .and_then(|v| v.try_extract::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn get_u64(df: &DataFrame, name: &str) -> u64 {
    df.column(name)
        .ok()
        .and_then(|c| c.get(0).ok())
        .and_then(|v| v.try_extract::<u64>().ok())
        .unwrap_or(0)
}
