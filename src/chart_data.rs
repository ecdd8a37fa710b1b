//! Chart specification builders: histogram, top-category bar chart, and
//! correlation heatmap.
//!
//! Specs are declarative and renderer-agnostic; the host hands them to its
//! charting collaborator as JSON. Builders are pure derivations from a
//! table and tolerate missing or non-coercible cells by excluding them
//! from the computation.

use std::collections::HashMap;

use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classify::classify_columns;
use crate::error::Result;
use crate::statistics::cell_text;

/// Equal-width bucket count for histograms.
pub const HISTOGRAM_BINS: usize = 30;

/// Distinct categories kept in a bar chart, descending by count.
pub const TOP_CATEGORY_LIMIT: usize = 20;

const HISTOGRAM_HEIGHT: u32 = 420;
const BAR_HEIGHT: u32 = 420;
const HEATMAP_HEIGHT: u32 = 520;

/// Presentation hints carried by every non-empty spec. Purely declarative;
/// the renderer decides what to honor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutHints {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub height: u32,
    /// X tick label rotation in degrees; bar charts angle category names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_angle: Option<u32>,
}

/// One histogram bucket: [start, end), except the last which includes its
/// upper edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub center: f64,
    pub count: u64,
}

/// Category/count pair for a bar chart, in descending-count order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: u64,
}

/// Renderer-agnostic chart description. `Empty` is the defined
/// "nothing to draw" state emitted when a chart's prerequisites are
/// missing (e.g. no numeric column for a histogram).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Empty,
    Histogram {
        column: String,
        bins: Vec<HistogramBin>,
        x_min: f64,
        x_max: f64,
        layout: LayoutHints,
    },
    Bar {
        column: String,
        categories: Vec<CategoryCount>,
        layout: LayoutHints,
    },
    Heatmap {
        columns: Vec<String>,
        /// Row-major symmetric correlation matrix; undefined cells are NaN
        /// and serialize to JSON null.
        values: Vec<Vec<f64>>,
        z_min: f64,
        z_max: f64,
        layout: LayoutHints,
    },
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        matches!(self, ChartSpec::Empty)
    }

    /// JSON form of the spec, the value handed to the host's rendering
    /// collaborator. Non-finite numbers (undefined correlation cells)
    /// serialize as JSON null.
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

/// Histogram of a numeric column over [`HISTOGRAM_BINS`] equal-width
/// buckets spanning the observed min-max.
///
/// `requested` falls back to the first numeric column when absent from the
/// table or not numeric. No numeric column, or a numeric column with zero
/// usable values, yields `ChartSpec::Empty`.
pub fn histogram(df: &DataFrame, requested: Option<&str>) -> Result<ChartSpec> {
    let numeric = classify_columns(df).numeric;
    let Some(column) = pick_column(&numeric, requested) else {
        return Ok(ChartSpec::Empty);
    };

    let values = numeric_values(df, &column)?;
    if values.is_empty() {
        debug!("histogram: no usable values in '{}'", column);
        return Ok(ChartSpec::Empty);
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    for &v in &values {
        x_min = x_min.min(v);
        x_max = x_max.max(v);
    }

    let span = x_max - x_min;
    let bins = if span == 0.0 {
        // Every value identical: a single bucket holds them all.
        vec![HistogramBin {
            start: x_min,
            end: x_max,
            center: x_min,
            count: values.len() as u64,
        }]
    } else {
        let width = span / HISTOGRAM_BINS as f64;
        let mut counts = vec![0u64; HISTOGRAM_BINS];
        for &v in &values {
            let idx = (((v - x_min) / width) as usize).min(HISTOGRAM_BINS - 1);
            counts[idx] += 1;
        }
        counts
            .iter()
            .enumerate()
            .map(|(i, &count)| {
                let start = x_min + width * i as f64;
                let end = x_min + width * (i + 1) as f64;
                HistogramBin {
                    start,
                    end,
                    center: (start + end) / 2.0,
                    count,
                }
            })
            .collect()
    };

    Ok(ChartSpec::Histogram {
        bins,
        x_min,
        x_max,
        layout: LayoutHints {
            title: format!("Histogram: {}", column),
            x_label: column.clone(),
            y_label: "Count".to_string(),
            height: HISTOGRAM_HEIGHT,
            tick_angle: None,
        },
        column,
    })
}

/// Frequency bar chart of a categorical column's text values: descending
/// count, top [`TOP_CATEGORY_LIMIT`]. Equal counts keep first-seen row
/// order, so the output is deterministic for a given table.
pub fn bar_chart(df: &DataFrame, requested: Option<&str>) -> Result<ChartSpec> {
    let categorical = classify_columns(df).categorical;
    let Some(column) = pick_column(&categorical, requested) else {
        return Ok(ChartSpec::Empty);
    };

    let series = df.column(&column)?.as_materialized_series();
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, u64> = HashMap::new();
    for i in 0..series.len() {
        let value = series.get(i)?;
        if matches!(value, AnyValue::Null) {
            continue;
        }
        let text = cell_text(&value);
        if let Some(n) = counts.get_mut(&text) {
            *n += 1;
        } else {
            counts.insert(text.clone(), 1);
            first_seen.push(text);
        }
    }

    let mut categories: Vec<CategoryCount> = first_seen
        .into_iter()
        .map(|category| CategoryCount {
            count: counts.get(&category).copied().unwrap_or(0),
            category,
        })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    categories.sort_by(|a, b| b.count.cmp(&a.count));
    categories.truncate(TOP_CATEGORY_LIMIT);

    Ok(ChartSpec::Bar {
        categories,
        layout: LayoutHints {
            title: format!("Top Values: {}", column),
            x_label: column.clone(),
            y_label: "count".to_string(),
            height: BAR_HEIGHT,
            tick_angle: Some(45),
        },
        column,
    })
}

/// Pairwise-complete Pearson correlation over all numeric columns, in
/// table order. Fewer than two numeric columns yields `ChartSpec::Empty`.
/// Pairs with fewer than two complete observations, or zero variance,
/// produce NaN cells rather than errors; the diagonal is 1.0.
pub fn correlation_heatmap(df: &DataFrame) -> Result<ChartSpec> {
    let numeric = classify_columns(df).numeric;
    if numeric.len() < 2 {
        return Ok(ChartSpec::Empty);
    }

    let n = numeric.len();
    let mut values = vec![vec![1.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let col1 = df.column(&numeric[i])?;
            let col2 = df.column(&numeric[j])?;

            // Pairwise-complete: drop rows missing either column, per pair.
            let mask = col1.is_not_null() & col2.is_not_null();
            let col1_clean = col1.filter(&mask)?;
            let col2_clean = col2.filter(&mask)?;

            let r = pearson_correlation(
                col1_clean.as_materialized_series(),
                col2_clean.as_materialized_series(),
            )?;
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(ChartSpec::Heatmap {
        columns: numeric,
        values,
        z_min: -1.0,
        z_max: 1.0,
        layout: LayoutHints {
            title: "Correlation Heatmap".to_string(),
            x_label: String::new(),
            y_label: String::new(),
            height: HEATMAP_HEIGHT,
            tick_angle: None,
        },
    })
}

/// The requested column when it is available, else the first available.
fn pick_column(available: &[String], requested: Option<&str>) -> Option<String> {
    match requested {
        Some(name) if available.iter().any(|c| c == name) => Some(name.to_string()),
        _ => available.first().cloned(),
    }
}

/// Finite non-missing values of a column coerced to f64. Cells that fail
/// coercion are excluded, never errors.
fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    let series = df
        .column(column)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    let ca = series.f64()?;
    Ok(ca.iter().flatten().filter(|v| v.is_finite()).collect())
}

/// Pearson correlation of two equal-length series with nulls already
/// removed. Non-finite pairs are excluded; fewer than two remaining
/// observations or zero variance is undefined and yields NaN.
fn pearson_correlation(a: &Series, b: &Series) -> Result<f64> {
    let xs = f64_values(a)?;
    let ys = f64_values(b)?;
    if xs.len() != ys.len() {
        return Ok(f64::NAN);
    }

    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys.iter())
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    if pairs.len() < 2 {
        return Ok(f64::NAN);
    }

    let len = pairs.len() as f64;
    let mean_x: f64 = pairs.iter().map(|(x, _)| x).sum::<f64>() / len;
    let mean_y: f64 = pairs.iter().map(|(_, y)| y).sum::<f64>() / len;

    let numerator: f64 = pairs
        .iter()
        .map(|(x, y)| (x - mean_x) * (y - mean_y))
        .sum();
    let var_x: f64 = pairs.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    let var_y: f64 = pairs.iter().map(|(_, y)| (y - mean_y).powi(2)).sum();

    if var_x == 0.0 || var_y == 0.0 {
        return Ok(f64::NAN);
    }
    Ok(numerator / (var_x.sqrt() * var_y.sqrt()))
}

fn f64_values(series: &Series) -> Result<Vec<f64>> {
    let s = series.cast(&DataType::Float64)?;
    Ok(s.f64()?.iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pick_column_prefers_requested_when_available() {
        let available = vec!["a".to_string(), "b".to_string()];
        assert_eq!(pick_column(&available, Some("b")), Some("b".to_string()));
        assert_eq!(pick_column(&available, Some("zz")), Some("a".to_string()));
        assert_eq!(pick_column(&available, None), Some("a".to_string()));
        assert_eq!(pick_column(&[], None), None);
    }

    #[test]
    fn histogram_bins_cover_all_values() {
        let values: Vec<f64> = (0..300).map(|i| i as f64 / 10.0).collect();
        let df = df!("v" => &values).unwrap();
        let spec = histogram(&df, None).unwrap();
        match spec {
            ChartSpec::Histogram {
                bins, x_min, x_max, ..
            } => {
                assert_eq!(bins.len(), HISTOGRAM_BINS);
                assert_eq!(x_min, 0.0);
                assert_eq!(x_max, 29.9);
                let total: u64 = bins.iter().map(|b| b.count).sum();
                assert_eq!(total, 300);
            }
            other => panic!("expected histogram, got {:?}", other),
        }
    }

    #[test]
    fn histogram_degenerate_span_is_a_single_bucket() {
        let df = df!("v" => &[7.0f64, 7.0, 7.0]).unwrap();
        let spec = histogram(&df, None).unwrap();
        match spec {
            ChartSpec::Histogram { bins, .. } => {
                assert_eq!(bins.len(), 1);
                assert_eq!(bins[0].count, 3);
            }
            other => panic!("expected histogram, got {:?}", other),
        }
    }

    #[test]
    fn bar_ties_keep_first_seen_order() {
        let df = df!("tag" => &["x", "y", "x", "y"]).unwrap();
        let spec = bar_chart(&df, None).unwrap();
        match spec {
            ChartSpec::Bar { categories, .. } => {
                assert_eq!(categories[0].category, "x");
                assert_eq!(categories[1].category, "y");
                assert_eq!(categories[0].count, 2);
                assert_eq!(categories[1].count, 2);
            }
            other => panic!("expected bar, got {:?}", other),
        }
    }

    #[test]
    fn correlation_of_exact_linear_data() {
        let x: Vec<f64> = (0..50).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v + 1.0).collect();
        let z: Vec<f64> = x.iter().map(|v| -v).collect();
        let df = df!("x" => &x, "y" => &y, "z" => &z).unwrap();
        let spec = correlation_heatmap(&df).unwrap();
        match spec {
            ChartSpec::Heatmap {
                columns, values, ..
            } => {
                assert_eq!(columns, vec!["x", "y", "z"]);
                assert!((values[0][1] - 1.0).abs() < 1e-9);
                assert!((values[0][2] + 1.0).abs() < 1e-9);
                assert_eq!(values[1][2], values[2][1]);
            }
            other => panic!("expected heatmap, got {:?}", other),
        }
    }
}
