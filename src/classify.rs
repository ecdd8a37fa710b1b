//! Numeric/categorical column partition.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Column names partitioned by inferred semantic type, in table order.
/// Every column of the source table appears in exactly one set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

/// Partition a table's columns into numeric and categorical.
///
/// A column is numeric iff load-time inference gave it a numeric dtype,
/// i.e. every non-missing value parsed as a number. Everything else
/// (strings, booleans) is categorical. The classification is a view over
/// one table; recompute it whenever the table identity changes, e.g.
/// after a filter.
pub fn classify_columns(df: &DataFrame) -> ColumnClassification {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();
    for (name, dtype) in df.schema().iter() {
        if dtype.is_numeric() {
            numeric.push(name.to_string());
        } else {
            categorical.push(name.to_string());
        }
    }
    ColumnClassification {
        numeric,
        categorical,
    }
}
