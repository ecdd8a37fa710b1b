//! Filter condition parsing and application.
//!
//! Conditions arrive from the request layer as {column, operator, value}
//! strings and are validated here before they reach the engine. A filter
//! application is an AND chain evaluated against the source table; the
//! source is never mutated and the result is always a fresh table.

use log::debug;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TableError};

/// Comparison operator for a single filter condition.
///
/// `Eq`/`Neq` compare the cell's text form case-sensitively. The substring
/// operators compare case-insensitively. The ordering operators compare
/// numerically and require a numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterOperator {
    Eq,
    Neq,
    Contains,
    StartsWith,
    EndsWith,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl FilterOperator {
    /// Parse the wire name used by request payloads.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "contains" => Ok(Self::Contains),
            "startswith" => Ok(Self::StartsWith),
            "endswith" => Ok(Self::EndsWith),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            other => Err(TableError::UnknownOperator(other.to_string())),
        }
    }

    /// Wire name, as used in request payloads and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Contains => "contains",
            Self::StartsWith => "startswith",
            Self::EndsWith => "endswith",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }
}

impl std::fmt::Display for FilterOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One column/operator/value predicate. Constructed per request from the
/// payload, applied once, then discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub column: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl FilterCondition {
    pub fn new(
        column: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Validate an untyped {column, operator, value} record from the wire.
    /// Fields are trimmed; an unrecognized operator name is rejected here,
    /// before the condition can reach the engine.
    pub fn from_parts(column: &str, operator: &str, value: &str) -> Result<Self> {
        Ok(Self {
            column: column.trim().to_string(),
            operator: FilterOperator::parse(operator.trim())?,
            value: value.trim().to_string(),
        })
    }
}

/// Apply `conditions` in order (logical AND) to `df`, producing a derived
/// table with the same columns in the same order and a subset of the
/// source's rows in their original order.
///
/// Conditions naming a column absent from the table are skipped and
/// contribute no restriction. A numeric operator whose literal does not
/// parse as a number aborts the whole application with
/// `NonNumericFilterValue` before any condition takes effect. Missing
/// cells never match any operator; cells that fail numeric coercion are
/// non-matching rather than errors.
pub fn apply_filters(df: &DataFrame, conditions: &[FilterCondition]) -> Result<DataFrame> {
    let schema = df.schema();
    let mut exprs = Vec::with_capacity(conditions.len());
    for cond in conditions {
        if schema.get(cond.column.as_str()).is_none() {
            debug!("skipping filter on unknown column '{}'", cond.column);
            continue;
        }
        exprs.push(condition_expr(cond)?);
    }

    if exprs.is_empty() {
        return Ok(df.clone());
    }

    let mut lf = df.clone().lazy();
    for expr in exprs {
        lf = lf.filter(expr);
    }
    let filtered = lf.collect()?;
    debug!(
        "filter kept {} of {} rows ({} conditions)",
        filtered.height(),
        df.height(),
        conditions.len()
    );
    Ok(filtered)
}

/// Build the predicate expression for one condition. Text operators work
/// on the column cast to its text form, so numeric columns compare by
/// their textual representation.
fn condition_expr(cond: &FilterCondition) -> Result<Expr> {
    let text = col(cond.column.as_str()).cast(DataType::String);
    let expr = match cond.operator {
        FilterOperator::Eq => text.eq(lit(cond.value.clone())),
        FilterOperator::Neq => text.neq(lit(cond.value.clone())),
        FilterOperator::Contains => text
            .str()
            .to_lowercase()
            .str()
            .contains_literal(lit(cond.value.to_lowercase())),
        FilterOperator::StartsWith => text
            .str()
            .to_lowercase()
            .str()
            .starts_with(lit(cond.value.to_lowercase())),
        FilterOperator::EndsWith => text
            .str()
            .to_lowercase()
            .str()
            .ends_with(lit(cond.value.to_lowercase())),
        FilterOperator::Gt => numeric_col(cond).gt(lit(numeric_literal(cond)?)),
        FilterOperator::Gte => numeric_col(cond).gt_eq(lit(numeric_literal(cond)?)),
        FilterOperator::Lt => numeric_col(cond).lt(lit(numeric_literal(cond)?)),
        FilterOperator::Lte => numeric_col(cond).lt_eq(lit(numeric_literal(cond)?)),
    };
    Ok(expr)
}

/// Per-cell coercion for ordering operators: cells that fail the cast
/// become null and therefore non-matching.
fn numeric_col(cond: &FilterCondition) -> Expr {
    col(cond.column.as_str()).cast(DataType::Float64)
}

/// The literal itself must parse; a bad literal is a hard failure for the
/// whole filter application, unlike per-cell coercion.
fn numeric_literal(cond: &FilterCondition) -> Result<f64> {
    cond.value
        .trim()
        .parse()
        .map_err(|_| TableError::NonNumericFilterValue {
            value: cond.value.clone(),
            operator: cond.operator,
        })
}
