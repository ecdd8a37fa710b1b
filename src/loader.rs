//! Delimited-text loading and serialization.
//!
//! Round-trip contract: loading the serialized form of a loader-produced
//! table reproduces the same columns, row order, and cell text.

use std::io::Cursor;

use log::debug;
use polars::prelude::*;

use crate::error::{Result, TableError};

/// Parse raw delimited-text bytes into a table.
///
/// Fails with `EmptyInput` when the bytes are empty or the content parses
/// to zero rows and zero columns. Header-only input (declared columns,
/// zero rows) is a valid table. Content that cannot be parsed as delimited
/// text (inconsistent structure, decode failure) fails with
/// `MalformedInput`. Column types are inferred while reading: a column
/// whose non-missing values all parse as numbers gets a numeric dtype,
/// everything else stays text.
pub fn load_table(bytes: &[u8]) -> Result<DataFrame> {
    if bytes.is_empty() {
        return Err(TableError::EmptyInput);
    }

    let df = CsvReader::new(Cursor::new(bytes))
        .with_options(CsvReadOptions::default())
        .finish()
        .map_err(classify_parse_error)?;

    if df.height() == 0 && df.width() == 0 {
        return Err(TableError::EmptyInput);
    }

    debug!("loaded table: {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

/// Map a CSV parse failure onto the load-time taxonomy: no data at all is
/// `EmptyInput`, anything else unreadable is `MalformedInput`.
fn classify_parse_error(err: PolarsError) -> TableError {
    match err {
        PolarsError::NoData(_) => TableError::EmptyInput,
        other => TableError::MalformedInput(other.to_string()),
    }
}

/// Serialize a table to comma-delimited text with a header row. Missing
/// cells are written as empty fields. This is the host's "download current
/// filtered table" export, and the inverse of [`load_table`].
pub fn serialize_table(df: &mut DataFrame) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .with_separator(b',')
        .include_header(true)
        .finish(df)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_simple_csv() {
        let df = load_table(b"name,age\nalice,30\nbob,25\n").unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 2);
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["name", "age"]);
    }

    #[test]
    fn empty_bytes_are_empty_input() {
        assert!(matches!(load_table(b""), Err(TableError::EmptyInput)));
    }

    #[test]
    fn header_only_is_a_valid_table() {
        let df = load_table(b"a,b\n").unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let result = load_table(&[0xff, 0xff, 0xfe, 0xff, 0xff, 0xfe]);
        assert!(matches!(result, Err(TableError::MalformedInput(_))));
    }
}
