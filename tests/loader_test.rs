use color_eyre::Result;
use tabdash::{classify_columns, load_table, serialize_table, TableError};

#[test]
fn test_load_infers_column_types() -> Result<()> {
    let df = load_table(b"name,age,score\nalice,30,1.5\nbob,25,2.0\n")?;
    assert_eq!(df.height(), 2);
    assert_eq!(df.width(), 3);

    let classes = classify_columns(&df);
    assert_eq!(classes.numeric, vec!["age", "score"]);
    assert_eq!(classes.categorical, vec!["name"]);
    Ok(())
}

#[test]
fn test_mixed_column_stays_categorical() -> Result<()> {
    let df = load_table(b"v\n1\ntwo\n3\n")?;
    let classes = classify_columns(&df);
    assert_eq!(classes.categorical, vec!["v"]);
    assert!(classes.numeric.is_empty());
    Ok(())
}

#[test]
fn test_empty_input_taxonomy() {
    assert!(matches!(load_table(b""), Err(TableError::EmptyInput)));
    assert!(matches!(load_table(b"\n"), Err(TableError::EmptyInput)));
}

#[test]
fn test_header_only_is_not_empty_input() -> Result<()> {
    // 0 rows with declared columns is a valid table; only 0 rows AND
    // 0 columns counts as empty.
    let df = load_table(b"a,b,c\n")?;
    assert_eq!(df.height(), 0);
    assert_eq!(df.width(), 3);
    Ok(())
}

#[test]
fn test_undecodable_input_is_malformed() {
    let result = load_table(&[0xff, 0xff, 0xfe, 0xff, 0xff, 0xfe]);
    assert!(matches!(result, Err(TableError::MalformedInput(_))));
}

#[test]
fn test_round_trip_preserves_table() -> Result<()> {
    let input = b"name,age,score\nalice,30,1.5\nbob,25,2.5\ncarol,41,3.25\n";
    let mut df = load_table(input)?;
    let bytes = serialize_table(&mut df)?;
    let reloaded = load_table(&bytes)?;

    assert!(df.equals_missing(&reloaded));
    Ok(())
}

#[test]
fn test_round_trip_with_missing_cells() -> Result<()> {
    let input = b"name,age\nalice,30\nbob,\n,25\n";
    let mut df = load_table(input)?;
    assert_eq!(df.height(), 3);

    let bytes = serialize_table(&mut df)?;
    let reloaded = load_table(&bytes)?;
    assert!(df.equals_missing(&reloaded));
    Ok(())
}
