//! Build a typed collection from a grid of strings.
//!
//! Row 0 names the fields, row 1 fixes each column's kind and every later
//! row must parse under that kind.

use convert_case::{Case, Casing};

use crate::error::{Error, Result};
use crate::record::{Collection, Record, RecordType};
use crate::value::{FieldValue, Grid, Kind};

/// Name given to synthesized record types
pub const ROW_TYPE_NAME: &str = "Row";

/// Convert a header row plus data rows into a collection of a new record type.
///
/// # Example
///
/// ```
/// use recordkit::ops::to_table;
///
/// let grid = vec![
///     vec!["Name".to_string(), "Count".to_string()],
///     vec!["a".to_string(), "1".to_string()],
/// ];
/// let rows = to_table(&grid).unwrap();
/// assert_eq!(rows.records()[0].get("Count").and_then(|v| v.as_int()), Some(1));
/// ```
pub fn to_table(grid: &Grid) -> Result<Collection> {
    if grid.len() < 2 {
        return Err(Error::argument(
            "totable needs a header row and at least one data row",
        ));
    }
    let header = &grid[0];
    if header.is_empty() {
        return Err(Error::argument("totable header row is empty"));
    }
    for (i, row) in grid.iter().enumerate().skip(1) {
        if row.len() != header.len() {
            return Err(Error::shape(format!(
                "row {} has {} columns but the header has {}",
                i,
                row.len(),
                header.len()
            )));
        }
    }

    let names = field_names(header)?;
    let kinds: Vec<Kind> = grid[1].iter().map(|cell| infer_kind(cell)).collect();

    let mut builder = RecordType::builder(ROW_TYPE_NAME);
    for (name, kind) in names.iter().zip(&kinds) {
        builder = builder.field(name.clone(), kind.clone());
    }
    let ty = builder.build()?;

    let mut records = Vec::with_capacity(grid.len() - 1);
    for (row_index, row) in grid.iter().enumerate().skip(1) {
        let mut values = Vec::with_capacity(row.len());
        for ((cell, kind), name) in row.iter().zip(&kinds).zip(&names) {
            let value = parse_cell(cell, kind).ok_or_else(|| Error::Parse {
                row: row_index,
                column: name.clone(),
                value: cell.clone(),
                kind: kind.to_string(),
            })?;
            values.push(value);
        }
        records.push(Record::from_parts(ty.clone(), values));
    }

    tracing::debug!(
        "totable: {} records, kinds {:?}",
        records.len(),
        kinds.iter().map(Kind::to_string).collect::<Vec<_>>()
    );
    Collection::new(ty, records)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Turn an arbitrary heading into an identifier; valid identifiers pass through.
pub fn sanitize_name(raw: &str, column: usize) -> String {
    if is_identifier(raw) {
        return raw.to_string();
    }
    let words: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    let name = words.trim().to_case(Case::Pascal);
    if name.is_empty() {
        format!("Field{}", column)
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

fn field_names(header: &[String]) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (i, raw) in header.iter().enumerate() {
        if raw.trim().is_empty() {
            return Err(Error::argument(format!("totable heading {} is empty", i)));
        }
        if header[..i].contains(raw) {
            return Err(Error::argument(format!("totable heading '{}' is repeated", raw)));
        }

        let base = sanitize_name(raw, i);
        let mut name = base.clone();
        let mut suffix = 2;
        while names.contains(&name) {
            name = format!("{}{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }
    Ok(names)
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_float(cell: &str) -> Option<f64> {
    // f64's parser also accepts "inf" and "NaN", which are words, not numbers here.
    if !cell.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    cell.parse().ok()
}

/// Kind of a column, from its first data cell: bool, then int, then float, then string.
pub fn infer_kind(cell: &str) -> Kind {
    if parse_bool(cell).is_some() {
        Kind::Bool
    } else if cell.parse::<i64>().is_ok() {
        Kind::Int
    } else if parse_float(cell).is_some() {
        Kind::Float
    } else {
        Kind::String
    }
}

fn parse_cell(cell: &str, kind: &Kind) -> Option<FieldValue> {
    match kind {
        Kind::Bool => parse_bool(cell).map(FieldValue::Bool),
        Kind::Int => cell.parse().ok().map(FieldValue::Int),
        Kind::Float => parse_float(cell).map(FieldValue::Float),
        _ => Some(FieldValue::String(cell.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_name_count() {
        let c = to_table(&grid(&[&["Name", "Count"], &["a", "1"], &["b", "2"]])).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.record_type().fields()[1].kind, Kind::Int);
        let counts: Vec<i64> = c
            .iter()
            .map(|r| r.get("Count").unwrap().as_int().unwrap())
            .collect();
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_inference_priority() {
        assert_eq!(infer_kind("TRUE"), Kind::Bool);
        assert_eq!(infer_kind("1"), Kind::Int);
        assert_eq!(infer_kind("-1.5"), Kind::Float);
        assert_eq!(infer_kind("1e3"), Kind::Float);
        assert_eq!(infer_kind("NaN"), Kind::String);
        assert_eq!(infer_kind("inf"), Kind::String);
        assert_eq!(infer_kind(""), Kind::String);
    }

    #[test]
    fn test_column_kind_enforced() {
        let result = to_table(&grid(&[&["N"], &["1"], &["two"]]));
        assert_eq!(
            result,
            Err(Error::Parse {
                row: 2,
                column: "N".to_string(),
                value: "two".to_string(),
                kind: "int".to_string(),
            })
        );
    }

    #[test]
    fn test_later_rows_not_reinferred() {
        // Row 1 says string; a numeric-looking value later stays a string.
        let c = to_table(&grid(&[&["V"], &["x"], &["7"]])).unwrap();
        assert_eq!(
            c.records()[1].get("V"),
            Some(&FieldValue::String("7".to_string()))
        );
    }

    #[test]
    fn test_shape_errors() {
        assert!(matches!(to_table(&grid(&[&["A"]])), Err(Error::Argument(_))));
        assert!(matches!(
            to_table(&grid(&[&["A", "B"], &["1"]])),
            Err(Error::Shape(_))
        ));
        assert!(matches!(
            to_table(&grid(&[&["A", "A"], &["1", "2"]])),
            Err(Error::Argument(_))
        ));
        assert!(matches!(
            to_table(&grid(&[&["A", " "], &["1", "2"]])),
            Err(Error::Argument(_))
        ));
    }

    #[test]
    fn test_sanitized_names() {
        assert_eq!(sanitize_name("first name", 0), "FirstName");
        assert_eq!(sanitize_name("unit-price", 0), "UnitPrice");
        assert_eq!(sanitize_name("Volume", 0), "Volume");
        assert_eq!(sanitize_name("%%", 3), "Field3");

        let c = to_table(&grid(&[&["first name", "first-name"], &["a", "b"]])).unwrap();
        let names: Vec<&str> = c
            .record_type()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["FirstName", "FirstName2"]);
    }
}
