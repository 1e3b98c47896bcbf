//! Structural reshaping: head, tail, rows, cols, promote, sliceof, select.
//!
//! None of these transform values; they pick records or fields.

use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::path::FieldPath;
use crate::record::{Collection, Record};
use crate::value::{FieldValue, Kind, Value};

fn count(n: i64, op: &str) -> Result<usize> {
    usize::try_from(n)
        .map_err(|_| Error::argument(format!("{}: count must not be negative, got {}", op, n)))
}

/// The first `min(n, len)` records
pub fn head(collection: &Collection, n: i64) -> Result<Collection> {
    let n = count(n, "head")?.min(collection.len());
    Ok(collection.with_records(collection.records()[..n].to_vec()))
}

/// The last `min(n, len)` records, in their original order
pub fn tail(collection: &Collection, n: i64) -> Result<Collection> {
    let n = count(n, "tail")?.min(collection.len());
    let start = collection.len() - n;
    Ok(collection.with_records(collection.records()[start..].to_vec()))
}

/// Records at the given 0-based indices, in the order given.
///
/// Indices outside the collection are skipped.
pub fn rows(collection: &Collection, indices: &[i64]) -> Result<Collection> {
    let mut picked = Vec::with_capacity(indices.len());
    for &index in indices {
        match usize::try_from(index).ok().and_then(|i| collection.records().get(i)) {
            Some(record) => picked.push(record.clone()),
            None => tracing::debug!(
                "rows: index {} outside collection of {}, skipped",
                index,
                collection.len()
            ),
        }
    }
    Ok(collection.with_records(picked))
}

/// Restrict every record to exactly the named fields, in the order requested.
pub fn cols(collection: &Collection, names: &[&str]) -> Result<Collection> {
    if names.is_empty() {
        return Err(Error::argument("cols: at least one field name is required"));
    }
    let (ty, indices) = collection.record_type().project(names)?;

    let records = collection
        .iter()
        .map(|record| {
            let values = indices
                .iter()
                .map(|&i| record.value_at(i).clone())
                .collect();
            Record::from_parts(ty.clone(), values)
        })
        .collect();
    Collection::new(ty, records)
}

/// Replace each record with the nested record found at `path`.
pub fn promote(collection: &Collection, path: &str) -> Result<Collection> {
    let path = FieldPath::from_dotted(path)?;
    let nested_ty = match path.resolve_kind(collection.record_type())? {
        Kind::Record(ty) => ty.clone(),
        _ => {
            return Err(Error::NotARecord {
                segment: path.segments.last().cloned().unwrap_or_default(),
            })
        }
    };

    let mut promoted = Vec::with_capacity(collection.len());
    for (i, record) in collection.iter().enumerate() {
        match path.resolve(record)? {
            FieldValue::Record(nested) => promoted.push(nested.clone()),
            other => {
                return Err(Error::shape(format!(
                    "promote: '{}' holds {} in element {}",
                    path,
                    other.describe_kind(),
                    i
                )))
            }
        }
    }
    Collection::new(nested_ty, promoted)
}

/// Wrap a single record in a one-element collection.
pub fn sliceof(value: &Value) -> Result<Collection> {
    let record = value.as_record().ok_or_else(|| {
        Error::shape(format!("sliceof expects a record, got {}", value.describe_kind()))
    })?;
    Collection::new(record.record_type().clone(), vec![record.clone()])
}

/// One line per record holding the field's canonical (or alternate) string.
pub fn select(collection: &Collection, field: &str, alt: bool) -> Result<String> {
    let path = FieldPath::single(field);
    path.resolve_kind(collection.record_type())?;

    let mut out = String::new();
    for record in collection {
        let value = path.resolve(record)?;
        if alt {
            let _ = writeln!(out, "{}", value.alt());
        } else {
            let _ = writeln!(out, "{}", value);
        }
    }
    Ok(out)
}
