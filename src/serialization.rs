//! JSON and CSV encodings of values.
//!
//! Records serialize as objects of their visible fields in declaration order,
//! collections as arrays of such objects and grids as arrays of string arrays.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::record::{Collection, Record};
use crate::value::{FieldValue, Grid, Value};

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            FieldValue::Null => serializer.serialize_none(),
            FieldValue::Bool(b) => serializer.serialize_bool(*b),
            FieldValue::Int(i) => serializer.serialize_i64(*i),
            FieldValue::Float(f) => serializer.serialize_f64(*f),
            FieldValue::String(s) => serializer.serialize_str(s),
            FieldValue::Record(r) => r.serialize(serializer),
            FieldValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            FieldValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            FieldValue::Opaque(label) => serializer.serialize_str(label),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (decl, value) in self.visible() {
            map.serialize_entry(&decl.name, value)?;
        }
        map.end()
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for record in self {
            seq.serialize_element(record)?;
        }
        seq.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Field(v) => v.serialize(serializer),
            Value::Collection(c) => c.serialize(serializer),
            Value::Grid(g) => g.serialize(serializer),
        }
    }
}

/// Pretty-printed JSON of any value
pub fn to_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

impl Value {
    /// JSON tree of this value; the inverse of [`Value::from_json`] up to
    /// record type names.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// CSV of a collection or grid.
///
/// Collections get a header row of visible field names unless `omit_header`
/// is set; grids are written as-is and ignore the flag.
pub fn to_csv(value: &Value, omit_header: bool) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    match value {
        Value::Grid(grid) => write_grid(&mut writer, grid)?,
        Value::Collection(collection) => {
            if !omit_header {
                let header: Vec<&str> = collection
                    .record_type()
                    .visible_fields()
                    .map(|(_, decl)| decl.name.as_str())
                    .collect();
                writer.write_record(&header)?;
            }
            for record in collection {
                let row: Vec<String> = record.visible().map(|(_, v)| v.to_string()).collect();
                writer.write_record(&row)?;
            }
        }
        other => {
            return Err(Error::shape(format!(
                "tocsv expects a collection or grid, got {}",
                other.describe_kind()
            )))
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::Serialization(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| Error::Serialization(e.to_string()))
}

fn write_grid<W: std::io::Write>(writer: &mut csv::Writer<W>, grid: &Grid) -> Result<()> {
    for row in grid {
        writer.write_record(row)?;
    }
    Ok(())
}
