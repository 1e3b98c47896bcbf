//! Building records from host data.
//!
//! JSON documents and `Serialize` host types are turned into typed records by
//! inferring a [`RecordType`] across every object that shares a position.

use convert_case::{Case, Casing};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record::{Collection, Record, RecordType};
use crate::schema::MAX_DEPTH;
use crate::value::{FieldValue, Kind, Value};

type JsonObject = Map<String, JsonValue>;

impl Value {
    /// Convert a JSON document.
    ///
    /// An array of objects becomes a collection of `type_name` records, an
    /// array of string arrays a grid, an object a record and anything else a
    /// plain field value.
    pub fn from_json(json: &JsonValue, type_name: &str) -> Result<Value> {
        match json {
            JsonValue::Array(items) if is_grid(items) => Ok(Value::Grid(
                items
                    .iter()
                    .map(|row| {
                        row.as_array()
                            .map(|cells| {
                                cells
                                    .iter()
                                    .filter_map(|c| c.as_str().map(str::to_string))
                                    .collect()
                            })
                            .unwrap_or_default()
                    })
                    .collect(),
            )),
            JsonValue::Array(items) if items.iter().all(JsonValue::is_object) => {
                Ok(Value::Collection(Collection::from_json(json, type_name)?))
            }
            JsonValue::Object(object) => {
                let ty = infer_record_type(type_name, &[object], 0)?;
                Ok(Value::from(record_from_object(&ty, object)?))
            }
            other => {
                let kind = infer_kind(type_name, &[other], 0)?;
                Ok(Value::Field(convert(other, &kind)?))
            }
        }
    }
}

impl Collection {
    /// Convert a JSON array of objects into a collection of `type_name` records.
    pub fn from_json(json: &JsonValue, type_name: &str) -> Result<Collection> {
        let items = json
            .as_array()
            .ok_or_else(|| Error::shape("expected a JSON array of objects"))?;
        let objects: Vec<&JsonObject> = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_object()
                    .ok_or_else(|| Error::shape(format!("element {} is not an object", i)))
            })
            .collect::<Result<_>>()?;

        let ty = infer_record_type(type_name, &objects, 0)?;
        let records = objects
            .iter()
            .map(|object| record_from_object(&ty, object))
            .collect::<Result<Vec<_>>>()?;
        Collection::new(ty, records)
    }

    /// Reflect a slice of host values through their `Serialize` impls.
    ///
    /// # Example
    ///
    /// ```
    /// use recordkit::Collection;
    /// use serde::Serialize;
    ///
    /// #[derive(Serialize)]
    /// struct Stock {
    ///     name: String,
    ///     volume: i64,
    /// }
    ///
    /// let stocks = vec![Stock { name: "A".to_string(), volume: 100 }];
    /// let collection = Collection::from_serialize(&stocks, "Stock").unwrap();
    /// assert_eq!(collection.record_type().fields()[1].name, "volume");
    /// ```
    pub fn from_serialize<T: Serialize>(items: &[T], type_name: &str) -> Result<Collection> {
        let json = serde_json::to_value(items)?;
        Collection::from_json(&json, type_name)
    }
}

fn is_grid(items: &[JsonValue]) -> bool {
    !items.is_empty()
        && items.iter().all(|row| {
            row.as_array()
                .map(|cells| cells.iter().all(JsonValue::is_string))
                .unwrap_or(false)
        })
}

fn infer_record_type(
    name: &str,
    objects: &[&JsonObject],
    depth: usize,
) -> Result<Arc<RecordType>> {
    if depth >= MAX_DEPTH {
        return Err(Error::argument(format!(
            "'{}' nests deeper than {} levels",
            name, MAX_DEPTH
        )));
    }

    // Keys in first-seen order; a key missing from an object counts as null.
    let mut columns: IndexMap<&str, Vec<&JsonValue>> = IndexMap::new();
    for object in objects {
        for (key, value) in object.iter() {
            columns.entry(key.as_str()).or_default().push(value);
        }
    }

    let mut builder = RecordType::builder(name);
    for (key, values) in &columns {
        builder = builder.field(*key, infer_kind(key, values, depth + 1)?);
    }
    builder.build()
}

fn infer_kind(field: &str, values: &[&JsonValue], depth: usize) -> Result<Kind> {
    let present: Vec<&JsonValue> = values.iter().copied().filter(|v| !v.is_null()).collect();

    let kind = if present.is_empty() || present.iter().all(|v| v.is_string()) {
        Kind::String
    } else if present.iter().all(|v| v.is_boolean()) {
        Kind::Bool
    } else if present.iter().all(|v| v.is_i64()) {
        Kind::Int
    } else if present.iter().all(|v| v.is_number()) {
        Kind::Float
    } else if present.iter().all(|v| v.is_object()) {
        let objects: Vec<&JsonObject> = present.iter().filter_map(|v| v.as_object()).collect();
        Kind::Record(infer_record_type(
            &field.to_case(Case::Pascal),
            &objects,
            depth,
        )?)
    } else if present.iter().all(|v| v.is_array()) {
        let elements: Vec<&JsonValue> = present
            .iter()
            .filter_map(|v| v.as_array())
            .flatten()
            .collect();
        Kind::Sequence(Box::new(infer_kind(field, &elements, depth)?))
    } else {
        return Err(Error::shape(format!(
            "field '{}' mixes values of different kinds",
            field
        )));
    };
    Ok(kind)
}

fn record_from_object(ty: &Arc<RecordType>, object: &JsonObject) -> Result<Record> {
    let values = ty
        .fields()
        .iter()
        .map(|decl| match object.get(&decl.name) {
            Some(json) => convert(json, &decl.kind),
            None => Ok(FieldValue::Null),
        })
        .collect::<Result<Vec<_>>>()?;
    Record::new(ty.clone(), values)
}

fn convert(json: &JsonValue, kind: &Kind) -> Result<FieldValue> {
    let mismatch = || {
        Error::shape(format!(
            "JSON value {} does not fit kind {}",
            json, kind
        ))
    };
    Ok(match (kind, json) {
        (_, JsonValue::Null) => FieldValue::Null,
        (Kind::Bool, JsonValue::Bool(b)) => FieldValue::Bool(*b),
        (Kind::Int, JsonValue::Number(n)) => FieldValue::Int(n.as_i64().ok_or_else(mismatch)?),
        (Kind::Float, JsonValue::Number(n)) => FieldValue::Float(n.as_f64().ok_or_else(mismatch)?),
        (Kind::String, JsonValue::String(s)) => FieldValue::String(s.clone()),
        (Kind::Record(ty), JsonValue::Object(object)) => {
            FieldValue::Record(record_from_object(ty, object)?)
        }
        (Kind::Sequence(elem), JsonValue::Array(items)) => FieldValue::List(
            items
                .iter()
                .map(|item| convert(item, elem))
                .collect::<Result<_>>()?,
        ),
        (Kind::Mapping(elem), JsonValue::Object(object)) => FieldValue::Map(
            object
                .iter()
                .map(|(k, v)| Ok((k.clone(), convert(v, elem)?)))
                .collect::<Result<_>>()?,
        ),
        _ => return Err(mismatch()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collection_inference() {
        let doc = json!([
            {"Name": "A", "Volume": 100, "Price": 1, "Address": {"City": "X"}},
            {"Name": "B", "Volume": 50, "Price": 2.5, "Address": {"City": "Y"}, "Tags": ["t"]}
        ]);
        let c = Collection::from_json(&doc, "Stock").unwrap();
        let ty = c.record_type();
        let kinds: Vec<String> = ty.fields().iter().map(|f| f.kind.to_string()).collect();
        assert_eq!(kinds, vec!["string", "int", "float", "Address", "[]string"]);

        let first = &c.records()[0];
        assert_eq!(first.get("Price"), Some(&FieldValue::Float(1.0)));
        assert_eq!(first.get("Tags"), Some(&FieldValue::Null));
    }

    #[test]
    fn test_null_then_value() {
        let doc = json!([{"N": null}, {"N": 4}]);
        let c = Collection::from_json(&doc, "T").unwrap();
        assert_eq!(c.record_type().fields()[0].kind, Kind::Int);
    }

    #[test]
    fn test_mixed_kinds_rejected() {
        let doc = json!([{"N": "x"}, {"N": 4}]);
        assert!(matches!(Collection::from_json(&doc, "T"), Err(Error::Shape(_))));
    }

    #[test]
    fn test_value_from_json_shapes() {
        let grid = Value::from_json(&json!([["a", "b"], ["1", "2"]]), "Row").unwrap();
        assert_eq!(grid.as_grid().map(Vec::len), Some(2));

        let record = Value::from_json(&json!({"x": true}), "Flag").unwrap();
        assert_eq!(record.as_record().unwrap().record_type().name(), "Flag");

        let scalar = Value::from_json(&json!(3), "n").unwrap();
        assert_eq!(scalar, Value::from(3));
    }

    #[test]
    fn test_from_serialize_keeps_declaration_order() {
        #[derive(Serialize)]
        struct Entry {
            zeta: i32,
            alpha: String,
        }
        let items = vec![Entry {
            zeta: 1,
            alpha: "a".to_string(),
        }];
        let c = Collection::from_serialize(&items, "Entry").unwrap();
        let names: Vec<&str> = c
            .record_type()
            .fields()
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }
}
