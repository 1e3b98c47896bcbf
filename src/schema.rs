//! Structural description of record types.
//!
//! A [`Schema`] is computed on demand from a [`RecordType`] and never
//! mutated. Hidden and unrepresentable fields are left out of the field list;
//! each listed field keeps its declaration index.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record::RecordType;
use crate::value::{FieldValue, Kind, Value};

/// Maximum nesting depth walked by the introspector
pub const MAX_DEPTH: usize = 32;

const INDENT: &str = "    ";

/// Description of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub type_name: String,
    pub fields: Vec<SchemaField>,
}

/// One visible field of a [`Schema`]
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    /// Position among all declared fields, hidden ones included
    pub index: usize,
    /// Type label, e.g. `int`, `[]string`, `Address`
    pub kind: String,
    /// Schema of the record reached through this field, directly or as the
    /// element type of a sequence or mapping
    pub nested: Option<Box<Schema>>,
    pub doc: Option<String>,
}

impl Schema {
    /// Walk `ty` and describe it.
    pub fn of(ty: &RecordType) -> Result<Self> {
        Self::walk(ty, 0)
    }

    fn walk(ty: &RecordType, depth: usize) -> Result<Self> {
        if depth >= MAX_DEPTH {
            return Err(Error::argument(format!(
                "type '{}' nests deeper than {} levels",
                ty.name(),
                MAX_DEPTH
            )));
        }

        let mut fields = Vec::new();
        for (index, decl) in ty.visible_fields() {
            let nested = match record_element(&decl.kind) {
                Some(inner) => Some(Box::new(Self::walk(inner, depth + 1)?)),
                None => None,
            };
            fields.push(SchemaField {
                name: decl.name.clone(),
                index,
                kind: decl.kind.to_string(),
                nested,
                doc: decl.doc.clone(),
            });
        }

        Ok(Self {
            type_name: ty.name().to_string(),
            fields,
        })
    }

    /// Compact listing of the type, one field per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, depth: usize) {
        out.push_str("{\n");
        for field in &self.fields {
            let pad = INDENT.repeat(depth + 1);
            let _ = write!(out, "{}{} {}", pad, field.name, field.kind);
            if let Some(nested) = &field.nested {
                out.push(' ');
                nested.render_into(out, depth + 1);
            }
            if let Some(doc) = &field.doc {
                let _ = write!(out, " // {}", doc);
            }
            out.push('\n');
        }
        out.push_str(&INDENT.repeat(depth));
        out.push('}');
    }
}

/// The record type a kind ultimately holds, looking through sequences and mappings
fn record_element(kind: &Kind) -> Option<&Arc<RecordType>> {
    match kind {
        Kind::Record(ty) => Some(ty),
        Kind::Sequence(elem) | Kind::Mapping(elem) => record_element(elem),
        _ => None,
    }
}

/// Describe the type of any value.
///
/// Collections render as `[]Name {...}`, records as `Name {...}`, grids as
/// `[][]string` and scalars by their kind.
pub fn describe(value: &Value) -> Result<String> {
    let mut out = String::new();
    match value {
        Value::Collection(c) => {
            let schema = Schema::of(c.record_type())?;
            let _ = write!(out, "[]{} {}", schema.type_name, schema.render());
        }
        Value::Field(FieldValue::Record(r)) => {
            let schema = Schema::of(r.record_type())?;
            let _ = write!(out, "{} {}", schema.type_name, schema.render());
        }
        Value::Grid(_) => out.push_str("[][]string"),
        Value::Field(v) => out.push_str(&scalar_label(v)),
    }
    out.push('\n');
    Ok(out)
}

fn scalar_label(value: &FieldValue) -> String {
    match value {
        FieldValue::List(items) => match items.first() {
            Some(first) => format!("[]{}", scalar_label(first)),
            None => "[]".to_string(),
        },
        FieldValue::Map(entries) => match entries.values().next() {
            Some(first) => format!("map[string]{}", scalar_label(first)),
            None => "map[string]".to_string(),
        },
        FieldValue::Record(r) => r.record_type().name().to_string(),
        other => other.describe_kind().to_string(),
    }
}
