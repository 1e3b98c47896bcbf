//! Dynamic values that flow through record operations.
//!
//! Records arrive at runtime with shapes nobody compiled against, so every
//! field value is a tagged [`FieldValue`] and every operation argument or
//! result is a [`Value`].

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

use crate::record::{Collection, Record, RecordType};

/// A raw two-dimensional table of strings, header row first.
pub type Grid = Vec<Vec<String>>;

/// The kind of a declared record field
#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    Bool,
    Int,
    Float,
    String,
    Record(Arc<RecordType>),
    Sequence(Box<Kind>),
    Mapping(Box<Kind>),
    /// A field that cannot be reflected (channel, callback, handle). The
    /// string is a label used only for diagnostics.
    Opaque(String),
}

impl Kind {
    /// Whether fields of this kind can be visited by operations
    pub fn is_representable(&self) -> bool {
        !matches!(self, Kind::Opaque(_))
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Kind::Int | Kind::Float)
    }

    /// Check that `value` may be stored in a field of this kind.
    ///
    /// `Null` is admitted by every kind.
    pub fn admits(&self, value: &FieldValue) -> bool {
        match (self, value) {
            (_, FieldValue::Null) => true,
            (Kind::Bool, FieldValue::Bool(_)) => true,
            (Kind::Int, FieldValue::Int(_)) => true,
            (Kind::Float, FieldValue::Float(_)) => true,
            (Kind::String, FieldValue::String(_)) => true,
            (Kind::Record(ty), FieldValue::Record(r)) => {
                Arc::ptr_eq(ty, r.record_type()) || **ty == **r.record_type()
            }
            (Kind::Sequence(elem), FieldValue::List(items)) => items.iter().all(|v| elem.admits(v)),
            (Kind::Mapping(elem), FieldValue::Map(entries)) => {
                entries.values().all(|v| elem.admits(v))
            }
            (Kind::Opaque(_), FieldValue::Opaque(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Bool => write!(f, "bool"),
            Kind::Int => write!(f, "int"),
            Kind::Float => write!(f, "float"),
            Kind::String => write!(f, "string"),
            Kind::Record(ty) => write!(f, "{}", ty.name()),
            Kind::Sequence(elem) => write!(f, "[]{}", elem),
            Kind::Mapping(elem) => write!(f, "map[string]{}", elem),
            Kind::Opaque(label) => write!(f, "{}", label),
        }
    }
}

/// The value of a single record field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Record(Record),
    List(Vec<FieldValue>),
    Map(IndexMap<String, FieldValue>),
    Opaque(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Numeric view used by the comparator
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Alternate rendering: strings quoted, records with field names.
    pub fn alt(&self) -> Alt<'_> {
        Alt(self)
    }

    /// Short label for error messages
    pub fn describe_kind(&self) -> &'static str {
        match self {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::String(_) => "string",
            FieldValue::Record(_) => "record",
            FieldValue::List(_) => "sequence",
            FieldValue::Map(_) => "mapping",
            FieldValue::Opaque(_) => "opaque",
        }
    }
}

/// Floats always keep a decimal point or an exponent so that a rendered
/// float never reads back as an integer.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    write!(f, "{:?}", value)
}

fn write_record(f: &mut fmt::Formatter<'_>, record: &Record) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (_, value)) in record.visible().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "}}")
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "<nil>"),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write_float(f, *fl),
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Record(r) => write_record(f, r),
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            FieldValue::Map(entries) => {
                write!(f, "map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}:{}", key, value)?;
                }
                write!(f, "]")
            }
            FieldValue::Opaque(label) => write!(f, "{}", label),
        }
    }
}

/// Display adapter produced by [`FieldValue::alt`]
pub struct Alt<'a>(&'a FieldValue);

impl fmt::Display for Alt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            FieldValue::Null => write!(f, "nil"),
            FieldValue::String(s) => write!(f, "{:?}", s),
            FieldValue::Record(r) => {
                write!(f, "{}{{", r.record_type().name())?;
                for (i, (decl, value)) in r.visible().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}:{}", decl.name, value.alt())?;
                }
                write!(f, "}}")
            }
            FieldValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item.alt())?;
                }
                write!(f, "]")
            }
            FieldValue::Map(entries) => {
                write!(f, "map[")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{:?}:{}", key, value.alt())?;
                }
                write!(f, "]")
            }
            other => write!(f, "{}", other),
        }
    }
}

/// An operation argument or result
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Field(FieldValue),
    Collection(Collection),
    Grid(Grid),
}

impl Value {
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Value::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Field(FieldValue::Record(r)) => Some(r),
            _ => None,
        }
    }

    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Value::Grid(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Field(FieldValue::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Field(FieldValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Field(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn describe_kind(&self) -> &'static str {
        match self {
            Value::Field(v) => v.describe_kind(),
            Value::Collection(_) => "collection",
            Value::Grid(_) => "grid",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Field(v) => write!(f, "{}", v),
            Value::Collection(c) => {
                write!(f, "[")?;
                for (i, record) in c.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write_record(f, record)?;
                }
                write!(f, "]")
            }
            Value::Grid(rows) => {
                write!(f, "[")?;
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "[{}]", row.join(" "))?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<FieldValue> for Value {
    fn from(value: FieldValue) -> Self {
        Value::Field(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Field(FieldValue::Record(record))
    }
}

impl From<Collection> for Value {
    fn from(collection: Collection) -> Self {
        Value::Collection(collection)
    }
}

impl From<Grid> for Value {
    fn from(grid: Grid) -> Self {
        Value::Grid(grid)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Field(FieldValue::String(s.to_string()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Field(FieldValue::String(s))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Field(FieldValue::Int(i))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Field(FieldValue::Bool(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_keeps_decimal_point() {
        assert_eq!(FieldValue::Float(2.0).to_string(), "2.0");
        assert_eq!(FieldValue::Float(0.25).to_string(), "0.25");
        assert_eq!(FieldValue::Int(2).to_string(), "2");
    }

    #[test]
    fn test_alt_quotes_strings() {
        let value = FieldValue::String("say \"hi\"".to_string());
        assert_eq!(value.to_string(), "say \"hi\"");
        assert_eq!(value.alt().to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(FieldValue::Null.alt().to_string(), "nil");
    }

    #[test]
    fn test_list_and_map_rendering() {
        let list = FieldValue::List(vec![FieldValue::Int(1), FieldValue::Int(2)]);
        assert_eq!(list.to_string(), "[1 2]");
        assert_eq!(list.alt().to_string(), "[1, 2]");

        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), FieldValue::Int(1));
        let map = FieldValue::Map(entries);
        assert_eq!(map.to_string(), "map[a:1]");
        assert_eq!(map.alt().to_string(), "map[\"a\":1]");
    }

    #[test]
    fn test_kind_admits() {
        assert!(Kind::Int.admits(&FieldValue::Int(3)));
        assert!(Kind::Int.admits(&FieldValue::Null));
        assert!(!Kind::Int.admits(&FieldValue::String("3".to_string())));

        let seq = Kind::Sequence(Box::new(Kind::String));
        assert!(seq.admits(&FieldValue::List(vec![FieldValue::String("x".to_string())])));
        assert!(!seq.admits(&FieldValue::List(vec![FieldValue::Int(1)])));
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(Kind::Sequence(Box::new(Kind::Int)).to_string(), "[]int");
        assert_eq!(Kind::Mapping(Box::new(Kind::Float)).to_string(), "map[string]float");
    }
}
