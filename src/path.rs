//! Dotted field paths and their resolution against records.
//!
//! Resolution walks left to right. Every segment but the last must land on a
//! nested record; the last may land on any visible field.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::record::{Record, RecordType};
use crate::value::{FieldValue, Kind};

/// A path to a (possibly nested) field, e.g. `user.credentials.name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    /// The raw path string
    pub raw: String,
    /// Field names, outermost first
    pub segments: Vec<String>,
}

impl FieldPath {
    /// Parse a path with the given delimiter.
    ///
    /// # Example
    ///
    /// ```
    /// use recordkit::FieldPath;
    ///
    /// let path = FieldPath::parse("user.credentials.name", ".").unwrap();
    /// assert_eq!(path.segments.len(), 3);
    /// ```
    pub fn parse(path: &str, delimiter: &str) -> Result<Self> {
        if path.is_empty() {
            return Err(Error::argument("empty field path"));
        }
        let segments: Vec<String> = path.split(delimiter).map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(Error::argument(format!("malformed field path '{}'", path)));
        }
        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    pub fn from_dotted(path: &str) -> Result<Self> {
        Self::parse(path, ".")
    }

    /// A single-segment path. The name is taken literally, dots included.
    pub fn single(name: &str) -> Self {
        Self {
            raw: name.to_string(),
            segments: vec![name.to_string()],
        }
    }

    /// Resolve this path against a record instance.
    pub fn resolve<'r>(&self, record: &'r Record) -> Result<&'r FieldValue> {
        let (last, intermediate) = self
            .segments
            .split_last()
            .ok_or_else(|| Error::argument("empty field path"))?;

        let mut current = record;
        for segment in intermediate {
            current = match lookup(current, segment)? {
                FieldValue::Record(nested) => nested,
                _ => {
                    return Err(Error::NotARecord {
                        segment: segment.clone(),
                    })
                }
            };
        }
        lookup(current, last)
    }

    /// Resolve this path against a record type, returning the final field's kind.
    ///
    /// Used to validate a path before touching any instance, so that empty
    /// collections still report bad paths.
    pub fn resolve_kind<'t>(&self, ty: &'t Arc<RecordType>) -> Result<&'t Kind> {
        let (last, intermediate) = self
            .segments
            .split_last()
            .ok_or_else(|| Error::argument("empty field path"))?;

        let mut current: &Arc<RecordType> = ty;
        for segment in intermediate {
            let (_, decl) = current
                .visible_field(segment)
                .ok_or_else(|| Error::field_not_found(segment.clone()))?;
            current = match &decl.kind {
                Kind::Record(nested) => nested,
                _ => {
                    return Err(Error::NotARecord {
                        segment: segment.clone(),
                    })
                }
            };
        }
        current
            .visible_field(last)
            .map(|(_, decl)| &decl.kind)
            .ok_or_else(|| Error::field_not_found(last.clone()))
    }
}

fn lookup<'r>(record: &'r Record, name: &str) -> Result<&'r FieldValue> {
    record.get(name).ok_or_else(|| Error::field_not_found(name))
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}
