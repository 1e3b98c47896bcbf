//! Records, their runtime types and homogeneous collections of them.
//!
//! A [`RecordType`] plays the role a compiled struct type would: it fixes the
//! field order, kinds, visibility and documentation. Records of the same type
//! form a [`Collection`].

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::{FieldValue, Kind};

/// A declared field of a record type
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub kind: Kind,
    /// Hidden fields are never visited by any operation
    pub hidden: bool,
    /// Documentation annotation shown by `describe`
    pub doc: Option<String>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, kind: Kind) -> Self {
        Self {
            name: name.into(),
            kind,
            hidden: false,
            doc: None,
        }
    }

    /// Visible fields are neither hidden nor of an unrepresentable kind
    pub fn is_visible(&self) -> bool {
        !self.hidden && self.kind.is_representable()
    }
}

/// Runtime description of a record shape
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldDecl>,
}

impl RecordType {
    /// Start declaring a record type called `name`
    ///
    /// # Example
    ///
    /// ```
    /// use recordkit::{Kind, RecordType};
    ///
    /// let stock = RecordType::builder("Stock")
    ///     .field("Name", Kind::String)
    ///     .field_with_doc("Volume", Kind::Int, "shares traded today")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(stock.fields().len(), 2);
    /// ```
    pub fn builder(name: impl Into<String>) -> RecordTypeBuilder {
        RecordTypeBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared fields, hidden ones included, in declaration order
    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    /// Visible fields with their declaration index
    pub fn visible_fields(&self) -> impl Iterator<Item = (usize, &FieldDecl)> {
        self.fields.iter().enumerate().filter(|(_, f)| f.is_visible())
    }

    /// Look up a visible field by name
    pub fn visible_field(&self, name: &str) -> Option<(usize, &FieldDecl)> {
        self.visible_fields().find(|(_, f)| f.name == name)
    }

    /// Derive a type that keeps only the named fields, in the order given.
    pub fn project(&self, names: &[&str]) -> Result<(Arc<RecordType>, Vec<usize>)> {
        let mut fields = Vec::with_capacity(names.len());
        let mut indices = Vec::with_capacity(names.len());
        for name in names {
            let (index, decl) = self
                .visible_field(name)
                .ok_or_else(|| Error::field_not_found(*name))?;
            if indices.contains(&index) {
                return Err(Error::argument(format!("column '{}' requested twice", name)));
            }
            fields.push(decl.clone());
            indices.push(index);
        }
        let ty = RecordType {
            name: self.name.clone(),
            fields,
        };
        Ok((Arc::new(ty), indices))
    }
}

/// Builder returned by [`RecordType::builder`]
#[derive(Debug, Clone)]
pub struct RecordTypeBuilder {
    name: String,
    fields: Vec<FieldDecl>,
}

impl RecordTypeBuilder {
    pub fn field(mut self, name: impl Into<String>, kind: Kind) -> Self {
        self.fields.push(FieldDecl::new(name, kind));
        self
    }

    pub fn field_with_doc(
        mut self,
        name: impl Into<String>,
        kind: Kind,
        doc: impl Into<String>,
    ) -> Self {
        let mut decl = FieldDecl::new(name, kind);
        decl.doc = Some(doc.into());
        self.fields.push(decl);
        self
    }

    /// Declare a field that exists but is never reflected
    pub fn hidden(mut self, name: impl Into<String>, kind: Kind) -> Self {
        let mut decl = FieldDecl::new(name, kind);
        decl.hidden = true;
        self.fields.push(decl);
        self
    }

    pub fn push(mut self, decl: FieldDecl) -> Self {
        self.fields.push(decl);
        self
    }

    /// Finish the type. Field names must be non-empty and unique.
    pub fn build(self) -> Result<Arc<RecordType>> {
        for (i, decl) in self.fields.iter().enumerate() {
            if decl.name.is_empty() {
                return Err(Error::argument(format!(
                    "field {} of type '{}' has an empty name",
                    i, self.name
                )));
            }
            if self.fields[..i].iter().any(|f| f.name == decl.name) {
                return Err(Error::argument(format!(
                    "duplicate field '{}' in type '{}'",
                    decl.name, self.name
                )));
            }
        }
        Ok(Arc::new(RecordType {
            name: self.name,
            fields: self.fields,
        }))
    }
}

pub(crate) fn same_type(a: &Arc<RecordType>, b: &Arc<RecordType>) -> bool {
    Arc::ptr_eq(a, b) || **a == **b
}

/// A record instance: one value per declared field
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    ty: Arc<RecordType>,
    values: Vec<FieldValue>,
}

impl Record {
    /// Create a record, checking arity and that every value fits its field's kind.
    pub fn new(ty: Arc<RecordType>, values: Vec<FieldValue>) -> Result<Self> {
        if values.len() != ty.fields.len() {
            return Err(Error::shape(format!(
                "type '{}' has {} fields but {} values were supplied",
                ty.name,
                ty.fields.len(),
                values.len()
            )));
        }
        for (decl, value) in ty.fields.iter().zip(&values) {
            if !decl.kind.admits(value) {
                return Err(Error::shape(format!(
                    "field '{}' of type '{}' expects {} but got {}",
                    decl.name,
                    ty.name,
                    decl.kind,
                    value.describe_kind()
                )));
            }
        }
        Ok(Self { ty, values })
    }

    pub(crate) fn from_parts(ty: Arc<RecordType>, values: Vec<FieldValue>) -> Self {
        debug_assert_eq!(ty.fields.len(), values.len());
        Self { ty, values }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    /// Value of a visible field
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.ty
            .visible_field(name)
            .map(|(index, _)| &self.values[index])
    }

    pub(crate) fn value_at(&self, index: usize) -> &FieldValue {
        &self.values[index]
    }

    /// Visible fields paired with their values, in declaration order
    pub fn visible(&self) -> impl Iterator<Item = (&FieldDecl, &FieldValue)> {
        self.ty
            .fields
            .iter()
            .zip(&self.values)
            .filter(|(decl, _)| decl.is_visible())
    }
}

/// An ordered, homogeneous sequence of records
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    ty: Arc<RecordType>,
    records: Vec<Record>,
}

impl Collection {
    /// Create a collection; every record must be of type `ty`.
    pub fn new(ty: Arc<RecordType>, records: Vec<Record>) -> Result<Self> {
        if let Some((i, stray)) = records
            .iter()
            .enumerate()
            .find(|(_, r)| !same_type(&ty, r.record_type()))
        {
            return Err(Error::shape(format!(
                "element {} is a '{}' but the collection holds '{}'",
                i,
                stray.ty.name,
                ty.name
            )));
        }
        Ok(Self { ty, records })
    }

    pub fn empty(ty: Arc<RecordType>) -> Self {
        Self {
            ty,
            records: Vec::new(),
        }
    }

    /// Create a collection typed after its first record
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let ty = records
            .first()
            .map(|r| r.ty.clone())
            .ok_or_else(|| Error::shape("cannot infer the type of an empty collection"))?;
        Self::new(ty, records)
    }

    /// Same type, different records. Callers guarantee the records come from `self`.
    pub(crate) fn with_records(&self, records: Vec<Record>) -> Self {
        Self {
            ty: self.ty.clone(),
            records,
        }
    }

    pub fn record_type(&self) -> &Arc<RecordType> {
        &self.ty
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
