//! Object schemas for documents
//!
//! A `Schema` is an ordered list of named fields. Unknown fields pass through
//! unless the schema is strict; `_id` is always accepted.

use crate::errors::{FieldPath, ValidationErrors, ValidationResult};
use crate::types::FieldType;
use crate::validators::validate_document;
use bson::{Bson, Document};

/// Field name MongoDB reserves for the primary key
pub const ID_FIELD: &str = "_id";

/// A single named field of a schema
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: FieldType,
    pub required: bool,
    /// Filled in by [`Schema::parse`] when the field is absent
    pub default: Option<Bson>,
}

impl Field {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: true,
            default: None,
        }
    }
}

/// Shape of the documents stored in one collection
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
    strict: bool,
}

impl Schema {
    /// Empty object schema; accepts any document
    pub fn object() -> Self {
        Self::default()
    }

    /// Add a required field
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.push(Field::new(name, field_type));
        self
    }

    /// Add a field that may be absent
    pub fn optional(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        let mut field = Field::new(name, field_type);
        field.required = false;
        self.push(field);
        self
    }

    /// Add a field that takes `default` when absent
    pub fn with_default(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        default: impl Into<Bson>,
    ) -> Self {
        let mut field = Field::new(name, field_type);
        field.required = false;
        field.default = Some(default.into());
        self.push(field);
        self
    }

    /// Reject fields the schema does not declare
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    // Redeclaring a field replaces the earlier declaration.
    fn push(&mut self, field: Field) {
        self.fields.retain(|f| f.name != field.name);
        self.fields.push(field);
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validate a document, reporting errors under the `document` location
    pub fn validate(&self, doc: &Document) -> ValidationResult<()> {
        self.validate_at("document", doc)
    }

    /// Validate a document, reporting errors under a custom location
    pub fn validate_at(&self, location: &str, doc: &Document) -> ValidationResult<()> {
        let mut errors = ValidationErrors::new();
        validate_document(doc, self, &FieldPath::root(location), &mut errors);
        errors.into_result()
    }

    /// Fill in defaults for absent fields, then validate
    pub fn parse(&self, mut doc: Document) -> ValidationResult<Document> {
        for field in &self.fields {
            if let Some(default) = &field.default {
                if !doc.contains_key(&field.name) {
                    doc.insert(field.name.clone(), default.clone());
                }
            }
        }
        self.validate(&doc)?;
        Ok(doc)
    }
}
