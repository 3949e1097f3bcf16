//! Field types for document schemas
//!
//! Values are plain `bson::Bson`; a `FieldType` describes what a field may hold.

use crate::constraints::{NumericConstraints, StringConstraints, StringFormat};
use crate::schema::Schema;
use bson::Bson;

// ============================================================================
// FieldType
// ============================================================================

/// Type of a single document field
#[derive(Debug, Clone)]
pub enum FieldType {
    String(StringConstraints),

    /// Int32 or Int64
    Int(NumericConstraints<i64>),

    /// Any BSON number
    Float(NumericConstraints<f64>),

    Bool,

    ObjectId,

    DateTime,

    /// Array whose items all have the given type
    List(Box<FieldType>),

    /// Embedded document
    Object(Schema),

    /// Null is accepted in addition to the inner type
    Nullable(Box<FieldType>),

    Any,
}

impl FieldType {
    pub fn string() -> Self {
        Self::String(StringConstraints::default())
    }

    pub fn non_empty_string() -> Self {
        Self::String(StringConstraints::non_empty())
    }

    pub fn email() -> Self {
        Self::String(StringConstraints::with_format(StringFormat::Email))
    }

    pub fn int() -> Self {
        Self::Int(NumericConstraints::default())
    }

    pub fn float() -> Self {
        Self::Float(NumericConstraints::default())
    }

    pub fn list(items: FieldType) -> Self {
        Self::List(Box::new(items))
    }

    pub fn nullable(inner: FieldType) -> Self {
        Self::Nullable(Box::new(inner))
    }

    /// Human-readable type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Int(_) => "integer",
            Self::Float(_) => "number",
            Self::Bool => "boolean",
            Self::ObjectId => "objectid",
            Self::DateTime => "datetime",
            Self::List(_) => "array",
            Self::Object(_) => "object",
            Self::Nullable(inner) => inner.type_name(),
            Self::Any => "any",
        }
    }
}

/// Human-readable name of a BSON value's type
pub fn bson_type_name(value: &Bson) -> &'static str {
    match value {
        Bson::Null | Bson::Undefined => "null",
        Bson::Boolean(_) => "boolean",
        Bson::Int32(_) | Bson::Int64(_) => "integer",
        Bson::Double(_) => "double",
        Bson::Decimal128(_) => "decimal128",
        Bson::String(_) | Bson::Symbol(_) => "string",
        Bson::Array(_) => "array",
        Bson::Document(_) => "object",
        Bson::ObjectId(_) => "objectid",
        Bson::DateTime(_) | Bson::Timestamp(_) => "datetime",
        Bson::Binary(_) => "binary",
        _ => "other",
    }
}
