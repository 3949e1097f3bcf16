//! Typed Collection Schema
//!
//! Object schemas for the documents held by a typed collection: an ordered set
//! of named fields, each with a type and optional constraints.
//!
//! # Example
//!
//! ```rust
//! use bson::doc;
//! use typed_collection_schema::{FieldType, Schema};
//!
//! let orders = Schema::object()
//!     .field("customer", FieldType::non_empty_string())
//!     .field("total", FieldType::float())
//!     .with_default("status", FieldType::string(), "open");
//!
//! let parsed = orders.parse(doc! { "customer": "acme", "total": 12.5 }).unwrap();
//! assert_eq!(parsed.get_str("status").unwrap(), "open");
//!
//! assert!(orders.validate(&doc! { "customer": "", "total": "12" }).is_err());
//! ```

pub mod constraints;
pub mod errors;
pub mod formats;
pub mod schema;
pub mod types;
pub mod validators;

pub use constraints::{NumericConstraints, StringConstraints, StringFormat};
pub use errors::{FieldPath, PathSegment, ValidationError, ValidationErrors, ValidationResult, Violation};
pub use schema::{Field, Schema, ID_FIELD};
pub use types::{bson_type_name, FieldType};
pub use validators::{validate_document, validate_value};
