//! Core validation engine
//!
//! Walks a document against its schema and accumulates every failure.

use crate::constraints::{NumericConstraints, StringConstraints, StringFormat};
use crate::errors::{FieldPath, ValidationErrors, Violation};
use crate::formats;
use crate::schema::{Schema, ID_FIELD};
use crate::types::{bson_type_name, FieldType};
use bson::{Bson, Document};
use regex::Regex;
use std::fmt::Display;

/// Validate every declared field of `doc`, then reject undeclared fields if
/// the schema is strict
pub fn validate_document(
    doc: &Document,
    schema: &Schema,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    for field in schema.fields() {
        let field_path = path.key(&field.name);
        match doc.get(&field.name) {
            Some(value) => validate_value(value, &field.field_type, &field_path, errors),
            None if field.required => errors.push(&field_path, Violation::Missing),
            None => {}
        }
    }

    if schema.is_strict() {
        for key in doc.keys() {
            if key != ID_FIELD && schema.get(key).is_none() {
                errors.push(&path.key(key), Violation::Unrecognized);
            }
        }
    }
}

/// Validate a single value against a field type
pub fn validate_value(
    value: &Bson,
    field_type: &FieldType,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    match (field_type, value) {
        (FieldType::Any, _) => {}
        (FieldType::Nullable(_), Bson::Null) => {}
        (FieldType::Nullable(inner), _) => validate_value(value, inner, path, errors),
        (FieldType::String(constraints), Bson::String(s)) => {
            check_string(s, constraints, path, errors)
        }
        (FieldType::Int(constraints), Bson::Int32(n)) => {
            check_bounds(i64::from(*n), constraints, path, errors)
        }
        (FieldType::Int(constraints), Bson::Int64(n)) => check_bounds(*n, constraints, path, errors),
        (FieldType::Float(constraints), Bson::Int32(n)) => {
            check_bounds(f64::from(*n), constraints, path, errors)
        }
        (FieldType::Float(constraints), Bson::Int64(n)) => {
            check_bounds(*n as f64, constraints, path, errors)
        }
        (FieldType::Float(constraints), Bson::Double(n)) => {
            check_bounds(*n, constraints, path, errors)
        }
        (FieldType::Bool, Bson::Boolean(_))
        | (FieldType::ObjectId, Bson::ObjectId(_))
        | (FieldType::DateTime, Bson::DateTime(_)) => {}
        (FieldType::List(items), Bson::Array(values)) => {
            for (index, item) in values.iter().enumerate() {
                validate_value(item, items, &path.index(index), errors);
            }
        }
        (FieldType::Object(schema), Bson::Document(doc)) => {
            validate_document(doc, schema, path, errors)
        }
        _ => errors.push(
            path,
            Violation::TypeMismatch {
                expected: field_type.type_name(),
                found: bson_type_name(value),
            },
        ),
    }
}

fn check_string(
    s: &str,
    constraints: &StringConstraints,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) {
    let actual = s.chars().count();

    if let Some(min) = constraints.min_length.filter(|min| actual < *min) {
        errors.push(path, Violation::TooShort { min, actual });
    }
    if let Some(max) = constraints.max_length.filter(|max| actual > *max) {
        errors.push(path, Violation::TooLong { max, actual });
    }

    if let Some(pattern) = &constraints.pattern {
        match Regex::new(pattern) {
            Ok(re) if !re.is_match(s) => {
                errors.push(path, Violation::PatternMismatch(pattern.clone()))
            }
            Ok(_) => {}
            Err(e) => errors.push(
                path,
                Violation::InvalidPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                },
            ),
        }
    }

    if let Some(format) = constraints.format {
        let valid = match format {
            StringFormat::Email => formats::validate_email(s),
            StringFormat::Url => formats::validate_url(s),
            StringFormat::Uuid => formats::validate_uuid(s),
            StringFormat::ConnectionString => formats::validate_connection_string(s),
        };
        if !valid {
            errors.push(path, Violation::InvalidFormat(format));
        }
    }
}

fn check_bounds<T>(
    n: T,
    constraints: &NumericConstraints<T>,
    path: &FieldPath,
    errors: &mut ValidationErrors,
) where
    T: PartialOrd + Display + Copy,
{
    if let Some(min) = constraints.minimum.filter(|min| n < *min) {
        errors.push(
            path,
            Violation::BelowMinimum {
                min: min.to_string(),
                actual: n.to_string(),
            },
        );
    }
    if let Some(max) = constraints.maximum.filter(|max| n > *max) {
        errors.push(
            path,
            Violation::AboveMaximum {
                max: max.to_string(),
                actual: n.to_string(),
            },
        );
    }
}
