//! Validation failures
//!
//! Every failure is a [`Violation`] at a [`FieldPath`]. Paths use MongoDB dot
//! notation below a named root, so `lines.0.sku` can be fed straight back
//! into a query or an update.

use crate::constraints::StringFormat;
use std::fmt;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// One step into a BSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Position of a value inside the document being checked
///
/// Descending returns a new path; the parent is left untouched, so sibling
/// fields never see each other's segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPath {
    root: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Path of the checked value itself, e.g. `document` or `params`
    pub fn root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            segments: Vec::new(),
        }
    }

    pub fn key(&self, key: &str) -> Self {
        self.child(PathSegment::Key(key.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.child(PathSegment::Index(index))
    }

    fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self {
            root: self.root.clone(),
            segments,
        }
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Dot-notation path below the root; empty for the root itself
    pub fn dotted(&self) -> String {
        self.segments
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// What was wrong with a value
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    TooShort {
        min: usize,
        actual: usize,
    },
    TooLong {
        max: usize,
        actual: usize,
    },
    PatternMismatch(String),
    /// The schema's own pattern does not compile
    InvalidPattern {
        pattern: String,
        reason: String,
    },
    InvalidFormat(StringFormat),
    BelowMinimum {
        min: String,
        actual: String,
    },
    AboveMaximum {
        max: String,
        actual: String,
    },
    Missing,
    /// Key not declared on a strict schema
    Unrecognized,
}

impl Violation {
    /// True for failures caused by the value's BSON type rather than its content
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch { expected, found } => {
                write!(f, "Expected {}, got {}", expected, found)
            }
            Self::TooShort { min, actual } => write!(
                f,
                "String must be at least {} characters (got {})",
                min, actual
            ),
            Self::TooLong { max, actual } => write!(
                f,
                "String must be at most {} characters (got {})",
                max, actual
            ),
            Self::PatternMismatch(pattern) => {
                write!(f, "String does not match pattern '{}'", pattern)
            }
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid pattern '{}': {}", pattern, reason)
            }
            Self::InvalidFormat(format) => write!(f, "Invalid {} format", format.name()),
            Self::BelowMinimum { min, actual } => {
                write!(f, "Value must be >= {} (got {})", min, actual)
            }
            Self::AboveMaximum { max, actual } => {
                write!(f, "Value must be <= {} (got {})", max, actual)
            }
            Self::Missing => f.write_str("Field required"),
            Self::Unrecognized => f.write_str("Unrecognized field"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub path: FieldPath,
    pub violation: Violation,
}

impl ValidationError {
    /// Root of the checked value
    pub fn location(&self) -> &str {
        self.path.root_name()
    }

    /// Dot-notation field below the root
    pub fn field(&self) -> String {
        self.path.dotted()
    }

    pub fn message(&self) -> String {
        self.violation.to_string()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.violation)
    }
}

/// Every failure found by one schema check, in document order
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: Vec<ValidationError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: &FieldPath, violation: Violation) {
        self.errors.push(ValidationError {
            path: path.clone(),
            violation,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Dot-notation fields that failed
    pub fn fields(&self) -> Vec<String> {
        self.errors.iter().map(ValidationError::field).collect()
    }

    pub fn into_result(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for error in &self.errors {
            write!(f, "\n  {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_uses_dot_notation() {
        let root = FieldPath::root("document");
        let sku = root.key("lines").index(0).key("sku");

        assert_eq!(sku.dotted(), "lines.0.sku");
        assert_eq!(sku.to_string(), "document.lines.0.sku");
        assert_eq!(sku.root_name(), "document");
        assert_eq!(sku.segments()[1], PathSegment::Index(0));
        // Parent is unchanged
        assert_eq!(root.dotted(), "");
        assert_eq!(root.to_string(), "document");
    }

    #[test]
    fn test_error_accessors() {
        let mut errors = ValidationErrors::new();
        errors.push(
            &FieldPath::root("params").key("connectionString"),
            Violation::TypeMismatch {
                expected: "string",
                found: "integer",
            },
        );

        let error = &errors.as_slice()[0];
        assert_eq!(error.location(), "params");
        assert_eq!(error.field(), "connectionString");
        assert_eq!(error.message(), "Expected string, got integer");
        assert!(error.violation.is_type_mismatch());
    }

    #[test]
    fn test_display_lists_each_error() {
        let mut errors = ValidationErrors::new();
        let customer = FieldPath::root("document").key("customer");
        errors.push(&customer.key("name"), Violation::Missing);
        errors.push(&customer.key("email"), Violation::InvalidFormat(StringFormat::Email));

        assert_eq!(
            errors.to_string(),
            "2 validation error(s)\n  document.customer.name: Field required\n  document.customer.email: Invalid email format"
        );
        assert_eq!(errors.fields(), vec!["customer.name", "customer.email"]);
    }

    #[test]
    fn test_into_result() {
        assert!(ValidationErrors::new().into_result().is_ok());

        let mut errors = ValidationErrors::new();
        errors.push(&FieldPath::root("document").key("extra"), Violation::Unrecognized);
        assert_eq!(errors.into_result().unwrap_err().len(), 1);
    }
}
