//! Constraints for string and numeric fields

// ============================================================================
// String Constraints
// ============================================================================

/// Constraints for string validation
#[derive(Debug, Clone, Default)]
pub struct StringConstraints {
    /// Minimum length (in characters, not bytes)
    pub min_length: Option<usize>,
    /// Maximum length (in characters, not bytes)
    pub max_length: Option<usize>,
    /// Regex pattern (compiled at validation time)
    pub pattern: Option<String>,
    pub format: Option<StringFormat>,
}

impl StringConstraints {
    /// Non-empty string
    pub fn non_empty() -> Self {
        Self {
            min_length: Some(1),
            ..Default::default()
        }
    }

    pub fn with_format(format: StringFormat) -> Self {
        Self {
            format: Some(format),
            ..Default::default()
        }
    }
}

/// Predefined string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    /// http/https
    Url,
    Uuid,
    /// mongodb:// or mongodb+srv://
    ConnectionString,
}

impl StringFormat {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Url => "url",
            Self::Uuid => "uuid",
            Self::ConnectionString => "connection string",
        }
    }
}

// ============================================================================
// Numeric Constraints
// ============================================================================

/// Inclusive bounds for numeric fields
#[derive(Debug, Clone, Default)]
pub struct NumericConstraints<T> {
    pub minimum: Option<T>,
    pub maximum: Option<T>,
}

impl<T> NumericConstraints<T> {
    pub fn range(minimum: T, maximum: T) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: Some(maximum),
        }
    }

    pub fn at_least(minimum: T) -> Self {
        Self {
            minimum: Some(minimum),
            maximum: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_constraints_default() {
        let constraints = StringConstraints::default();
        assert!(constraints.min_length.is_none());
        assert!(constraints.max_length.is_none());
        assert!(constraints.pattern.is_none());
        assert!(constraints.format.is_none());
    }

    #[test]
    fn test_string_constraints_non_empty() {
        let constraints = StringConstraints::non_empty();
        assert_eq!(constraints.min_length, Some(1));
        assert!(constraints.format.is_none());
    }

    #[test]
    fn test_numeric_constraints_helpers() {
        let range = NumericConstraints::range(0i64, 10);
        assert_eq!(range.minimum, Some(0));
        assert_eq!(range.maximum, Some(10));

        let floor = NumericConstraints::at_least(0.0f64);
        assert_eq!(floor.minimum, Some(0.0));
        assert!(floor.maximum.is_none());
    }

    #[test]
    fn test_string_format_name() {
        assert_eq!(StringFormat::Email.name(), "email");
        assert_eq!(StringFormat::ConnectionString.name(), "connection string");
    }
}
