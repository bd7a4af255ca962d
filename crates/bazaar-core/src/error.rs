//! # Error Types
//!
//! Domain-specific error types for bazaar-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bazaar-core errors (this file)                                        │
//! │  ├── ValidationError  - One field failed a rule                        │
//! │  ├── BuildError       - A builder rejected its input (all problems)    │
//! │  ├── MapError         - A mapper rejected an external record           │
//! │  └── CoreError        - Umbrella for the above + unknown tags          │
//! │                                                                         │
//! │  bazaar-db errors (separate crate)                                     │
//! │  └── DbError          - Repository and store failures                  │
//! │                                                                         │
//! │  Flow: ValidationError → BuildError → MapError → caller                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation and malformed-input errors indicate bad input. They are raised
//! before any I/O and are never worth retrying.

use thiserror::Error;

use crate::mapper::{Direction, Format};
use crate::types::ItemCategory;

// =============================================================================
// Validation Error
// =============================================================================

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is unset, null or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field holds a value of the wrong semantic type.
    #[error("{field} must be {expected}, got {found}")]
    IncorrectType {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Returns the name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::IncorrectType { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::OutOfRange { field, .. } => field,
        }
    }

    /// True when the problem is an absent value rather than a bad one.
    pub fn is_missing(&self) -> bool {
        matches!(self, ValidationError::Required { .. })
    }
}

// =============================================================================
// Build Error
// =============================================================================

/// A builder refused to produce a value.
///
/// Every problem found is reported, not just the first. The variant tells
/// the caller which kind of problem dominates: any missing field makes the
/// whole build a `MissingProperty` failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("Missing required property for {entity}")]
    MissingProperty {
        entity: &'static str,
        problems: Vec<ValidationError>,
    },

    #[error("Incorrect data type for {entity}")]
    IncorrectType {
        entity: &'static str,
        problems: Vec<ValidationError>,
    },
}

impl BuildError {
    /// Classifies a non-empty problem list for `entity`.
    pub fn from_problems(entity: &'static str, problems: Vec<ValidationError>) -> Self {
        if problems.iter().any(ValidationError::is_missing) {
            BuildError::MissingProperty { entity, problems }
        } else {
            BuildError::IncorrectType { entity, problems }
        }
    }

    /// The entity the builder was constructing ("Cake", "Order", ...).
    pub fn entity(&self) -> &'static str {
        match self {
            BuildError::MissingProperty { entity, .. } | BuildError::IncorrectType { entity, .. } => {
                entity
            }
        }
    }

    /// Every field-level problem found during the build.
    pub fn problems(&self) -> &[ValidationError] {
        match self {
            BuildError::MissingProperty { problems, .. }
            | BuildError::IncorrectType { problems, .. } => problems,
        }
    }

    /// True if `field` is among the reported problems.
    pub fn mentions(&self, field: &str) -> bool {
        self.problems().iter().any(|p| p.field() == field)
    }
}

// =============================================================================
// Map Error
// =============================================================================

/// Errors raised while translating external records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The record is structurally unusable (wrong shape, too few columns).
    /// Raised before any builder runs.
    #[error("Malformed {format} input: {reason}")]
    Malformed { format: Format, reason: String },

    /// The record was well-formed but its values failed validation.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// An identifier failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The mapper only supports the other direction.
    #[error("{direction} mapping is not implemented for {format} records")]
    NotImplemented { format: Format, direction: Direction },

    /// No mapper exists for this category and format.
    #[error("No {format} mapper for category {category}")]
    UnsupportedMapper {
        category: ItemCategory,
        format: Format,
    },
}

impl MapError {
    /// Creates a Malformed error.
    pub fn malformed(format: Format, reason: impl Into<String>) -> Self {
        MapError::Malformed {
            format,
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Umbrella error for callers that do not care which layer failed.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Category tag outside {cake, book, toy}.
    #[error("Unsupported item category: {0}")]
    UnsupportedCategory(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Map(#[from] MapError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result of a builder.
pub type BuildResult<T> = Result<T, BuildError>;

/// Result of a mapper.
pub type MapResult<T> = Result<T, MapError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("flavor");
        assert_eq!(err.to_string(), "flavor is required");

        let err = ValidationError::IncorrectType {
            field: "layers".to_string(),
            expected: "a string",
            found: "an array",
        };
        assert_eq!(err.to_string(), "layers must be a string, got an array");
    }

    #[test]
    fn test_build_error_classification() {
        let err = BuildError::from_problems(
            "Cake",
            vec![
                ValidationError::IncorrectType {
                    field: "shape".to_string(),
                    expected: "a string",
                    found: "an object",
                },
                ValidationError::required("flavor"),
            ],
        );
        assert!(matches!(err, BuildError::MissingProperty { .. }));
        assert_eq!(err.to_string(), "Missing required property for Cake");
        assert!(err.mentions("flavor"));
        assert!(err.mentions("shape"));

        let err = BuildError::from_problems(
            "Toy",
            vec![ValidationError::IncorrectType {
                field: "brand".to_string(),
                expected: "a string",
                found: "a list",
            }],
        );
        assert_eq!(err.to_string(), "Incorrect data type for Toy");
    }

    #[test]
    fn test_map_error_messages() {
        let err = MapError::malformed(Format::Delimited, "expected at least 17 columns, got 2");
        assert_eq!(
            err.to_string(),
            "Malformed delimited input: expected at least 17 columns, got 2"
        );

        let err = MapError::NotImplemented {
            format: Format::Markup,
            direction: Direction::Reverse,
        };
        assert_eq!(
            err.to_string(),
            "reverse mapping is not implemented for markup records"
        );
    }

    #[test]
    fn test_build_error_converts_to_core_error() {
        let build = BuildError::from_problems("Book", vec![ValidationError::required("title")]);
        let core: CoreError = MapError::from(build).into();
        assert!(matches!(core, CoreError::Map(MapError::Build(_))));
    }
}
