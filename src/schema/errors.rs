//! Schema error types
//!
//! Error codes:
//! - TOURNEY_VALIDATION_FAILED (REJECT)
//!
//! A validation error carries every violated constraint of a candidate, not
//! just the first one encountered.

use std::fmt;

use serde::Serialize;

use super::types::EntityKind;

/// Schema error code for constraint violations
pub const VALIDATION_FAILED: &str = "TOURNEY_VALIDATION_FAILED";

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Field name
    pub field: String,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl Violation {
    pub fn new(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(field, expected, actual)
    }

    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(field, "field to be present", "missing")
    }

    pub fn extra_field(field: impl Into<String>) -> Self {
        Self::new(field, "no undeclared fields", "extra field present")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// A candidate record violated one or more schema constraints.
///
/// Raised before any storage I/O takes place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    entity: EntityKind,
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Create a validation error. `violations` should not be empty.
    pub fn new(entity: EntityKind, violations: Vec<Violation>) -> Self {
        Self { entity, violations }
    }

    /// Returns the error code string
    pub fn code(&self) -> &'static str {
        VALIDATION_FAILED
    }

    /// Returns the entity type that failed validation
    pub fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Returns every violated constraint
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true if the named field has at least one violation
    pub fn has_violation(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REJECT] {}: invalid {}", VALIDATION_FAILED, self.entity)?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, ValidationError>;
