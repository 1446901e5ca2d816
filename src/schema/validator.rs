//! Schema validator for candidate records
//!
//! Validation semantics:
//! - The candidate supplies exactly one value per declared field, in order
//! - Each value has the declared type (no coercion)
//! - Each declared constraint holds
//!
//! Validation never stops at the first failure: every violation is collected
//! so the caller can report them all at once. The validator does not mutate
//! its input and is deterministic.

use super::errors::{SchemaResult, ValidationError, Violation};
use super::types::{Constraint, EntityKind, FieldDef, FieldValue, Schema};

/// Validator bound to one static schema.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator {
    schema: &'static Schema,
}

impl SchemaValidator {
    /// Creates a validator for the given schema
    pub fn new(schema: &'static Schema) -> Self {
        Self { schema }
    }

    /// Creates a validator for an entity kind
    pub fn for_kind(kind: EntityKind) -> Self {
        Self::new(kind.schema())
    }

    /// Returns the schema this validator enforces
    pub fn schema(&self) -> &'static Schema {
        self.schema
    }

    /// Validates schema-ordered field values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` listing every violated constraint.
    pub fn validate(&self, values: &[FieldValue]) -> SchemaResult<()> {
        let mut violations = Vec::new();

        for (i, def) in self.schema.fields.iter().enumerate() {
            match values.get(i) {
                Some(value) => check_field(def, value, &mut violations),
                None => violations.push(Violation::missing_field(def.name)),
            }
        }

        for i in self.schema.len()..values.len() {
            violations.push(Violation::extra_field(format!("${}", i)));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.schema.kind, violations))
        }
    }
}

/// Checks one value against its definition, appending any violations.
fn check_field(def: &FieldDef, value: &FieldValue, violations: &mut Vec<Violation>) {
    if value.field_type() != def.field_type {
        violations.push(Violation::type_mismatch(
            def.name,
            def.field_type.type_name(),
            value.field_type().type_name(),
        ));
        return;
    }

    let Some(constraint) = def.constraint else {
        return;
    };

    match (constraint, value) {
        (Constraint::Length { min, max }, FieldValue::Text(text)) => {
            let len = text.chars().count();
            let too_long = max.map(|max| len > max).unwrap_or(false);
            if len < min || too_long {
                violations.push(Violation::new(
                    def.name,
                    constraint.to_string(),
                    format!("length {}", len),
                ));
            }
        }
        (Constraint::NonNegative, FieldValue::Int(n)) => {
            if *n < 0 {
                violations.push(Violation::new(def.name, constraint.to_string(), n.to_string()));
            }
        }
        // Constraint does not apply to this type; the schema tables never pair them.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{REPORT_SCHEMA, TEAM_SCHEMA};
    use chrono::NaiveDate;

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    fn team_values(name: &str, points: i64) -> Vec<FieldValue> {
        vec![
            text(name),
            text("Brazil"),
            text("A"),
            FieldValue::Int(points),
            FieldValue::Int(0),
            FieldValue::Int(0),
        ]
    }

    #[test]
    fn test_valid_team_passes() {
        let validator = SchemaValidator::new(&TEAM_SCHEMA);
        assert!(validator.validate(&team_values("Brazil FC", 3)).is_ok());
    }

    #[test]
    fn test_collects_every_violation() {
        let validator = SchemaValidator::new(&TEAM_SCHEMA);
        let err = validator.validate(&team_values("BR", -1)).unwrap_err();

        assert_eq!(err.violations().len(), 2);
        assert!(err.has_violation("name"));
        assert!(err.has_violation("points"));
    }

    #[test]
    fn test_length_bounds_are_inclusive() {
        let validator = SchemaValidator::new(&TEAM_SCHEMA);
        assert!(validator.validate(&team_values("abc", 0)).is_ok());
        assert!(validator.validate(&team_values(&"x".repeat(50), 0)).is_ok());
        assert!(validator.validate(&team_values(&"x".repeat(51), 0)).is_err());
    }

    #[test]
    fn test_length_counts_characters() {
        let validator = SchemaValidator::new(&TEAM_SCHEMA);
        // Three characters, six bytes
        assert!(validator.validate(&team_values("Été", 0)).is_ok());
    }

    #[test]
    fn test_type_mismatch_reported() {
        let validator = SchemaValidator::new(&REPORT_SCHEMA);
        let values = vec![
            text("Weekly"),
            text("summary"),
            text("not a date"),
            text("/tmp/r.pdf"),
        ];
        let err = validator.validate(&values).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field, "generated_date");
        assert_eq!(err.violations()[0].expected, "date");
    }

    #[test]
    fn test_missing_and_extra_values() {
        let validator = SchemaValidator::new(&REPORT_SCHEMA);

        let short = vec![text("Weekly"), text("summary")];
        let err = validator.validate(&short).unwrap_err();
        assert!(err.has_violation("generated_date"));
        assert!(err.has_violation("file_path"));

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let long = vec![
            text("Weekly"),
            text("summary"),
            FieldValue::Date(date),
            text("/tmp/r.pdf"),
            text("surplus"),
        ];
        let err = validator.validate(&long).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.has_violation("$4"));
    }
}
