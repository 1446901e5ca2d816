//! Typed entity records
//!
//! Each entity type has an identity-free struct (what clients send) and is
//! wrapped in [`Stored`] once persisted. The [`Entity`] trait maps a typed
//! record to and from the schema-ordered [`FieldValue`]s that the validator
//! and the table reader/writer operate on.

mod matches;
mod report;
mod team;

use std::fmt;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::schema::{EntityKind, FieldValue, Schema, SchemaResult, SchemaValidator};

pub use matches::Match;
pub use report::Report;
pub use team::Team;

/// A record type managed by the store.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Entity kind this type persists as
    const KIND: EntityKind;

    /// Field values in schema order, excluding `id`
    fn to_values(&self) -> Vec<FieldValue>;

    /// Rebuilds a record from schema-ordered values.
    ///
    /// Fails if a value is missing or has the wrong type.
    fn from_values(values: Vec<FieldValue>) -> Result<Self, String>;

    /// Static schema of this entity type
    fn schema() -> &'static Schema {
        Self::KIND.schema()
    }

    /// Checks every field constraint of this record
    fn validate(&self) -> SchemaResult<()> {
        SchemaValidator::for_kind(Self::KIND).validate(&self.to_values())
    }
}

/// An entity with a text field supporting case-insensitive lookup.
pub trait Filterable: Entity {
    /// Field used by `filter_by` (also the HTTP route segment)
    const FILTER_FIELD: &'static str;

    /// Current value of the filter field
    fn filter_value(&self) -> &str;

    /// Case-insensitive equality against the filter field
    fn matches_filter(&self, value: &str) -> bool {
        self.filter_value().to_lowercase() == value.to_lowercase()
    }
}

/// A persisted record: the entity plus its assigned id.
///
/// Serializes flat, with `id` alongside the entity's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stored<E> {
    pub id: u64,
    #[serde(flatten)]
    pub record: E,
}

impl<E> Stored<E> {
    pub fn new(id: u64, record: E) -> Self {
        Self { id, record }
    }
}

/// Sequential reader over schema-ordered values, used by `from_values`.
pub(crate) struct FieldCursor {
    kind: EntityKind,
    values: std::vec::IntoIter<FieldValue>,
}

impl FieldCursor {
    pub(crate) fn new(kind: EntityKind, values: Vec<FieldValue>) -> Self {
        Self {
            kind,
            values: values.into_iter(),
        }
    }

    fn next(&mut self, name: &str) -> Result<FieldValue, String> {
        self.values
            .next()
            .ok_or_else(|| format!("{}: missing value for '{}'", self.kind, name))
    }

    pub(crate) fn text(&mut self, name: &str) -> Result<String, String> {
        match self.next(name)? {
            FieldValue::Text(s) => Ok(s),
            other => Err(self.mismatch(name, "text", &other)),
        }
    }

    pub(crate) fn int(&mut self, name: &str) -> Result<i64, String> {
        match self.next(name)? {
            FieldValue::Int(n) => Ok(n),
            other => Err(self.mismatch(name, "int", &other)),
        }
    }

    pub(crate) fn date(&mut self, name: &str) -> Result<NaiveDate, String> {
        match self.next(name)? {
            FieldValue::Date(d) => Ok(d),
            other => Err(self.mismatch(name, "date", &other)),
        }
    }

    fn mismatch(&self, name: &str, expected: &str, got: &FieldValue) -> String {
        format!(
            "{}: field '{}' expected {}, got {}",
            self.kind,
            name,
            expected,
            got.field_type().type_name()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_serializes_flat() {
        let stored = Stored::new(7, Team::new("Brazil FC", "Brazil", "A"));
        let json = serde_json::to_value(&stored).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["name"], "Brazil FC");
        assert_eq!(json["country"], "Brazil");
        assert!(json.get("record").is_none());
    }

    #[test]
    fn test_cursor_reports_type_mismatch() {
        let mut cursor = FieldCursor::new(EntityKind::Team, vec![FieldValue::Int(1)]);
        let err = cursor.text("name").unwrap_err();
        assert!(err.contains("'name'"));
        assert!(err.contains("expected text"));
    }

    #[test]
    fn test_cursor_reports_missing_value() {
        let mut cursor = FieldCursor::new(EntityKind::Match, vec![]);
        assert!(cursor.date("date").unwrap_err().contains("missing"));
    }
}
