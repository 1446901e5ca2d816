//! Schema type definitions
//!
//! Every entity type has exactly one static [`Schema`] listing its fields in
//! persisted column order. Validation, table parsing and table writing all
//! consult the same value, so the three can never drift apart.
//!
//! Supported field types:
//! - text: UTF-8 string, optionally length-bounded (in characters)
//! - int: 64-bit signed integer, optionally non-negative
//! - date: calendar date, persisted as `YYYY-MM-DD`

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column holding the identity of a persisted record. Always first.
pub const ID_COLUMN: &str = "id";

/// On-disk date format (ISO-8601 calendar date)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The three record types managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Team,
    Match,
    Report,
}

impl EntityKind {
    /// All entity kinds, in table creation order
    pub const ALL: [EntityKind; 3] = [EntityKind::Team, EntityKind::Match, EntityKind::Report];

    /// Singular name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Team => "team",
            EntityKind::Match => "match",
            EntityKind::Report => "report",
        }
    }

    /// Name of the live table
    pub fn table_name(&self) -> &'static str {
        match self {
            EntityKind::Team => "teams",
            EntityKind::Match => "matches",
            EntityKind::Report => "reports",
        }
    }

    /// Name of the append-only archive of deleted records
    pub fn archive_name(&self) -> &'static str {
        match self {
            EntityKind::Team => "teams_deleted",
            EntityKind::Match => "matches_deleted",
            EntityKind::Report => "reports_deleted",
        }
    }

    /// Returns the static schema for this kind
    pub fn schema(&self) -> &'static Schema {
        match self {
            EntityKind::Team => &TEAM_SCHEMA,
            EntityKind::Match => &MATCH_SCHEMA,
            EntityKind::Report => &REPORT_SCHEMA,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    /// Accepts both the singular name and the table name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| {
                s.eq_ignore_ascii_case(kind.name()) || s.eq_ignore_ascii_case(kind.table_name())
            })
            .ok_or_else(|| format!("unknown entity type '{}'", s))
    }
}

/// Field data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int,
    Date,
}

impl FieldType {
    /// Returns the type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Int => "int",
            FieldType::Date => "date",
        }
    }

    /// Converts a stored cell into a typed value.
    ///
    /// Numbers and dates tolerate surrounding whitespace; text is kept verbatim.
    pub fn decode(&self, raw: &str) -> Result<FieldValue, String> {
        match self {
            FieldType::Text => Ok(FieldValue::Text(raw.to_string())),
            FieldType::Int => raw
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| format!("expected int, got '{}'", raw)),
            FieldType::Date => NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
                .map(FieldValue::Date)
                .map_err(|_| format!("expected date (YYYY-MM-DD), got '{}'", raw)),
        }
    }
}

/// Value constraint checked on construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Text length in characters, inclusive bounds
    Length { min: usize, max: Option<usize> },
    /// Integer must be >= 0
    NonNegative,
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Length { min, max: Some(max) } => {
                write!(f, "length between {} and {}", min, max)
            }
            Constraint::Length { min, max: None } => write!(f, "length of at least {}", min),
            Constraint::NonNegative => write!(f, "value >= 0"),
        }
    }
}

/// A single field definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub field_type: FieldType,
    pub constraint: Option<Constraint>,
}

impl FieldDef {
    /// Text field bounded to `min..=max` characters
    pub const fn bounded_text(name: &'static str, min: usize, max: usize) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
            constraint: Some(Constraint::Length {
                min,
                max: Some(max),
            }),
        }
    }

    /// Text field with only a lower length bound
    pub const fn min_text(name: &'static str, min: usize) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
            constraint: Some(Constraint::Length { min, max: None }),
        }
    }

    /// Unconstrained text field
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Text,
            constraint: None,
        }
    }

    /// Unconstrained int field
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Int,
            constraint: None,
        }
    }

    /// Int field that must be >= 0
    pub const fn non_negative(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Int,
            constraint: Some(Constraint::NonNegative),
        }
    }

    /// Calendar date field
    pub const fn date(name: &'static str) -> Self {
        Self {
            name,
            field_type: FieldType::Date,
            constraint: None,
        }
    }
}

/// Ordered field list for one entity type.
///
/// The `id` column is implicit and always precedes `fields`.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema {
    pub kind: EntityKind,
    pub fields: &'static [FieldDef],
}

impl Schema {
    /// Header row of the persisted table: `id` followed by every field name
    pub fn header(&self) -> Vec<String> {
        std::iter::once(ID_COLUMN)
            .chain(self.fields.iter().map(|f| f.name))
            .map(str::to_string)
            .collect()
    }

    /// Looks up a field definition by name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Number of non-id fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

pub static TEAM_SCHEMA: Schema = Schema {
    kind: EntityKind::Team,
    fields: &[
        FieldDef::bounded_text("name", 3, 50),
        FieldDef::bounded_text("country", 2, 30),
        FieldDef::bounded_text("group", 1, 5),
        FieldDef::non_negative("points"),
        FieldDef::non_negative("goals_for"),
        FieldDef::non_negative("goals_against"),
    ],
};

pub static MATCH_SCHEMA: Schema = Schema {
    kind: EntityKind::Match,
    fields: &[
        FieldDef::date("date"),
        FieldDef::int("home_team_id"),
        FieldDef::int("away_team_id"),
        FieldDef::non_negative("home_goals"),
        FieldDef::non_negative("away_goals"),
        FieldDef::min_text("phase", 3),
    ],
};

pub static REPORT_SCHEMA: Schema = Schema {
    kind: EntityKind::Report,
    fields: &[
        FieldDef::bounded_text("name", 3, 50),
        FieldDef::bounded_text("type", 3, 30),
        FieldDef::date("generated_date"),
        FieldDef::text("file_path"),
    ],
};

/// A typed field value in schema order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Date(NaiveDate),
}

impl FieldValue {
    /// Returns the type of this value
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Text(_) => FieldType::Text,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Date(_) => FieldType::Date,
        }
    }

    /// Renders the value as a table cell
    pub fn encode(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Int(n) => n.to_string(),
            FieldValue::Date(d) => d.format(DATE_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_starts_with_id() {
        assert_eq!(
            TEAM_SCHEMA.header(),
            vec!["id", "name", "country", "group", "points", "goals_for", "goals_against"]
        );
        assert_eq!(
            REPORT_SCHEMA.header(),
            vec!["id", "name", "type", "generated_date", "file_path"]
        );
    }

    #[test]
    fn test_kind_parses_singular_and_plural() {
        assert_eq!("teams".parse::<EntityKind>().unwrap(), EntityKind::Team);
        assert_eq!("Match".parse::<EntityKind>().unwrap(), EntityKind::Match);
        assert!("players".parse::<EntityKind>().is_err());
    }

    #[test]
    fn test_decode_int_and_date() {
        assert_eq!(FieldType::Int.decode(" 42 ").unwrap(), FieldValue::Int(42));
        assert!(FieldType::Int.decode("4.2").is_err());

        let date = FieldType::Date.decode("2022-11-20").unwrap();
        assert_eq!(date.encode(), "2022-11-20");
        assert!(FieldType::Date.decode("20/11/2022").is_err());
    }

    #[test]
    fn test_text_is_verbatim() {
        assert_eq!(
            FieldType::Text.decode("  spaced ").unwrap(),
            FieldValue::Text("  spaced ".to_string())
        );
    }
}
