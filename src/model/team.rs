use serde::{Deserialize, Serialize};

use super::{Entity, FieldCursor, Filterable};
use crate::schema::{EntityKind, FieldValue};

/// A tournament team and its standing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
    pub country: String,
    pub group: String,
    pub points: i64,
    pub goals_for: i64,
    pub goals_against: i64,
}

impl Team {
    /// A team with no points or goals yet
    pub fn new(
        name: impl Into<String>,
        country: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            group: group.into(),
            points: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }
}

impl Entity for Team {
    const KIND: EntityKind = EntityKind::Team;

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.country.clone()),
            FieldValue::Text(self.group.clone()),
            FieldValue::Int(self.points),
            FieldValue::Int(self.goals_for),
            FieldValue::Int(self.goals_against),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self, String> {
        let mut cursor = FieldCursor::new(Self::KIND, values);
        Ok(Self {
            name: cursor.text("name")?,
            country: cursor.text("country")?,
            group: cursor.text("group")?,
            points: cursor.int("points")?,
            goals_for: cursor.int("goals_for")?,
            goals_against: cursor.int("goals_against")?,
        })
    }
}

impl Filterable for Team {
    const FILTER_FIELD: &'static str = "country";

    fn filter_value(&self) -> &str {
        &self.country
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_round_trip() {
        let mut team = Team::new("Brazil FC", "Brazil", "A");
        team.points = 3;
        team.goals_for = 2;

        let back = Team::from_values(team.to_values()).unwrap();
        assert_eq!(back, team);
    }

    #[test]
    fn test_filter_ignores_case() {
        let team = Team::new("Brazil FC", "Brazil", "A");
        assert!(team.matches_filter("brazil"));
        assert!(team.matches_filter("BRAZIL"));
        assert!(!team.matches_filter("Brasil"));
    }

    #[test]
    fn test_negative_points_rejected() {
        let mut team = Team::new("Brazil FC", "Brazil", "A");
        team.points = -3;
        let err = team.validate().unwrap_err();
        assert!(err.has_violation("points"));
    }
}
