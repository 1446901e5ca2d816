use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Entity, FieldCursor};
use crate::schema::{EntityKind, FieldValue};

/// A played (or scheduled) match between two teams.
///
/// Team ids reference `Team.id` by convention only; they are not checked
/// against the team table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub date: NaiveDate,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_goals: i64,
    pub away_goals: i64,
    pub phase: String,
}

impl Entity for Match {
    const KIND: EntityKind = EntityKind::Match;

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Date(self.date),
            FieldValue::Int(self.home_team_id),
            FieldValue::Int(self.away_team_id),
            FieldValue::Int(self.home_goals),
            FieldValue::Int(self.away_goals),
            FieldValue::Text(self.phase.clone()),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self, String> {
        let mut cursor = FieldCursor::new(Self::KIND, values);
        Ok(Self {
            date: cursor.date("date")?,
            home_team_id: cursor.int("home_team_id")?,
            away_team_id: cursor.int("away_team_id")?,
            home_goals: cursor.int("home_goals")?,
            away_goals: cursor.int("away_goals")?,
            phase: cursor.text("phase")?,
        })
    }
}
