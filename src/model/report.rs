use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Entity, FieldCursor, Filterable};
use crate::schema::{EntityKind, FieldValue};

/// A generated report file and its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub name: String,
    #[serde(rename = "type")]
    pub report_type: String,
    pub generated_date: NaiveDate,
    pub file_path: String,
}

impl Entity for Report {
    const KIND: EntityKind = EntityKind::Report;

    fn to_values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Text(self.name.clone()),
            FieldValue::Text(self.report_type.clone()),
            FieldValue::Date(self.generated_date),
            FieldValue::Text(self.file_path.clone()),
        ]
    }

    fn from_values(values: Vec<FieldValue>) -> Result<Self, String> {
        let mut cursor = FieldCursor::new(Self::KIND, values);
        Ok(Self {
            name: cursor.text("name")?,
            report_type: cursor.text("type")?,
            generated_date: cursor.date("generated_date")?,
            file_path: cursor.text("file_path")?,
        })
    }
}

impl Filterable for Report {
    const FILTER_FIELD: &'static str = "type";

    fn filter_value(&self) -> &str {
        &self.report_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_field_renamed_in_json() {
        let report = Report {
            name: "Group stage".to_string(),
            report_type: "summary".to_string(),
            generated_date: NaiveDate::from_ymd_opt(2022, 12, 3).unwrap(),
            file_path: "reports/group.pdf".to_string(),
        };

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["type"], "summary");
        assert!(json.get("report_type").is_none());

        let back: Report = serde_json::from_value(json).unwrap();
        assert_eq!(back, report);
    }
}
