//! Record summary extraction.
//!
//! Copies the patient identifier and date of birth out of a record into a fixed two-field
//! summary. Absent fields become `None` and serialise as `null`.

use crate::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source key for the patient identifier.
pub const ID_KEY: &str = "id";

/// Source key for the date of birth.
pub const BIRTH_DATE_KEY: &str = "birthDate";

/// Two-field summary of a record.
///
/// Values are copied verbatim, whatever their JSON type. A source key holding JSON `null` and an
/// absent key both serialise to `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSummary {
    /// Value of `id` in the source record.
    pub patient_id: Option<Value>,

    /// Value of `birthDate` in the source record.
    pub birth_date: Option<Value>,
}

impl RecordSummary {
    /// True when both source keys were present.
    pub fn is_complete(&self) -> bool {
        self.patient_id.is_some() && self.birth_date.is_some()
    }
}

/// Builds a [`RecordSummary`] from `record`.
///
/// Total over all objects: never fails and never modifies the input.
pub fn extract_summary(record: &Record) -> RecordSummary {
    RecordSummary {
        patient_id: record.get(ID_KEY).cloned(),
        birth_date: record.get(BIRTH_DATE_KEY).cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_extracts_both_fields() {
        let input = record(json!({"id": "123", "birthDate": "1990-01-01"}));
        let summary = extract_summary(&input);

        assert_eq!(summary.patient_id, Some(json!("123")));
        assert_eq!(summary.birth_date, Some(json!("1990-01-01")));
        assert!(summary.is_complete());
    }

    #[test]
    fn test_empty_record_yields_nulls() {
        let summary = extract_summary(&Record::new());

        assert_eq!(summary, RecordSummary::default());
        assert!(!summary.is_complete());
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"patient_id": null, "birth_date": null})
        );
    }

    #[test]
    fn test_partial_record() {
        let input = record(json!({"birthDate": "2001-12-31", "resourceType": "Patient"}));
        let summary = extract_summary(&input);

        assert_eq!(summary.patient_id, None);
        assert_eq!(summary.birth_date, Some(json!("2001-12-31")));
    }

    #[test]
    fn test_values_copied_verbatim() {
        let input = record(json!({
            "id": 42,
            "birthDate": {"extension": [{"url": "http://example.org"}]},
            "name": [{"family": "Smith"}]
        }));
        let summary = extract_summary(&input);

        assert_eq!(summary.patient_id, Some(json!(42)));
        assert_eq!(
            summary.birth_date,
            Some(json!({"extension": [{"url": "http://example.org"}]}))
        );
    }

    #[test]
    fn test_explicit_null_serialises_as_null() {
        let input = record(json!({"id": null}));
        let summary = extract_summary(&input);

        assert_eq!(summary.patient_id, Some(Value::Null));
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"patient_id": null, "birth_date": null})
        );
    }

    #[test]
    fn test_key_lookup_is_case_sensitive() {
        let input = record(json!({"ID": "x", "birthdate": "1990-01-01"}));
        let summary = extract_summary(&input);

        assert_eq!(summary, RecordSummary::default());
    }

    #[test]
    fn test_input_left_untouched() {
        let input = record(json!({"id": "a", "birthDate": "b"}));
        let before = input.clone();
        let _ = extract_summary(&input);

        assert_eq!(input, before);
    }
}
