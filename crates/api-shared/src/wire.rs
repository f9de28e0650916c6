//! JSON bodies exchanged over the REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Multipart form accepted by `POST /upload`. Documentation only; the handler reads the
/// multipart stream directly.
#[derive(ToSchema)]
pub struct UploadForm {
    /// File content, any length and media type
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRes {
    /// Content identifier assigned by the storage backend
    #[schema(example = "QmYwAPJzv5CZsnA625s3Xf2nemtYgPpHdWEz79ojWnPbdG")]
    pub ipfs_hash: String,
}

/// Fields lifted out of a submitted record. Absent fields are `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessedRecord {
    #[schema(value_type = Object, nullable, example = "123")]
    pub patient_id: Option<Value>,
    #[schema(value_type = Object, nullable, example = "1990-01-01")]
    pub birth_date: Option<Value>,
}

impl From<fhir::RecordSummary> for ProcessedRecord {
    fn from(summary: fhir::RecordSummary) -> Self {
        Self {
            patient_id: summary.patient_id,
            birth_date: summary.birth_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProcessRes {
    pub processed: ProcessedRecord,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_process_res_keeps_null_fields() {
        let res = ProcessRes {
            processed: fhir::RecordSummary::default().into(),
        };

        assert_eq!(
            serde_json::to_value(&res).unwrap(),
            json!({"processed": {"patient_id": null, "birth_date": null}})
        );
    }

    #[test]
    fn test_upload_res_shape() {
        let res = UploadRes {
            ipfs_hash: "abc".into(),
        };
        assert_eq!(serde_json::to_value(&res).unwrap(), json!({"ipfs_hash": "abc"}));
    }
}
