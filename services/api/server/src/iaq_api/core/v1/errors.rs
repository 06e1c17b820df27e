use dynamo_models::StoreError;
use rawlog_parser::RawLogError;
use serde_json::Value;
use uuid::Uuid;

use crate::iaq_api::iaq_error_v1::{IaqV1Detail, IaqV1Error, codes};

pub type HandlerResult<T> = Result<T, IaqV1Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Missing required field(s): {}", .missing.join(", "))]
    MissingFields {
        missing: Vec<&'static str>,
        received: Value,
    },

    #[error("Malformed raw log: {0}")]
    MalformedLog(#[from] RawLogError),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),

    #[error("CSV export failed: {0}")]
    CsvExport(String),
}

impl Error {
    pub fn to_iaq_v1_error(self, request_id: &Uuid) -> IaqV1Error {
        match self {
            Error::MissingFields { missing, received } => {
                let details = missing
                    .into_iter()
                    .map(|field| IaqV1Detail {
                        field: Some(field.to_string()),
                        code: "missing_field".to_string(),
                        message: format!("`{field}` is required"),
                        suggestion: String::new(),
                    })
                    .collect();

                IaqV1Error::bad_request(
                    codes::MISSING_FIELDS,
                    "Missing fields".to_string(),
                    details,
                    request_id.to_string(),
                )
                .with_received(received)
            }
            Error::MalformedLog(e) => {
                let (field, code) = match &e {
                    RawLogError::FieldCount { .. } => {
                        ("log".to_string(), "field_count")
                    }
                    RawLogError::InvalidNumber { field, .. } => {
                        (field.to_string(), "invalid_number")
                    }
                };

                IaqV1Error::bad_request(
                    codes::MALFORMED_LOG,
                    "Malformed log".to_string(),
                    vec![IaqV1Detail {
                        field: Some(field),
                        code: code.to_string(),
                        message: e.to_string(),
                        suggestion: "Send exactly 11 comma separated fields: \
                                     timestamp followed by 10 numbers"
                            .to_string(),
                    }],
                    request_id.to_string(),
                )
            }
            Error::Storage(_) => IaqV1Error::internal_server_error(
                codes::STORAGE_ERROR,
                "Error accessing data store".to_string(),
                vec![IaqV1Detail {
                    suggestion: "Please try again later".to_string(),
                    ..Default::default()
                }],
                request_id.to_string(),
            ),
            Error::CsvExport(_) => IaqV1Error::internal_server_error(
                codes::CSV_EXPORT_ERROR,
                "Error exporting CSV".to_string(),
                vec![IaqV1Detail {
                    suggestion: "Please try again later".to_string(),
                    ..Default::default()
                }],
                request_id.to_string(),
            ),
        }
    }
}

impl crate::iaq_api::error_recorder::IntoIaqV1Error for Error {
    fn metric_code(&self) -> &'static str {
        match self {
            Error::MissingFields { .. } => "missing_fields",
            Error::MalformedLog(_) => "malformed_log",
            Error::Storage(_) => "storage_error",
            Error::CsvExport(_) => "csv_export_error",
        }
    }

    fn into_iaq_v1_error(self, request_id: &Uuid) -> IaqV1Error {
        self.to_iaq_v1_error(request_id)
    }
}
