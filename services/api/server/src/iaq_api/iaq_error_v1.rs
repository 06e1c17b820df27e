use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

/// Error codes returned in the `code` field.
pub mod codes {
    pub const INVALID_JSON: &str = "INVALID_JSON";
    pub const MISSING_FIELDS: &str = "MISSING_FIELDS";
    pub const MALFORMED_LOG: &str = "MALFORMED_LOG";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const CSV_EXPORT_ERROR: &str = "CSV_EXPORT_ERROR";
    pub const NOT_FOUND: &str = "NOT_FOUND";
}

#[derive(Serialize, Default)]
pub struct IaqV1Error {
    #[serde(skip)]
    pub(crate) status_code: axum::http::StatusCode,
    /// Short, client-safe description
    pub(crate) error: String,
    pub(crate) code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) details: Vec<IaqV1Detail>,
    /// Echo of the decoded request body, only for missing-field errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) received: Option<Value>,
    pub(crate) timestamp: String,
    pub(crate) request_id: String,
}

impl IaqV1Error {
    fn new(
        status_code: axum::http::StatusCode,
        code: &str,
        error: String,
        details: Vec<IaqV1Detail>,
        request_id: String,
    ) -> Self {
        Self {
            status_code,
            error,
            code: code.to_string(),
            details,
            received: None,
            timestamp: Utc::now().to_rfc3339(),
            request_id,
        }
    }

    pub fn bad_request(
        code: &str,
        error: String,
        details: Vec<IaqV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(
            axum::http::StatusCode::BAD_REQUEST,
            code,
            error,
            details,
            request_id,
        )
    }

    pub fn not_found(error: String, request_id: String) -> Self {
        Self::new(
            axum::http::StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            error,
            Vec::new(),
            request_id,
        )
    }

    pub fn internal_server_error(
        code: &str,
        error: String,
        details: Vec<IaqV1Detail>,
        request_id: String,
    ) -> Self {
        Self::new(
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            code,
            error,
            details,
            request_id,
        )
    }

    pub fn with_received(mut self, received: Value) -> Self {
        self.received = Some(received);
        self
    }

    pub fn status_code(&self) -> axum::http::StatusCode {
        self.status_code
    }
}

#[derive(Serialize, Debug, Default)]
pub struct IaqV1Detail {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) field: Option<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) code: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) message: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub(crate) suggestion: String,
}

impl axum::response::IntoResponse for IaqV1Error {
    fn into_response(self) -> axum::response::Response {
        if self.status_code.is_server_error() {
            sentry::Hub::with_active(|hub| hub.capture_error(&self));
        }

        (self.status_code, axum::Json(self)).into_response()
    }
}

impl std::fmt::Display for IaqV1Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}, {}, {}",
            self.status_code,
            self.code,
            self.error,
            self.request_id,
            self.details
                .iter()
                .map(|d| d.message.clone())
                .collect::<Vec<String>>()
                .join(", ")
        )
    }
}

impl std::fmt::Debug for IaqV1Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error")
            .field("status_code", &self.status_code)
            .field("error", &self.error)
            .field("code", &self.code)
            .field("details", &self.details)
            .field("timestamp", &self.timestamp)
            .field("request_id", &self.request_id)
            .finish()
    }
}

impl std::error::Error for IaqV1Error {}
