use dynamo_models::Reading;
use serde::Serialize;
use utoipa::ToSchema;

/// Returned by both ingestion routes
#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
    #[schema(example = "Data saved")]
    pub message: &'static str,
    pub data: Reading,
}

/// Request body for `POST /iaq`. Both keys must be present; `0` and `null`
/// are accepted values.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct StructuredReadingRequest {
    #[schema(value_type = f64, example = 12.5)]
    pub pm25: serde_json::Value,
    #[schema(value_type = f64, example = 640)]
    pub co2: serde_json::Value,
}

/// Request body for `POST /rawlog`
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct RawLogRequest {
    #[schema(
        example = "2024-01-01T00:00:00Z,21.5,1013.2,45.0,400,100,1000,950,1100,50,48"
    )]
    pub log: String,
}
