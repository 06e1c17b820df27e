use utoipa::OpenApi;

/// Main OpenAPI documentation for the IAQ v1 API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::iaq_api::core::v1::iaq::handler::ingest,
        crate::iaq_api::core::v1::iaq::handler::list,
        crate::iaq_api::core::v1::iaq::handler::export_csv,
        crate::iaq_api::core::v1::rawlog::handler::ingest,
        crate::iaq_api::core::v1::rawlog::handler::list,
        crate::iaq_api::core::v1::rawlog::handler::export_csv,
    ),
    info(
        title = "IAQ Telemetry API",
        version = "1.0.0",
        description = "Ingestion and retrieval of indoor air quality readings: structured PM2.5/CO2 pairs and raw microcontroller logs",
        license(name = "Apache-2.0")
    ),
    tags(
        (name = "iaq", description = "Structured PM2.5 / CO2 readings"),
        (name = "rawlog", description = "Raw 11-field microcontroller logs")
    )
)]
pub struct IaqV1ApiDoc;

impl IaqV1ApiDoc {
    pub fn openapi() -> utoipa::openapi::OpenApi {
        <IaqV1ApiDoc as utoipa::OpenApi>::openapi()
    }

    pub fn openapi_json() -> serde_json::Value {
        match serde_json::to_value(Self::openapi()) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize OpenAPI spec: {e}");
                serde_json::Value::Null
            }
        }
    }
}
