use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use dynamo_models::{Reading, ReadingKind, StructuredReading};

use crate::AppState;
use crate::iaq_api::error_recorder::ErrorRecorder;
use crate::shared::extractors::payload::Payload;
use crate::shared::extractors::request_id::RequestId;

use super::super::errors::{self, HandlerResult};
use super::super::models::IngestResponse;
use super::super::readings::{export_readings, list_readings};

const PM25: &str = "pm25";
const CO2: &str = "co2";

pub const CSV_FIELDS: [&str; 4] = ["id", "timestamp", "pm25", "co2"];
const CSV_FILENAME: &str = "iaq_data.csv";

/// Store a PM2.5 / CO2 reading
///
/// Both `pm25` and `co2` must be present. Values are stored as received.
#[utoipa::path(
    post,
    path = "/iaq",
    request_body = super::super::models::StructuredReadingRequest,
    responses(
        (status = 200, description = "Reading stored", body = IngestResponse),
        (status = 400, description = "Invalid JSON or missing fields"),
        (status = 500, description = "Storage failure"),
    ),
    tag = "iaq",
)]
#[tracing::instrument(skip_all, name = "iaq_ingest")]
pub async fn ingest(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    mut payload: Payload,
) -> HandlerResult<(StatusCode, Json<IngestResponse>)> {
    let recorder = ErrorRecorder::new(&state.metrics, "iaq_ingest", &request_id);

    let missing = payload.missing_fields(&[PM25, CO2]);
    if !missing.is_empty() {
        return Err(recorder.record(errors::Error::MissingFields {
            missing,
            received: payload.into_inner(),
        }));
    }

    let reading = Reading::Structured(StructuredReading::new(
        payload.take(PM25).unwrap_or_default(),
        payload.take(CO2).unwrap_or_default(),
    ));

    state
        .store
        .put(&reading)
        .await
        .map_err(|e| recorder.record(errors::Error::Storage(e)))?;
    state.metrics.record_ingested(reading.kind());

    tracing::info!(
        id = reading.id(),
        request_id = %request_id,
        "Structured reading stored",
    );

    Ok((
        StatusCode::OK,
        Json(IngestResponse {
            message: "Data saved",
            data: reading,
        }),
    ))
}

/// List structured readings
///
/// Returns up to 20 structured readings in store order.
#[utoipa::path(
    get,
    path = "/iaq",
    responses(
        (status = 200, description = "Structured readings", body = Vec<Reading>),
        (status = 500, description = "Storage failure"),
    ),
    tag = "iaq",
)]
#[tracing::instrument(skip_all, name = "iaq_list")]
pub async fn list(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
) -> HandlerResult<(StatusCode, Json<Vec<Reading>>)> {
    let readings =
        list_readings(&state, ReadingKind::Structured, "iaq_list", &request_id)
            .await?;

    Ok((StatusCode::OK, Json(readings)))
}

/// Export structured readings as CSV
///
/// Up to 100 rows with columns `id,timestamp,pm25,co2`.
#[utoipa::path(
    get,
    path = "/iaq/csv",
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv", body = String),
        (status = 500, description = "Export failure"),
    ),
    tag = "iaq",
)]
#[tracing::instrument(skip_all, name = "iaq_export_csv")]
pub async fn export_csv(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
) -> HandlerResult<Response> {
    export_readings(
        &state,
        ReadingKind::Structured,
        &CSV_FIELDS,
        CSV_FILENAME,
        "iaq_export_csv",
        &request_id,
    )
    .await
}
