use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use dynamo_models::models::readings::new_reading_id;
use dynamo_models::{RawLogReading, Reading, ReadingKind};
use rawlog_parser::ParsedLog;
use serde_json::Value;

use crate::AppState;
use crate::iaq_api::error_recorder::ErrorRecorder;
use crate::shared::extractors::payload::Payload;
use crate::shared::extractors::request_id::RequestId;

use super::super::errors::{self, HandlerResult};
use super::super::models::IngestResponse;
use super::super::readings::{export_readings, list_readings};

const LOG: &str = "log";

pub const CSV_FIELDS: [&str; 12] = [
    "id",
    "timestamp",
    "temperature",
    "pressure",
    "humidity",
    "gas",
    "altitude",
    "R0",
    "correctedRZero",
    "resistance",
    "ppm",
    "correctedPPM",
];
const CSV_FILENAME: &str = "rawlog_data.csv";

fn to_reading(parsed: ParsedLog) -> RawLogReading {
    RawLogReading {
        id: new_reading_id(),
        timestamp: parsed.timestamp,
        temperature: parsed.temperature,
        pressure: parsed.pressure,
        humidity: parsed.humidity,
        gas: parsed.gas,
        altitude: parsed.altitude,
        r0: parsed.r0,
        corrected_r_zero: parsed.corrected_r_zero,
        resistance: parsed.resistance,
        ppm: parsed.ppm,
        corrected_ppm: parsed.corrected_ppm,
    }
}

/// Store a raw microcontroller log line
///
/// `log` must hold exactly 11 comma separated fields. Numeric fields that
/// do not parse are stored as `null` unless strict parsing is enabled.
#[utoipa::path(
    post,
    path = "/rawlog",
    request_body = super::super::models::RawLogRequest,
    responses(
        (status = 200, description = "Raw log stored", body = IngestResponse),
        (status = 400, description = "Invalid JSON, missing `log` or malformed log"),
        (status = 500, description = "Storage failure"),
    ),
    tag = "rawlog",
)]
#[tracing::instrument(skip_all, name = "rawlog_ingest")]
pub async fn ingest(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    payload: Payload,
) -> HandlerResult<(StatusCode, Json<IngestResponse>)> {
    let recorder =
        ErrorRecorder::new(&state.metrics, "rawlog_ingest", &request_id);

    let line = payload
        .field(LOG)
        .and_then(Value::as_str)
        .map(str::to_owned);
    let Some(line) = line else {
        return Err(recorder.record(errors::Error::MissingFields {
            missing: vec![LOG],
            received: payload.into_inner(),
        }));
    };

    let parsed = state
        .rawlog_parser()
        .parse(&line)
        .map_err(|e| recorder.record(errors::Error::MalformedLog(e)))?;
    let reading = Reading::Raw(to_reading(parsed));

    state
        .store
        .put(&reading)
        .await
        .map_err(|e| recorder.record(errors::Error::Storage(e)))?;
    state.metrics.record_ingested(reading.kind());

    tracing::info!(
        id = reading.id(),
        request_id = %request_id,
        "Raw log reading stored",
    );

    Ok((
        StatusCode::OK,
        Json(IngestResponse {
            message: "Raw log saved",
            data: reading,
        }),
    ))
}

/// List raw log readings
///
/// Returns up to 20 raw readings in store order.
#[utoipa::path(
    get,
    path = "/rawlog",
    responses(
        (status = 200, description = "Raw log readings", body = Vec<Reading>),
        (status = 500, description = "Storage failure"),
    ),
    tag = "rawlog",
)]
#[tracing::instrument(skip_all, name = "rawlog_list")]
pub async fn list(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
) -> HandlerResult<(StatusCode, Json<Vec<Reading>>)> {
    let readings =
        list_readings(&state, ReadingKind::Raw, "rawlog_list", &request_id)
            .await?;

    Ok((StatusCode::OK, Json(readings)))
}

/// Export raw log readings as CSV
///
/// Up to 100 rows with the 12 raw log columns.
#[utoipa::path(
    get,
    path = "/rawlog/csv",
    responses(
        (status = 200, description = "CSV document", content_type = "text/csv", body = String),
        (status = 500, description = "Export failure"),
    ),
    tag = "rawlog",
)]
#[tracing::instrument(skip_all, name = "rawlog_export_csv")]
pub async fn export_csv(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
) -> HandlerResult<Response> {
    export_readings(
        &state,
        ReadingKind::Raw,
        &CSV_FIELDS,
        CSV_FILENAME,
        "rawlog_export_csv",
        &request_id,
    )
    .await
}
