use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use dynamo_models::{Reading, ReadingKind};
use uuid::Uuid;

use crate::AppState;
use crate::iaq_api::error_recorder::ErrorRecorder;
use crate::shared::csv;

use super::errors::{self, HandlerResult};

/// Rows returned by the JSON read routes.
pub const LIST_LIMIT: usize = 20;
/// Rows returned by the CSV export routes.
pub const EXPORT_LIMIT: usize = 100;

pub async fn list_readings(
    state: &AppState,
    kind: ReadingKind,
    handler_name: &str,
    request_id: &Uuid,
) -> HandlerResult<Vec<Reading>> {
    let recorder = ErrorRecorder::new(&state.metrics, handler_name, request_id);

    state
        .store
        .scan_by_type(kind, LIST_LIMIT)
        .await
        .map_err(|e| recorder.record(errors::Error::Storage(e)))
}

pub async fn export_readings(
    state: &AppState,
    kind: ReadingKind,
    fields: &[&str],
    filename: &str,
    handler_name: &str,
    request_id: &Uuid,
) -> HandlerResult<Response> {
    let recorder = ErrorRecorder::new(&state.metrics, handler_name, request_id);

    let readings = state
        .store
        .scan_by_type(kind, EXPORT_LIMIT)
        .await
        .map_err(|e| {
            recorder.record(errors::Error::CsvExport(format!("scan: {e}")))
        })?;

    let body = csv::project(&readings, fields).map_err(|e| {
        recorder.record(errors::Error::CsvExport(format!("projection: {e}")))
    })?;

    tracing::debug!(
        kind = %kind,
        rows = readings.len(),
        request_id = %request_id,
        "CSV export rendered",
    );

    Ok(csv_response(filename, body))
}

fn csv_response(filename: &str, body: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}
