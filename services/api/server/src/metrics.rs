use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use dynamo_models::ReadingKind;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

use crate::AppState;

#[derive(Clone, Debug)]
pub struct ServerMetrics {
    pub registry: Registry,

    pub request_errors: IntCounterVec,
    pub readings_ingested: IntCounterVec,
}

impl ServerMetrics {
    pub fn new(prefix: Option<String>) -> anyhow::Result<Self> {
        let registry = Registry::new_custom(prefix, None)?;

        let request_errors = IntCounterVec::new(
            Opts::new(
                "request_errors",
                "A metric counting request errors by handler and error code",
            ),
            &["handler", "error_code"],
        )?;
        registry.register(Box::new(request_errors.clone()))?;

        let readings_ingested = IntCounterVec::new(
            Opts::new(
                "readings_ingested",
                "A metric counting stored readings by type",
            ),
            &["type"],
        )?;
        registry.register(Box::new(readings_ingested.clone()))?;

        Ok(Self {
            registry,
            request_errors,
            readings_ingested,
        })
    }

    pub fn record_error(&self, handler: &str, error_code: &str) {
        self.request_errors
            .with_label_values(&[handler, error_code])
            .inc();
    }

    pub fn record_ingested(&self, kind: ReadingKind) {
        self.readings_ingested
            .with_label_values(&[kind.as_str()])
            .inc();
    }

    /// Prometheus text exposition of every registered metric.
    pub fn encode(&self) -> String {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&self.registry.gather(), &mut buffer) {
            tracing::error!("could not encode prometheus metrics: {}", e);
        }

        match String::from_utf8(buffer) {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(
                    "prometheus metrics could not be from_utf8'd: {}",
                    e
                );
                String::default()
            }
        }
    }
}

pub async fn handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.metrics.encode(),
    )
}
