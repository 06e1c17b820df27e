use std::collections::HashMap;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use dynamo_models::RecordStore;
use serde::Serialize;

use crate::AppState;

const STORE_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub components: HashMap<String, ComponentHealth>,
}

pub async fn handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let mut components = HashMap::new();
    components.insert(
        "record_store".to_string(),
        check_store(state.store.as_ref()).await,
    );

    let unhealthy = state.shutdown.is_shutting_down()
        || components
            .values()
            .any(|c| c.status == HealthStatus::Unhealthy);

    let (status_code, overall) = if unhealthy {
        (StatusCode::SERVICE_UNAVAILABLE, HealthStatus::Unhealthy)
    } else {
        (StatusCode::OK, HealthStatus::Healthy)
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall,
            components,
        }),
    )
}

async fn check_store(store: &dyn RecordStore) -> ComponentHealth {
    let start = Instant::now();
    let result = tokio::time::timeout(STORE_TIMEOUT, store.health_check()).await;
    let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok(Ok(())) => ComponentHealth {
            status: HealthStatus::Healthy,
            latency_ms: Some(latency_ms),
            error: None,
        },
        Ok(Err(e)) => {
            tracing::warn!("Record store health check failed: {e}");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                latency_ms: Some(latency_ms),
                error: Some("store unavailable".to_string()),
            }
        }
        Err(_) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some("timeout".to_string()),
        },
    }
}
