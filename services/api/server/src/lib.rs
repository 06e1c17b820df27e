//! HTTP ingestion and retrieval service for indoor air quality readings.
use std::sync::Arc;

use axum::response::{IntoResponse, Response};
use dynamo_models::RecordStore;
use rawlog_parser::{NumericPolicy, RawLogParser};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer,
    cors::CorsLayer, trace::TraceLayer,
};

use crate::metrics::ServerMetrics;
use crate::shared::extractors::payload::decode_json_body;
use crate::shared::extractors::request_id::RequestId;
use crate::shutdown::ShutdownCoordinator;

// Private API modules - internal implementation details
mod iaq_api;
pub mod shutdown;

// OpenAPI documentation module
pub mod openapi;

// Public modules - shared utilities and middleware
pub mod health;
pub mod metrics;
pub mod shared;

pub use iaq_api::core::v1::get_routes as get_iaq_api_v1_routes;

pub const VERSION: Option<&'static str> = option_env!("VERSION");

/// Returns the OpenAPI documentation routes for the IAQ v1 API
pub fn get_openapi_routes() -> axum::Router {
    use axum::Json;
    use axum::routing::get;
    use utoipa_swagger_ui::SwaggerUi;

    async fn openapi_handler() -> Json<serde_json::Value> {
        Json(openapi::IaqV1ApiDoc::openapi_json())
    }

    axum::Router::new()
        .route("/api-docs/openapi.json", get(openapi_handler))
        .merge(SwaggerUi::new("/swagger-ui").url(
            "/api-docs/openapi-3.1.json",
            openapi::IaqV1ApiDoc::openapi(),
        ))
}

async fn fallback_handler(request_id: RequestId) -> Response {
    iaq_api::iaq_error_v1::IaqV1Error::not_found(
        "The requested endpoint does not exist".to_string(),
        request_id.to_string(),
    )
    .into_response()
}

/// Builds the complete HTTP application: data routes under the configured
/// base path, service routes, documentation and the shared middleware stack.
pub fn app(state: AppState) -> axum::Router {
    let data_routes = get_iaq_api_v1_routes(state.clone());
    let router = match state.config.base_path() {
        Some(base_path) => axum::Router::new().nest(&base_path, data_routes),
        None => axum::Router::new().merge(data_routes),
    };

    let service_routes = axum::Router::new()
        .route("/health", axum::routing::get(health::handler))
        .route(
            "/version",
            axum::routing::get(|| async { VERSION.unwrap_or("unknown") }),
        )
        .route("/metrics", axum::routing::get(metrics::handler))
        .with_state(state.clone());

    // Layered after the fallback so unmatched paths decode bodies too.
    router
        .merge(service_routes)
        .merge(get_openapi_routes())
        .fallback(fallback_handler)
        .layer(axum::middleware::from_fn_with_state(state, decode_json_body))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub metrics: Arc<ServerMetrics>,
    pub config: Arc<Config>,
    pub shutdown: Arc<ShutdownCoordinator>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        config: Config,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            store,
            metrics: Arc::new(ServerMetrics::new(None)?),
            config: Arc::new(config),
            shutdown: Arc::new(ShutdownCoordinator::new()),
        })
    }

    pub fn rawlog_parser(&self) -> RawLogParser {
        RawLogParser::new(NumericPolicy::from_strict_flag(
            self.config.rawlog_strict_numeric,
        ))
    }
}

#[derive(serde::Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Dynamodb,
    Memory,
}

#[derive(serde::Deserialize, Debug, Clone)]
pub struct Config {
    // Service port
    #[serde(default = "default_api_service_port")]
    pub api_service_port: String,

    // Loggers
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    #[serde(default)]
    pub log_format: String,
    #[serde(default)]
    pub sentry_dsn: Option<String>,

    // Prefix for the data routes, empty means root
    #[serde(default)]
    pub api_base_path: String,

    // Store configs
    #[serde(default)]
    pub store_backend: StoreBackend,
    #[serde(default = "default_iaq_table_name")]
    pub iaq_table_name: String,
    #[serde(default = "default_aws_region")]
    pub aws_region: String,
    #[serde(default)]
    pub dynamodb_endpoint: Option<String>,

    // Reject raw logs with unparsable numbers instead of storing NaN
    #[serde(default)]
    pub rawlog_strict_numeric: bool,
}

fn default_api_service_port() -> String {
    "3000".to_string()
}

fn default_rust_log() -> String {
    "info".to_string()
}

fn default_iaq_table_name() -> String {
    "IAQData".to_string()
}

fn default_aws_region() -> String {
    "ap-southeast-1".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_service_port: default_api_service_port(),
            rust_log: default_rust_log(),
            log_format: String::new(),
            sentry_dsn: None,
            api_base_path: String::new(),
            store_backend: StoreBackend::default(),
            iaq_table_name: default_iaq_table_name(),
            aws_region: default_aws_region(),
            dynamodb_endpoint: None,
            rawlog_strict_numeric: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, envy::Error> {
        // Load .env file if present (useful when running outside docker-compose)
        match dotenv::dotenv() {
            Ok(path) => eprintln!("Loaded .env from: {}", path.display()),
            Err(e) => eprintln!("dotenv warning: {e}"),
        }

        envy::from_env::<Config>()
    }

    /// Normalized base path (`/api`), or `None` when routes live at the root.
    pub fn base_path(&self) -> Option<String> {
        let trimmed = self.api_base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            None
        } else {
            Some(format!("/{trimmed}"))
        }
    }

    pub fn connection_settings(
        &self,
    ) -> dynamo_models::connection::ConnectionSettings {
        dynamo_models::connection::ConnectionSettings {
            region: self.aws_region.clone(),
            endpoint_url: self.dynamodb_endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_path_normalization() {
        let mut config = Config::default();
        assert_eq!(config.base_path(), None);

        config.api_base_path = "/".to_string();
        assert_eq!(config.base_path(), None);

        config.api_base_path = "api/v1/".to_string();
        assert_eq!(config.base_path(), Some("/api/v1".to_string()));
    }
}
