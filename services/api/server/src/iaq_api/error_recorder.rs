use uuid::Uuid;

use crate::iaq_api::iaq_error_v1::IaqV1Error;
use crate::metrics::ServerMetrics;

/// Trait for handler error types that can be converted to [`IaqV1Error`].
pub trait IntoIaqV1Error: std::fmt::Display {
    /// Label used for the `error_code` metric dimension.
    fn metric_code(&self) -> &'static str;

    fn into_iaq_v1_error(self, request_id: &Uuid) -> IaqV1Error;
}

/// Logs the failure with its full detail, records error metrics and converts
/// handler errors to [`IaqV1Error`].
pub struct ErrorRecorder<'a> {
    metrics: &'a ServerMetrics,
    handler_name: &'a str,
    request_id: &'a Uuid,
}

impl<'a> ErrorRecorder<'a> {
    pub fn new(
        metrics: &'a ServerMetrics,
        handler_name: &'a str,
        request_id: &'a Uuid,
    ) -> Self {
        Self {
            metrics,
            handler_name,
            request_id,
        }
    }

    pub fn record<E: IntoIaqV1Error>(&self, e: E) -> IaqV1Error {
        let code = e.metric_code();
        let detail = e.to_string();
        self.metrics.record_error(self.handler_name, code);

        let error = e.into_iaq_v1_error(self.request_id);
        if error.status_code().is_server_error() {
            tracing::error!(
                handler = self.handler_name,
                error_code = code,
                request_id = %self.request_id,
                "{detail}",
            );
        } else {
            tracing::warn!(
                handler = self.handler_name,
                error_code = code,
                request_id = %self.request_id,
                "{detail}",
            );
        }

        error
    }
}
