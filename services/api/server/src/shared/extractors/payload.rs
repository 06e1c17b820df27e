use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use serde_json::{Map, Value};

use crate::AppState;
use crate::iaq_api::iaq_error_v1::{IaqV1Detail, IaqV1Error, codes};
use crate::shared::extractors::request_id::RequestId;

/// Largest request body the JSON decoder will buffer.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// JSON body decoded by [`decode_json_body`], stored in request extensions.
#[derive(Debug, Clone)]
pub struct DecodedBody(pub Value);

/// Body-decoding shim that runs before any route handler.
///
/// Some gateways hand the body over as an undecoded byte stream even when the
/// content type says JSON. When the `content-type` header contains
/// `application/json` the whole body is buffered and parsed here, and the
/// result replaces anything decoded later. Unparsable JSON fails the request
/// with `INVALID_JSON`. Other content types pass through untouched.
pub async fn decode_json_body(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if !declares_json(request.headers()) {
        return next.run(request).await;
    }

    let RequestId(request_id) = RequestId::from_headers(request.headers());
    let (mut parts, body) = request.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            return invalid_json(&state, &request_id, format!("{e}"));
        }
    };

    match decode(&bytes) {
        Ok(value) => {
            parts.extensions.insert(DecodedBody(value));
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(e) => invalid_json(&state, &request_id, e.to_string()),
    }
}

/// An empty body decodes to `{}`.
fn decode(bytes: &Bytes) -> Result<Value, serde_json::Error> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes)
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains(mime::APPLICATION_JSON.as_ref()))
}

fn invalid_json(
    state: &AppState,
    request_id: &uuid::Uuid,
    detail: String,
) -> Response {
    state.metrics.record_error("json_body", "invalid_json");
    tracing::warn!(request_id = %request_id, "Rejected request body: {detail}");

    IaqV1Error::bad_request(
        codes::INVALID_JSON,
        "Invalid JSON".to_string(),
        vec![IaqV1Detail {
            field: None,
            code: "invalid_json".to_string(),
            message: detail,
            suggestion: "Send a valid JSON document".to_string(),
        }],
        request_id.to_string(),
    )
    .into_response()
}

/// The decoded request body as seen by route handlers.
///
/// Requests that skipped decoding, or whose JSON is not an object, expose no
/// fields.
#[derive(Debug, Clone)]
pub struct Payload(pub Value);

impl Payload {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Names from `required` that are absent. A key holding `null` counts as
    /// present.
    pub fn missing_fields(&self, required: &[&'static str]) -> Vec<&'static str> {
        required
            .iter()
            .copied()
            .filter(|name| self.field(name).is_none())
            .collect()
    }

    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.0.as_object_mut().and_then(|map| map.remove(name))
    }

    pub fn into_inner(self) -> Value {
        self.0
    }
}

impl<S> FromRequestParts<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .extensions
            .get::<DecodedBody>()
            .map(|DecodedBody(value)| value.clone())
            .unwrap_or_else(|| Value::Object(Map::new()));

        Ok(Payload(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    #[test]
    fn test_declares_json() {
        let mut headers = HeaderMap::new();
        assert!(!declares_json(&headers));

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        assert!(declares_json(&headers));

        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));
        assert!(!declares_json(&headers));
    }

    #[test]
    fn test_decode_empty_body_is_empty_object() {
        assert_eq!(decode(&Bytes::new()).unwrap(), json!({}));
        assert_eq!(decode(&Bytes::from_static(b" \n")).unwrap(), json!({}));
        assert!(decode(&Bytes::from_static(b"{\"pm25\":")).is_err());
    }

    #[test]
    fn test_missing_fields_treats_null_and_zero_as_present() {
        let payload = Payload(json!({"pm25": 0, "co2": null}));
        assert!(payload.missing_fields(&["pm25", "co2"]).is_empty());

        let payload = Payload(json!({"pm25": 1}));
        assert_eq!(payload.missing_fields(&["pm25", "co2"]), vec!["co2"]);

        let payload = Payload(json!([1, 2]));
        assert_eq!(
            payload.missing_fields(&["pm25", "co2"]),
            vec!["pm25", "co2"]
        );
    }
}
