//! Failure responder.
//!
//! Converts per-request failures into uniform JSON responses. The body shape
//! is fixed; transport detail and panic payloads are logged on the
//! diagnostic channel and never returned to the caller.

use std::any::Any;

use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::classify::ClientClass;
use crate::forward::ForwardError;

/// Fixed shape of a synthesized error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: &'static str,
    pub timestamp: String,
    pub target: String,
    pub classification: &'static str,
}

/// Synthesize the uniform 502 for a forwarding failure.
///
/// Logs the full underlying error regardless of classification.
pub fn bad_gateway(err: &ForwardError, target: &str, class: ClientClass) -> Response {
    tracing::error!(
        error = err.kind_label(),
        cause = %err.cause(),
        target = %target,
        client = class.as_str(),
        "forwarding failed"
    );

    let body = ErrorBody {
        error: err.kind_label(),
        message: err.public_message(),
        timestamp: Utc::now().to_rfc3339(),
        target: target.to_string(),
        classification: class.as_str(),
    };

    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

/// Top-level panic handler: a generic 500 with message and timestamp,
/// never a stack trace or panic payload.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response<Body> {
    let detail = err
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| err.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());

    tracing::error!(panic = %detail, "request handler panicked");

    let body = serde_json::json!({
        "error": "internal_error",
        "message": "The proxy encountered an internal error.",
        "timestamp": Utc::now().to_rfc3339(),
    });

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_has_the_contract_fields() {
        let body = ErrorBody {
            error: "upstream_connect_failed",
            message: "The upstream server could not be reached.",
            timestamp: Utc::now().to_rfc3339(),
            target: "https://app.example.com".to_string(),
            classification: "embedded",
        };

        let json = serde_json::to_value(&body).unwrap();
        for field in ["error", "message", "timestamp", "target", "classification"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
    }
}
