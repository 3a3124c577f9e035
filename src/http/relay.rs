//! Response relay.
//!
//! Passes a buffered upstream response back to the originator unchanged:
//! same status, same body bytes, same semantic headers. The only headers not
//! reproduced are hop-by-hop ones, which belong to each individual
//! connection. Every relayed response produces one structured log entry and
//! one metrics sample keyed by classification.

use std::time::Instant;

use axum::body::Body;
use axum::http::Method;
use axum::response::Response;

use crate::classify::ClientClass;
use crate::forward::engine::is_hop_by_hop;
use crate::forward::UpstreamResponse;
use crate::observability::metrics;

/// Relay an upstream response to the originator.
pub fn relay(
    upstream: UpstreamResponse,
    method: &Method,
    path: &str,
    class: ClientClass,
    start: Instant,
) -> Response {
    tracing::info!(
        status = upstream.status.as_u16(),
        method = %method,
        path = %path,
        client = class.as_str(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "relayed upstream response"
    );
    metrics::record_request(method.as_str(), upstream.status.as_u16(), class.as_str(), start);

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    let headers = response.headers_mut();
    for (name, value) in upstream.headers.iter() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    response
}
