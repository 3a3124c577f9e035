//! Forwarding engine.
//!
//! Rewrites an inbound request against the single configured upstream target
//! and sends it, injecting the policy headers the upstream relies on. The
//! payload is never transformed: body bytes and semantic headers
//! (content type, authorization) pass through untouched.

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::classify::ClientClass;
use crate::config::{TimeoutConfig, UpstreamConfig};
use crate::forward::error::ForwardError;
use crate::http::headers::{EMBEDDED_CLIENT, FORWARDED_PROTO, ORIGINAL_USER_AGENT, PROXY_USER_AGENT};
use crate::policy::SECURE_SCHEME;

/// A fully-buffered response from the upstream.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// Error constructing the engine at startup.
#[derive(Debug, Error)]
pub enum EngineBuildError {
    #[error("invalid upstream url '{0}'")]
    Url(String, #[source] url::ParseError),

    #[error("failed to build upstream client")]
    Client(#[from] reqwest::Error),
}

/// Forwards requests to the configured upstream target.
///
/// The client verifies upstream TLS certificates and follows upstream
/// redirects transparently (reqwest defaults). Retry policy, if any, belongs
/// to the transport, not here: one attempt per request.
pub struct ForwardEngine {
    client: reqwest::Client,
    /// Base URL with any trailing slash removed, ready for path join.
    base: String,
}

impl ForwardEngine {
    pub fn new(upstream: &UpstreamConfig, timeouts: &TimeoutConfig) -> Result<Self, EngineBuildError> {
        // Parsed only to fail fast on a bad target; requests are built by
        // string join to preserve the path and query byte-for-byte.
        Url::parse(&upstream.url)
            .map_err(|e| EngineBuildError::Url(upstream.url.clone(), e))?;

        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.upstream_secs))
            .build()?;

        Ok(Self {
            client,
            base: upstream.url.trim_end_matches('/').to_string(),
        })
    }

    /// The configured upstream target, for health output and error bodies.
    pub fn target(&self) -> &str {
        &self.base
    }

    /// Forward one request upstream and buffer the full response.
    ///
    /// `path_and_query` is relayed exactly as received; only the authority
    /// changes.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        headers: &HeaderMap,
        body: Bytes,
        class: ClientClass,
    ) -> Result<UpstreamResponse, ForwardError> {
        let url = format!("{}{}", self.base, path_and_query);
        let out_headers = build_outbound_headers(headers, class);

        let response = self
            .client
            .request(method, &url)
            .headers(out_headers)
            .body(body)
            .send()
            .await
            .map_err(ForwardError::from)?;

        let status = response.status();
        let headers = response.headers().clone();
        // A malformed or truncated upstream body surfaces here as a
        // transport error.
        let body = response.bytes().await.map_err(ForwardError::from)?;

        Ok(UpstreamResponse {
            status,
            headers,
            body,
        })
    }
}

/// Build the outbound header map for the upstream request.
///
/// Hop-by-hop headers and the authority are dropped; repeated values of the
/// remaining headers are preserved in order. The proxy then asserts its own
/// identity and scheme, and carries the classification across for embedded
/// clients.
fn build_outbound_headers(inbound: &HeaderMap, class: ClientClass) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(inbound.len() + 4);

    for (name, value) in inbound.iter() {
        if is_hop_by_hop(name.as_str()) || is_rewritten(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }

    out.insert(header::USER_AGENT, HeaderValue::from_static(PROXY_USER_AGENT));
    out.insert(&FORWARDED_PROTO, HeaderValue::from_static(SECURE_SCHEME));

    if class.is_embedded() {
        out.insert(&EMBEDDED_CLIENT, HeaderValue::from_static("true"));
        if let Some(original) = inbound.get(header::USER_AGENT) {
            // Byte-for-byte echo of the device signature.
            out.insert(&ORIGINAL_USER_AGENT, original.clone());
        }
    }

    out
}

/// Headers the proxy owns on the outbound request.
fn is_rewritten(name: &HeaderName) -> bool {
    *name == header::HOST
        || *name == header::USER_AGENT
        || *name == header::CONTENT_LENGTH
        || *name == FORWARDED_PROTO
        || *name == EMBEDDED_CLIENT
        || *name == ORIGINAL_USER_AGENT
}

/// RFC 7230 hop-by-hop headers, never forwarded in either direction.
pub fn is_hop_by_hop(name: &str) -> bool {
    matches!(
        name,
        "connection"
            | "keep-alive"
            | "proxy-authenticate"
            | "proxy-authorization"
            | "te"
            | "trailer"
            | "transfer-encoding"
            | "upgrade"
    )
}
