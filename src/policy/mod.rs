//! Transport policy gate.
//!
//! Decides, before any forwarding attempt, whether a request passes through
//! or is redirected to the secure scheme. Embedded clients are never
//! redirected: constrained devices may not implement redirect-following or
//! afford a TLS renegotiation over a cellular link. Generic clients arriving
//! insecurely in production are permanently redirected to HTTPS.
//!
//! A redirect terminates the request immediately; the upstream is never
//! contacted.

use axum::http::HeaderMap;

use crate::classify::ClientClass;
use crate::config::Mode;
use crate::http::headers::FORWARDED_PROTO;

/// The secure scheme literal used for redirects and the outbound
/// forwarded-scheme header.
pub const SECURE_SCHEME: &str = "https";

/// Outcome of the transport policy gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportDecision {
    /// Continue to the forwarding engine.
    Pass,
    /// Terminate with a permanent redirect to this location.
    Redirect(String),
}

/// The scheme the originator used, as declared by the request.
///
/// Trusts `x-forwarded-proto` when present (the proxy is expected to sit
/// behind a TLS terminator in production); otherwise the literal listener
/// scheme, which is plain HTTP.
pub fn declared_scheme(headers: &HeaderMap) -> String {
    headers
        .get(&FORWARDED_PROTO)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_else(|| "http".to_string())
}

/// Decide the transport policy for a classified request.
///
/// `host` is the authority the redirect is rebuilt against; without one no
/// redirect can be constructed and the request passes through.
pub fn decide(
    class: ClientClass,
    scheme: &str,
    mode: Mode,
    host: Option<&str>,
    path_and_query: &str,
) -> TransportDecision {
    if class.is_embedded() {
        return TransportDecision::Pass;
    }

    if mode.is_production() && scheme != SECURE_SCHEME {
        if let Some(host) = host {
            return TransportDecision::Redirect(format!(
                "{SECURE_SCHEME}://{host}{path_and_query}"
            ));
        }
    }

    TransportDecision::Pass
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn embedded_never_redirects() {
        for mode in [Mode::Production, Mode::Development] {
            for scheme in ["http", "https"] {
                let decision = decide(
                    ClientClass::Embedded,
                    scheme,
                    mode,
                    Some("gate.example.com"),
                    "/api/open",
                );
                assert_eq!(decision, TransportDecision::Pass);
            }
        }
    }

    #[test]
    fn generic_insecure_production_redirects() {
        let decision = decide(
            ClientClass::Generic,
            "http",
            Mode::Production,
            Some("gate.example.com"),
            "/api/status?full=1",
        );
        assert_eq!(
            decision,
            TransportDecision::Redirect("https://gate.example.com/api/status?full=1".to_string())
        );
    }

    #[test]
    fn generic_secure_production_passes() {
        let decision = decide(
            ClientClass::Generic,
            "https",
            Mode::Production,
            Some("gate.example.com"),
            "/api/status",
        );
        assert_eq!(decision, TransportDecision::Pass);
    }

    #[test]
    fn generic_insecure_development_passes() {
        let decision = decide(
            ClientClass::Generic,
            "http",
            Mode::Development,
            Some("gate.example.com"),
            "/api/status",
        );
        assert_eq!(decision, TransportDecision::Pass);
    }

    #[test]
    fn missing_host_passes() {
        let decision = decide(ClientClass::Generic, "http", Mode::Production, None, "/api");
        assert_eq!(decision, TransportDecision::Pass);
    }

    #[test]
    fn declared_scheme_prefers_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(&FORWARDED_PROTO, HeaderValue::from_static("HTTPS"));
        assert_eq!(declared_scheme(&headers), "https");
    }

    #[test]
    fn declared_scheme_defaults_to_http() {
        assert_eq!(declared_scheme(&HeaderMap::new()), "http");
    }
}
