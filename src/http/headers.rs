//! Wire-level header contract between field devices, the proxy, and the
//! upstream application server.

use axum::http::HeaderName;

/// Marker header an embedded client may set to declare itself explicitly.
/// Also set on the outbound request when the proxy classifies a request as
/// embedded, so the upstream sees the classification.
pub const EMBEDDED_CLIENT: HeaderName = HeaderName::from_static("x-embedded-client");

/// Scheme the originator used, as declared by a fronting TLS terminator.
/// Always set to `https` on the outbound request: the upstream applies
/// uniform secure-only policy regardless of how the device connected.
pub const FORWARDED_PROTO: HeaderName = HeaderName::from_static("x-forwarded-proto");

/// Echo of the original `User-Agent` for embedded clients. The primary
/// identity header is overwritten with the proxy's own identity, so the
/// unmodified device signature travels under this name instead.
pub const ORIGINAL_USER_AGENT: HeaderName = HeaderName::from_static("x-original-user-agent");

/// Identity the proxy presents to the upstream.
pub const PROXY_USER_AGENT: &str = concat!("fieldgate/", env!("CARGO_PKG_VERSION"));
