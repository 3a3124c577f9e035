//! Client classification.
//!
//! Every inbound request is classified as coming from either an embedded
//! field device or a generic client (browser, curl, monitoring). The result
//! drives transport policy (embedded clients are never redirected) and the
//! outbound header contract.
//!
//! Classification is a pure function over the request headers: no state is
//! kept across requests, and absent headers always classify as generic.

use axum::http::{header, HeaderMap};

use crate::config::ClassifierConfig;
use crate::http::headers::EMBEDDED_CLIENT;

// User-Agent values are attacker-controlled; bound what we inspect.
const MAX_USER_AGENT_LENGTH: usize = 2048;

/// The class of the originating client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientClass {
    /// A resource-constrained field device (cellular controller).
    Embedded,
    /// Anything else.
    Generic,
}

impl ClientClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientClass::Embedded => "embedded",
            ClientClass::Generic => "generic",
        }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, ClientClass::Embedded)
    }
}

/// Classifies requests from their identifying headers.
pub struct Classifier {
    /// Known embedded-client signature substrings, lowercased.
    signatures: Vec<String>,
}

impl Classifier {
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            signatures: config
                .signatures
                .iter()
                .map(|s| s.to_ascii_lowercase())
                .collect(),
        }
    }

    /// Classify a request from its headers.
    ///
    /// A request is embedded if its `User-Agent` contains any configured
    /// signature substring (case-insensitive), or if the explicit marker
    /// header is present and true. Any single signal wins; everything else
    /// is generic.
    pub fn classify(&self, headers: &HeaderMap) -> ClientClass {
        if marker_is_set(headers) {
            return ClientClass::Embedded;
        }

        if let Some(ua) = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
        {
            let bounded = &ua[..ua.len().min(MAX_USER_AGENT_LENGTH)];
            let ua_lower = bounded.to_ascii_lowercase();
            if self.signatures.iter().any(|sig| ua_lower.contains(sig)) {
                return ClientClass::Embedded;
            }
        }

        ClientClass::Generic
    }
}

fn marker_is_set(headers: &HeaderMap) -> bool {
    headers
        .get(&EMBEDDED_CLIENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
        .unwrap_or(false)
}
