//! Forwarding error taxonomy.

use thiserror::Error;

/// A per-request forwarding failure.
///
/// Each kind maps to the same synthesized 502 response; the kind label and a
/// fixed human-readable message go to the caller, the underlying transport
/// error goes to the diagnostic log only.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("could not connect to upstream")]
    Connect(#[source] reqwest::Error),

    #[error("upstream transport error")]
    Transport(#[source] reqwest::Error),
}

impl ForwardError {
    /// Stable machine-readable label for the synthesized error body.
    pub fn kind_label(&self) -> &'static str {
        match self {
            ForwardError::Timeout(_) => "upstream_timeout",
            ForwardError::Connect(_) => "upstream_connect_failed",
            ForwardError::Transport(_) => "upstream_error",
        }
    }

    /// Fixed caller-facing message. Never includes transport detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            ForwardError::Timeout(_) => "The upstream server did not respond in time.",
            ForwardError::Connect(_) => "The upstream server could not be reached.",
            ForwardError::Transport(_) => "The upstream request failed.",
        }
    }

    /// The underlying transport error, for logging.
    pub fn cause(&self) -> &reqwest::Error {
        match self {
            ForwardError::Timeout(e) | ForwardError::Connect(e) | ForwardError::Transport(e) => e,
        }
    }
}

impl From<reqwest::Error> for ForwardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ForwardError::Timeout(e)
        } else if e.is_connect() {
            ForwardError::Connect(e)
        } else {
            ForwardError::Transport(e)
        }
    }
}
