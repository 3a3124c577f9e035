//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream target is a usable base URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over `ProxyConfig`
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic configuration error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a valid socket address")]
    BindAddress(String),

    #[error("upstream.url must not be empty")]
    EmptyUpstream,

    #[error("upstream.url '{url}' is not a valid URL: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("upstream.url '{0}' must use the http or https scheme")]
    UpstreamScheme(String),

    #[error("routes.forward_prefix '{0}' must start with '/' and name a non-root prefix")]
    ForwardPrefix(String),

    #[error("classifier.signatures must not be empty")]
    NoSignatures,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("limits.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.upstream.url.is_empty() {
        errors.push(ValidationError::EmptyUpstream);
    } else {
        match Url::parse(&config.upstream.url) {
            Ok(url) if url.scheme() != "http" && url.scheme() != "https" => {
                errors.push(ValidationError::UpstreamScheme(config.upstream.url.clone()));
            }
            Ok(_) => {}
            Err(e) => errors.push(ValidationError::UpstreamUrl {
                url: config.upstream.url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    let prefix = &config.routes.forward_prefix;
    if !prefix.starts_with('/') || prefix.trim_end_matches('/').len() < 2 {
        errors.push(ValidationError::ForwardPrefix(prefix.clone()));
    }

    if config.classifier.signatures.is_empty() {
        errors.push(ValidationError::NoSignatures);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
