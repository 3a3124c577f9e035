//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the local and forwarding routes
//! - Wire up middleware (tracing, timeout, body limit, request ID, panics)
//! - Classify each inbound request and apply transport policy
//! - Forward to the upstream and relay or synthesize the response
//!
//! Per-request flow: classify → policy gate (may short-circuit with a
//! redirect) → forward → relay on success, synthesized 502 on failure.
//! No request is processed twice, and nothing transitions backwards.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::classify::Classifier;
use crate::config::{Mode, ProxyConfig};
use crate::forward::{EngineBuildError, ForwardEngine};
use crate::http::{failure, relay};
use crate::lifecycle::signals;
use crate::observability::metrics;
use crate::policy::{self, TransportDecision};

/// Application state injected into handlers.
///
/// Everything here is immutable after startup; concurrent requests share it
/// without coordination.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
    pub engine: Arc<ForwardEngine>,
    pub mode: Mode,
    pub max_body_bytes: usize,
    pub started_at: Instant,
}

/// HTTP server for the proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, EngineBuildError> {
        let classifier = Arc::new(Classifier::from_config(&config.classifier));
        let engine = Arc::new(ForwardEngine::new(&config.upstream, &config.timeouts)?);

        let state = AppState {
            classifier,
            engine,
            mode: config.mode,
            max_body_bytes: config.limits.max_body_bytes,
            started_at: Instant::now(),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let prefix = config.routes.forward_prefix.trim_end_matches('/');

        Router::new()
            .route("/", any(root_handler))
            .route("/health", get(health_handler))
            .route(prefix, any(proxy_handler))
            .route(&format!("{prefix}/{{*path}}"), any(proxy_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CatchPanicLayer::custom(failure::handle_panic))
                    .layer(TraceLayer::new_for_http())
                    .layer(RequestBodyLimitLayer::new(config.limits.max_body_bytes))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Returns when the shutdown channel fires or a termination signal
    /// arrives; in-flight requests are given a best-effort chance to finish.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = self.config.mode.as_str(),
            target = %self.config.upstream.url,
            forward_prefix = %self.config.routes.forward_prefix,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signals::shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Main proxy handler: classify, gate, forward, relay.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();

    let class = state.classifier.classify(&parts.headers);
    let scheme = policy::declared_scheme(&parts.headers);
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| parts.uri.path().to_string());

    let host = parts
        .headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| parts.uri.authority().map(|a| a.as_str()));

    match policy::decide(class, &scheme, state.mode, host, &path_and_query) {
        TransportDecision::Redirect(location) => {
            tracing::info!(
                method = %parts.method,
                path = %parts.uri.path(),
                client = class.as_str(),
                location = %location,
                "redirecting insecure request"
            );
            metrics::record_request(
                parts.method.as_str(),
                StatusCode::MOVED_PERMANENTLY.as_u16(),
                class.as_str(),
                start,
            );
            return (
                StatusCode::MOVED_PERMANENTLY,
                [(header::LOCATION, location)],
            )
                .into_response();
        }
        TransportDecision::Pass => {}
    }

    let body_bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                method = %parts.method,
                path = %parts.uri.path(),
                error = %e,
                "failed to buffer request body"
            );
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                "request body exceeds the configured limit",
            )
                .into_response();
        }
    };

    tracing::debug!(
        method = %parts.method,
        path = %parts.uri.path(),
        client = class.as_str(),
        body_bytes = body_bytes.len(),
        "forwarding request"
    );

    match state
        .engine
        .forward(
            parts.method.clone(),
            &path_and_query,
            &parts.headers,
            body_bytes,
            class,
        )
        .await
    {
        Ok(upstream) => relay::relay(upstream, &parts.method, parts.uri.path(), class, start),
        Err(err) => {
            metrics::record_request(
                parts.method.as_str(),
                StatusCode::BAD_GATEWAY.as_u16(),
                class.as_str(),
                start,
            );
            failure::bad_gateway(&err, state.engine.target(), class)
        }
    }
}

/// Service identity, plus the classification of the calling request.
async fn root_handler(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let class = state.classifier.classify(&headers);
    Json(serde_json::json!({
        "service": "fieldgate",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.mode.as_str(),
        "client": class.as_str(),
    }))
    .into_response()
}

/// Process health: status, uptime, configured target. Never forwarded.
async fn health_handler(State(state): State<AppState>) -> Response {
    Json(serde_json::json!({
        "status": "healthy",
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "target": state.engine.target(),
    }))
    .into_response()
}
