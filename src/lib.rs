//! fieldgate — a classification-aware reverse proxy for embedded cellular
//! field devices.
//!
//! Sits between constrained field controllers and a single backend
//! application server. Each inbound request is classified (embedded device
//! vs generic client), gated by transport policy (embedded clients are never
//! redirected; generic insecure traffic is redirected to HTTPS in
//! production), then forwarded upstream with a fixed header contract and
//! relayed back verbatim. Forwarding failures become a uniform 502 with a
//! structured JSON body.

pub mod classify;
pub mod config;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
