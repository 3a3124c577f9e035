//! HTTP surface subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, middleware, classify + policy gate)
//!     → forward engine (crate::forward)
//!     → relay.rs (verbatim response) | failure.rs (synthesized error)
//! ```

pub mod failure;
pub mod headers;
pub mod relay;
pub mod server;

pub use server::HttpServer;
