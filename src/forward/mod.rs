//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! classified request
//!     → engine.rs (authority rewrite, policy headers, bounded upstream call)
//!     → UpstreamResponse (buffered)   on success
//!     → ForwardError (error.rs)       on transport failure
//! ```
//!
//! # Design Decisions
//! - Single upstream target, fixed for the process lifetime
//! - One attempt per request; no retry logic in the engine
//! - Responses are fully buffered before the relay emits anything, so a
//!   partially-written response to the originator cannot exist

pub mod engine;
pub mod error;

pub use engine::{EngineBuildError, ForwardEngine, UpstreamResponse};
pub use error::ForwardError;
