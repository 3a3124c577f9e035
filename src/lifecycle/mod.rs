//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging/metrics → Bind → Serve
//!
//! Shutdown:
//!     SIGTERM/SIGINT or broadcast trigger → stop accepting → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Shutdown stops the accept loop; in-flight drain is best-effort

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
