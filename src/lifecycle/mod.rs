//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Spawn upload service → Bind listener → Serve
//!
//! Shutdown (signals.rs + shutdown.rs):
//!     SIGTERM/SIGINT → terminate upload service → serve loop ends → Exit
//! ```
//!
//! # Design Decisions
//! - Signal handlers are registered once, at startup, and carry no business
//!   logic beyond resolving a future
//! - Exactly one termination request reaches the child; later triggers are
//!   no-ops

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
