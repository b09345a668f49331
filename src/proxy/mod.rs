//! Upload-traffic forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! request under the upload prefix
//!     → forwarder.rs (origin rewrite: scheme, authority, Host header)
//!     → local upload service
//!     → response (three CORS headers forced, last write wins)
//!     → client
//! ```

pub mod forwarder;

pub use forwarder::{force_cors_headers, Forwarder};
