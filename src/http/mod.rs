//! HTTP gateway subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router)
//!     → /output-images  → listing scan
//!     → /files/*        → proxy forwarder (CORS forced)
//!     → /output/*       → output files (caching disabled)
//!     → everything else → static UI assets
//! ```

pub mod server;

pub use server::HttpServer;
