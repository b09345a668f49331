//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → shared via Arc with the HTTP handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults reproducing the fixed values the gateway was
//!   originally deployed with, so running without a config file is valid
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ContentConfig;
pub use schema::GatewayConfig;
pub use schema::ListenerConfig;
pub use schema::ProxyConfig;
pub use schema::UploaderConfig;
