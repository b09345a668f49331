//! Media Workspace Gateway Library

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod listing;
pub mod proxy;
pub mod uploader;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
