//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Reverse-proxy settings for upload traffic.
    pub proxy: ProxyConfig,

    /// Upload-service subprocess settings.
    pub uploader: UploaderConfig,

    /// Static UI and generated-output locations.
    pub content: ContentConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:2999").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:2999".to_string(),
        }
    }
}

/// Upload-proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path prefix under which requests are forwarded to the upload service.
    pub path_prefix: String,

    /// Local origin (host:port) the upload service listens on.
    pub upload_origin: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            path_prefix: "/files".to_string(),
            upload_origin: "127.0.0.1:8080".to_string(),
        }
    }
}

/// Upload-service subprocess configuration.
///
/// The argument set the child is launched with is fixed; only the locations
/// it points at are configurable.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploaderConfig {
    /// Upload-service binary, resolved via PATH when not absolute.
    pub binary: String,

    /// Directory the upload service stores uploads in.
    pub upload_dir: PathBuf,

    /// Hooks directory passed through to the upload service; the gateway
    /// never interprets it.
    pub hooks_dir: PathBuf,
}

impl Default for UploaderConfig {
    fn default() -> Self {
        Self {
            binary: "tusd".to_string(),
            upload_dir: PathBuf::from("/workspace"),
            hooks_dir: PathBuf::from("/etc/tusd/hooks"),
        }
    }
}

/// Content locations served by the gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Static UI asset directory, served for all non-reserved paths.
    pub static_dir: PathBuf,

    /// Directory the generation pipeline writes images into. Externally
    /// owned and mutated; the gateway only reads it.
    pub output_dir: PathBuf,

    /// Public path prefix under which output files are served.
    pub output_public_path: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("public"),
            output_dir: PathBuf::from("/workspace/ComfyUI/output"),
            output_public_path: "/output".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_deployment_values() {
        let config = GatewayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:2999");
        assert_eq!(config.proxy.path_prefix, "/files");
        assert_eq!(config.proxy.upload_origin, "127.0.0.1:8080");
        assert_eq!(config.uploader.binary, "tusd");
        assert_eq!(config.content.output_public_path, "/output");
    }

    #[test]
    fn empty_toml_deserializes_to_defaults() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:2999");
        assert_eq!(
            config.content.output_dir,
            PathBuf::from("/workspace/ComfyUI/output")
        );
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.proxy.upload_origin, "127.0.0.1:8080");
    }
}
