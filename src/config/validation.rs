//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Addresses must parse before anything binds or forwards
//! - Path prefixes must be absolute, filesystem locations non-empty
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::uri::Authority;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic validation failure.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("invalid upload origin '{0}' (expected host:port)")]
    InvalidUploadOrigin(String),

    #[error("path prefix '{0}' must start with '/'")]
    RelativePathPrefix(String),

    #[error("{0} must not be empty")]
    EmptyPath(&'static str),
}

/// Validate the full configuration, collecting every failure.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.proxy.upload_origin.parse::<Authority>().is_err() {
        errors.push(ValidationError::InvalidUploadOrigin(
            config.proxy.upload_origin.clone(),
        ));
    }

    for prefix in [
        &config.proxy.path_prefix,
        &config.content.output_public_path,
    ] {
        if !prefix.starts_with('/') || prefix.len() < 2 {
            errors.push(ValidationError::RelativePathPrefix(prefix.clone()));
        }
    }

    if config.uploader.binary.is_empty() {
        errors.push(ValidationError::EmptyPath("uploader.binary"));
    }
    if config.uploader.upload_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPath("uploader.upload_dir"));
    }
    if config.uploader.hooks_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPath("uploader.hooks_dir"));
    }
    if config.content.static_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPath("content.static_dir"));
    }
    if config.content.output_dir.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyPath("content.output_dir"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn bad_bind_address_is_rejected() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "not-an-address".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors[0],
            ValidationError::InvalidBindAddress(_)
        ));
    }

    #[test]
    fn relative_path_prefix_is_rejected() {
        let mut config = GatewayConfig::default();
        config.proxy.path_prefix = "files".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::RelativePathPrefix(_)));
    }

    #[test]
    fn all_errors_are_collected() {
        let mut config = GatewayConfig::default();
        config.listener.bind_address = "nope".to_string();
        config.uploader.binary = String::new();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
