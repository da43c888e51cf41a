//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value shapes (addresses, TLS paths, prefix, upstream URL)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use thiserror::Error;
use url::Url;

use crate::config::schema::ServerConfig;

/// A single configuration violation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address must not be empty")]
    EmptyBindAddress,
    #[error("listener.tls.{0} must not be empty")]
    EmptyTlsPath(&'static str),
    #[error("path_prefix must start with '/': {0:?}")]
    PrefixNotRooted(String),
    #[error("upstream.url is not a valid URL: {0}")]
    UpstreamUrl(String),
    #[error("upstream.url scheme must be http, https or file, got {0:?}")]
    UpstreamScheme(String),
}

/// Validate a configuration, collecting every violation.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.is_empty() {
        errors.push(ValidationError::EmptyBindAddress);
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.is_empty() {
            errors.push(ValidationError::EmptyTlsPath("cert_path"));
        }
        if tls.key_path.is_empty() {
            errors.push(ValidationError::EmptyTlsPath("key_path"));
        }
    }

    if !config.path_prefix.is_empty() && !config.path_prefix.starts_with('/') {
        errors.push(ValidationError::PrefixNotRooted(config.path_prefix.clone()));
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https" | "file") => {
            errors.push(ValidationError::UpstreamScheme(url.scheme().to_string()));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::UpstreamUrl(e.to_string())),
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
