//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Backend base URL must be an absolute http URL (the backend sits on the
//!   kiosk's local network; the client has no TLS connector)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Bind addresses must parse as socket addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.backend.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {
            if url.query().is_some() {
                errors.push(ValidationError::new(
                    "backend.base_url",
                    "must not carry a query string",
                ));
            }
        }
        Ok(url) => errors.push(ValidationError::new(
            "backend.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "backend.base_url",
            format!("invalid URL: {}", e),
        )),
    }

    if config.backend.connect_timeout_ms == 0 {
        errors.push(ValidationError::new("backend.connect_timeout_ms", "must be greater than 0"));
    }
    if config.timeouts.default_ms == 0 {
        errors.push(ValidationError::new("timeouts.default_ms", "must be greater than 0"));
    }
    if config.timeouts.barcode_ms == 0 {
        errors.push(ValidationError::new("timeouts.barcode_ms", "must be greater than 0"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
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
    fn test_default_config_is_valid() {
        assert!(validate_config(&GatewayConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.backend.base_url = "ftp://backend".into();
        config.timeouts.barcode_ms = 0;
        config.listener.bind_address = "nowhere".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["backend.base_url", "timeouts.barcode_ms", "listener.bind_address"]
        );
    }

    #[test]
    fn test_accepts_https_backend() {
        let mut config = GatewayConfig::default();
        config.backend.base_url = "https://api.kiosk.example/v1/".into();
        assert!(validate_config(&config).is_ok());

        config.backend.base_url = "https://api.kiosk.example/?tenant=a".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "backend.base_url");
    }

    #[test]
    fn test_rejects_relative_base_url() {
        let mut config = GatewayConfig::default();
        config.backend.base_url = "localhost:8000".into();
        // "localhost" parses as a scheme, so this is reported as unsupported
        assert!(validate_config(&config).is_err());

        config.backend.base_url = "/api".into();
        assert!(validate_config(&config).is_err());
    }
}
