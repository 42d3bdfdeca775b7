//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that addresses and URLs parse
//! - Validate value ranges (timeouts > 0, backoff base <= max)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>

use alloy::primitives::Address;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::RelayConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = url::Url::parse(&config.blockchain.rpc_url) {
        errors.push(ValidationError::new("blockchain.rpc_url", e.to_string()));
    }
    for failover in &config.blockchain.failover_urls {
        if let Err(e) = url::Url::parse(failover) {
            errors.push(ValidationError::new(
                "blockchain.failover_urls",
                format!("'{}': {}", failover, e),
            ));
        }
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }

    if config.module.module_address.is_empty() {
        errors.push(ValidationError::new("module.module_address", "is required"));
    } else if config.module.module_address.parse::<Address>().is_err() {
        errors.push(ValidationError::new("module.module_address", "is not an address"));
    }
    if !config.module.safe_address.is_empty()
        && config.module.safe_address.parse::<Address>().is_err()
    {
        errors.push(ValidationError::new("module.safe_address", "is not an address"));
    }
    if config.module.default_rescuer_delay_secs == 0 {
        errors.push(ValidationError::new(
            "module.default_rescuer_delay_secs",
            "must be > 0 (zero removes a rescuer)",
        ));
    }

    if let Err(e) = url::Url::parse(&config.store.api_url) {
        errors.push(ValidationError::new("store.api_url", e.to_string()));
    }
    if config.store.request_timeout_secs == 0 {
        errors.push(ValidationError::new("store.request_timeout_secs", "must be > 0"));
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("must be one of {}", LOG_LEVELS.join(", ")),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "is not a socket address",
        ));
    }

    if config.monitor.poll_interval_secs == 0 {
        errors.push(ValidationError::new("monitor.poll_interval_secs", "must be > 0"));
    }
    if config.monitor.backoff_base_ms > config.monitor.backoff_max_ms {
        errors.push(ValidationError::new(
            "monitor.backoff_base_ms",
            "must not exceed monitor.backoff_max_ms",
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

    fn valid() -> RelayConfig {
        let mut config = RelayConfig::default();
        config.module.module_address = "0x1111111111111111111111111111111111111111".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid();
        config.module.module_address = "nope".to_string();
        config.store.request_timeout_secs = 0;
        config.monitor.backoff_base_ms = 10;
        config.monitor.backoff_max_ms = 1;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "module.module_address",
                "store.request_timeout_secs",
                "monitor.backoff_base_ms"
            ]
        );
    }

    #[test]
    fn test_missing_module_address() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert_eq!(errors[0].to_string(), "module.module_address: is required");
    }
}
