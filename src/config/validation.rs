//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, decimals representable)
//! - Check that addresses and amounts parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - The signing key is checked at bootstrap, not here, so lazy deployments
//!   can start without one

use alloy::primitives::utils::parse_ether;
use alloy::primitives::Address;

use crate::config::schema::ServiceConfig;

/// Largest decimal count whose scale factor still fits a `U256`.
const MAX_DECIMALS: u8 = 77;

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

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.blockchain.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "blockchain.rpc_url",
            format!("'{}' is not a URL: {}", config.blockchain.rpc_url, e),
        ));
    }

    if config.blockchain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("blockchain.rpc_timeout_secs", "must be > 0"));
    }
    if config.blockchain.receipt_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "blockchain.receipt_timeout_secs",
            "must be > 0",
        ));
    }
    if config.blockchain.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "blockchain.receipt_poll_interval_ms",
            "must be > 0",
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.token.address.parse::<Address>().is_err() {
        errors.push(ValidationError::new(
            "token.address",
            format!("'{}' is not an address", config.token.address),
        ));
    }

    if config.token.decimals > MAX_DECIMALS {
        errors.push(ValidationError::new(
            "token.decimals",
            format!("must be <= {}", MAX_DECIMALS),
        ));
    }

    if let Err(e) = parse_ether(&config.token.native_tip) {
        errors.push(ValidationError::new(
            "token.native_tip",
            format!("'{}' is not an ether amount: {}", config.token.native_tip, e),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            "must be a socket address",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
