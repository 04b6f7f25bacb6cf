//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (payment > 0, TTL within protocol limits)
//! - Check that URLs parse
//!
//! Returns all validation errors, not just the first.

use thiserror::Error;

use crate::config::schema::DeployerConfig;

/// Longest TTL a node accepts: 18 hours.
pub const MAX_TTL_MS: u64 = 18 * 60 * 60 * 1000;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("deploy.ttl_ms {0} exceeds the maximum of {max} ms", max = MAX_TTL_MS)]
    TtlTooLong(u64),

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("node.poll_interval_secs must not exceed node.wait_timeout_secs")]
    PollLongerThanWait,
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DeployerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.deploy.chain_name.trim().is_empty() {
        errors.push(ValidationError::Empty {
            field: "deploy.chain_name",
        });
    }
    if config.deploy.payment_amount == 0 {
        errors.push(ValidationError::Zero {
            field: "deploy.payment_amount",
        });
    }
    if config.deploy.gas_price == 0 {
        errors.push(ValidationError::Zero {
            field: "deploy.gas_price",
        });
    }
    if config.deploy.ttl_ms == 0 {
        errors.push(ValidationError::Zero {
            field: "deploy.ttl_ms",
        });
    } else if config.deploy.ttl_ms > MAX_TTL_MS {
        errors.push(ValidationError::TtlTooLong(config.deploy.ttl_ms));
    }

    for (field, value) in [
        ("node.rpc_url", &config.node.rpc_url),
        ("node.explorer_url", &config.node.explorer_url),
    ] {
        if url::Url::parse(value).is_err() {
            errors.push(ValidationError::InvalidUrl {
                field,
                value: value.clone(),
            });
        }
    }

    if config.node.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "node.request_timeout_secs",
        });
    }
    if config.node.wait_for_execution {
        if config.node.poll_interval_secs == 0 {
            errors.push(ValidationError::Zero {
                field: "node.poll_interval_secs",
            });
        }
        if config.node.poll_interval_secs > config.node.wait_timeout_secs {
            errors.push(ValidationError::PollLongerThanWait);
        }
    }

    if config.paths.secret_key.is_empty() {
        errors.push(ValidationError::Empty {
            field: "paths.secret_key",
        });
    }
    if config.paths.wasm.is_empty() {
        errors.push(ValidationError::Empty { field: "paths.wasm" });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
