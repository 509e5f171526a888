//! Configuration validation for VeriCore services.
//!
//! Ensures all required values are present and within valid ranges before a
//! service starts. Missing oracle credentials are caught here, at startup,
//! never during request handling.

use thiserror::Error;

use crate::config::{Config, ObservabilityConfig, OracleConfig, ServiceConfig};

/// Configuration validation error.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid port {port}: must be between 1 and 65535")]
    InvalidPort { port: u16, field: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Multiple validation errors: {0:?}")]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Trait for validatable configuration sections.
pub trait Validate {
    /// Validate this configuration section.
    fn validate(&self) -> ValidationResult<()>;
}

impl Config {
    /// Validate the entire configuration.
    pub fn validate(&self) -> ValidationResult<()> {
        let mut errors = Vec::new();

        if let Err(e) = self.service.validate() {
            errors.push(e);
        }
        if let Err(e) = self.oracle.validate() {
            errors.push(e);
        }
        if let Err(e) = self.observability.validate() {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else if errors.len() == 1 {
            Err(errors.remove(0))
        } else {
            Err(ValidationError::Multiple(errors))
        }
    }

    /// Load configuration with environment overrides and validate it.
    pub fn load_and_validate() -> anyhow::Result<Self> {
        let config = Self::load_with_env()?;
        config.validate().map_err(|e| anyhow::anyhow!("{}", e))?;
        Ok(config)
    }
}

impl Validate for ServiceConfig {
    fn validate(&self) -> ValidationResult<()> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort {
                port: self.port,
                field: "service.port".into(),
            });
        }
        Ok(())
    }
}

impl Validate for OracleConfig {
    fn validate(&self) -> ValidationResult<()> {
        match self.provider.to_lowercase().as_str() {
            "simulated" => {}
            "http" => {
                if self.endpoint.as_deref().map_or(true, str::is_empty) {
                    return Err(ValidationError::MissingField {
                        field: "oracle.endpoint (required for http provider)".into(),
                    });
                }
                if self.api_key.as_deref().map_or(true, str::is_empty) {
                    return Err(ValidationError::MissingField {
                        field: "oracle.api_key (required for http provider)".into(),
                    });
                }
            }
            other => {
                return Err(ValidationError::InvalidValue {
                    field: "oracle.provider".into(),
                    reason: format!("unknown provider '{other}', must be one of: http, simulated"),
                });
            }
        }

        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidValue {
                field: "oracle.timeout_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidValue {
                field: "oracle.temperature".into(),
                reason: "must be between 0.0 and 1.0".into(),
            });
        }

        Ok(())
    }
}

impl Validate for ObservabilityConfig {
    fn validate(&self) -> ValidationResult<()> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_level".into(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            });
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.log_format.to_lowercase().as_str()) {
            return Err(ValidationError::InvalidValue {
                field: "observability.log_format".into(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            });
        }

        Ok(())
    }
}
