//! Configuration management for VeriCore services.
//!
//! All VeriCore services share a unified configuration file at
//! `~/.vericore/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Explicit config file values
//! 2. Environment variables (VERI_* prefix)
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `VERI_API_PORT` → service.port
//! - `VERI_BIND_ADDRESS` → service.host
//! - `VERI_LOG_LEVEL` → observability.log_level
//! - `VERI_ORACLE_PROVIDER` → oracle.provider
//! - `VERI_ORACLE_ENDPOINT` → oracle.endpoint
//! - `VERI_ORACLE_API_KEY` (or `GEMINI_API_KEY`) → oracle.api_key
//! - `VERI_ORACLE_MODEL` → oracle.model

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".vericore"),
        |dirs| dirs.home_dir().join(".vericore"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Service Configuration
// ============================================================================

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bind address for the API service.
    /// Default: "127.0.0.1" (conservative, local only)
    #[serde(default = "default_bind_address")]
    pub host: String,

    /// Port number for the API service
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins for the dashboard frontend.
    /// Empty list means any origin is accepted.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: default_bind_address(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".into(),
        "http://localhost:5173".into(),
        "http://127.0.0.1:5173".into(),
    ]
}

// ============================================================================
// Oracle Configuration
// ============================================================================

/// Consensus oracle configuration.
///
/// The oracle is the external reasoning service that reviews submitted text.
/// `provider = "http"` requires an endpoint and API key; `provider =
/// "simulated"` runs the deterministic local judgment generator and needs no
/// credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Provider kind: "http" or "simulated"
    #[serde(default = "default_oracle_provider")]
    pub provider: String,

    /// Oracle HTTP endpoint (required for the "http" provider)
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key (required for the "http" provider)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model identifier sent with each request
    #[serde(default = "default_oracle_model")]
    pub model: String,

    /// Hard request timeout in seconds. The oracle call degrades to a
    /// failure after this bound instead of hanging the caller.
    #[serde(default = "default_oracle_timeout_secs")]
    pub timeout_secs: u64,

    /// Sampling temperature (0.0 - 1.0)
    #[serde(default = "default_oracle_temperature")]
    pub temperature: f64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: default_oracle_provider(),
            endpoint: None,
            api_key: None,
            model: default_oracle_model(),
            timeout_secs: default_oracle_timeout_secs(),
            temperature: default_oracle_temperature(),
        }
    }
}

fn default_oracle_provider() -> String {
    "simulated".into()
}

fn default_oracle_model() -> String {
    "gemini-2.0-flash".into()
}

fn default_oracle_timeout_secs() -> u64 {
    30
}

fn default_oracle_temperature() -> f64 {
    0.3
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Unified configuration for VeriCore services.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP service settings
    #[serde(default)]
    pub service: ServiceConfig,

    /// Consensus oracle settings
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Logging settings
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when no file exists.
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration and apply environment overrides.
    pub fn load_with_env() -> Result<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("VERI_API_PORT") {
            if let Ok(port) = port.parse() {
                self.service.port = port;
            }
        }
        if let Ok(bind) = std::env::var("VERI_BIND_ADDRESS") {
            self.service.host = bind;
        }
        if let Ok(level) = std::env::var("VERI_LOG_LEVEL") {
            self.observability.log_level = level;
        }
        if let Ok(provider) = std::env::var("VERI_ORACLE_PROVIDER") {
            self.oracle.provider = provider;
        }
        if let Ok(endpoint) = std::env::var("VERI_ORACLE_ENDPOINT") {
            self.oracle.endpoint = Some(endpoint);
        }
        if let Ok(key) =
            std::env::var("VERI_ORACLE_API_KEY").or_else(|_| std::env::var("GEMINI_API_KEY"))
        {
            self.oracle.api_key = Some(key);
        }
        if let Ok(model) = std::env::var("VERI_ORACLE_MODEL") {
            self.oracle.model = model;
        }
    }
}
