use config::{Config, File};
use serde::Deserialize;
use std::time::Duration;

use crate::error::HoneypotError;

/// API key the bundled dashboard ships with; real deployments override it.
pub const DEFAULT_API_KEY: &str = "test-api-key-12345";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HoneypotConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            request_timeout_seconds: 30,
        }
    }
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TelemetryConfig {
    pub enabled: bool,
    pub poll_interval_seconds: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_seconds: 10,
        }
    }
}

impl TelemetryConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HoneypotConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &str) -> Result<Self, HoneypotError> {
        let s = Config::builder()
            .add_source(File::with_name(path).required(false))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn validate(&self) -> Result<(), HoneypotError> {
        if self.service.base_url.trim().is_empty() {
            return Err(HoneypotError::InvalidConfig(
                "service.base_url must not be empty".to_string(),
            ));
        }
        if self.service.api_key.is_empty() {
            return Err(HoneypotError::InvalidConfig(
                "service.api_key must not be empty".to_string(),
            ));
        }
        if self.telemetry.poll_interval_seconds == 0 {
            return Err(HoneypotError::InvalidConfig(
                "telemetry.poll_interval_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
