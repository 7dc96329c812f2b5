//! Configuration shared by the libraries and the evaluation binary

use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Tracing filter directive (e.g. `info`, `incentives=debug`)
    pub log_filter: String,

    /// Login attempt limiter
    pub login: LoginLimitSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "capinhas-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            log_filter: "info".to_string(),
            login: LoginLimitSettings::default(),
        }
    }
}

/// Login attempt limiter settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginLimitSettings {
    /// Failed attempts allowed before the email is locked out
    pub max_attempts: u32,

    /// Lockout window (seconds), measured from the last failed attempt
    pub lockout_seconds: u64,
}

impl Default for LoginLimitSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            lockout_seconds: 15 * 60,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(filter) = std::env::var("CAPINHAS_LOG") {
            config.log_filter = filter;
        }

        if let Ok(value) = std::env::var("CAPINHAS_LOGIN_MAX_ATTEMPTS") {
            config.login.max_attempts = value.parse().map_err(|e| {
                crate::Error::Config(format!("CAPINHAS_LOGIN_MAX_ATTEMPTS: {}", e))
            })?;
        }

        if let Ok(value) = std::env::var("CAPINHAS_LOGIN_LOCKOUT_SECS") {
            config.login.lockout_seconds = value.parse().map_err(|e| {
                crate::Error::Config(format!("CAPINHAS_LOGIN_LOCKOUT_SECS: {}", e))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would disable the limiter silently
    pub fn validate(&self) -> crate::Result<()> {
        if self.login.max_attempts == 0 {
            return Err(crate::Error::Config(
                "login.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.login.lockout_seconds == 0 {
            return Err(crate::Error::Config(
                "login.lockout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
