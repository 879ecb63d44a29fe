//! Configuration management for the Echo client.

use crate::{ConfigError, ConfigResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default API base URL (can be overridden at compile time via ECHO_API_URL env var).
pub const DEFAULT_API_BASE_URL: &str = match option_env!("ECHO_API_URL") {
    Some(url) => url,
    None => "http://localhost:8000/api",
};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Route the application is sent to when its session is revoked.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Route signed-in users are sent to from guest-only routes.
pub const DEFAULT_HOME_ROUTE: &str = "/";

/// Timeout and retry defaults applied to every API call unless overridden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,
    /// Additional attempts after the first one.
    pub retry_count: u32,
    /// Fixed delay between attempts in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            retry_count: 0,
            retry_delay_ms: 1_000,
        }
    }
}

/// Main client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Base URL every API path is joined to.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Network defaults for the access layer.
    #[serde(default)]
    pub network: NetworkConfig,
    /// Unauthenticated entry point.
    #[serde(default = "default_login_route")]
    pub login_route: String,
    /// Landing route for signed-in users.
    #[serde(default = "default_home_route")]
    pub home_route: String,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_login_route() -> String {
    DEFAULT_LOGIN_ROUTE.to_string()
}

fn default_home_route() -> String {
    DEFAULT_HOME_ROUTE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api_base_url: default_api_base_url(),
            network: NetworkConfig::default(),
            login_route: default_login_route(),
            home_route: default_home_route(),
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults,
    /// then apply environment overrides.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    /// Override configuration from environment variables.
    fn load_from_env(&mut self) {
        if let Ok(log_level) = std::env::var("ECHO_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Ok(api_url) = std::env::var("ECHO_API_URL") {
            let trimmed = api_url.trim();
            if !trimmed.is_empty() {
                self.api_base_url = trimmed.to_string();
            }
        }
    }

    /// Check values that would otherwise only fail at request time.
    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.api_url()?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Config(format!(
                "api_base_url must be http or https, got {}",
                url.scheme()
            )));
        }
        if self.network.timeout_ms == 0 {
            return Err(ConfigError::Config(
                "network.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Level to hand to the logging setup. An explicit command-line value
    /// wins over the configured one.
    pub fn effective_log_level<'a>(&'a self, cli_level: Option<&'a str>) -> &'a str {
        match cli_level.map(str::trim) {
            Some(level) if !level.is_empty() => level,
            _ => &self.log_level,
        }
    }

    /// Get the API base URL as a parsed URL.
    pub fn api_url(&self) -> ConfigResult<Url> {
        Url::parse(&self.api_base_url).map_err(ConfigError::from)
    }
}
