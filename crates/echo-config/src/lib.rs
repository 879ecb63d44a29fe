//! Configuration, paths, and logging setup for the Echo client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, NetworkConfig, DEFAULT_API_BASE_URL, DEFAULT_HOME_ROUTE, DEFAULT_LOGIN_ROUTE,
    DEFAULT_LOG_LEVEL,
};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_logging, init_logging_with_format, parse_level, LogFormat};
pub use paths::Paths;
