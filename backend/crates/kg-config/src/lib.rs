mod auth_config;
mod config;
mod database_config;
mod error;
mod log_level;
mod logging_config;
mod retry_config;
mod server_config;
mod session_config;

#[cfg(test)]
mod tests;

pub use auth_config::{AuthConfig, MIN_SECRET_LENGTH};
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use retry_config::RetryConfig;
pub use server_config::ServerConfig;
pub use session_config::SessionConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;
const DEFAULT_DATABASE_FILENAME: &str = "identities.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const DEFAULT_ACCESS_TOKEN_TTL: &str = "1d";
const DEFAULT_REFRESH_TOKEN_TTL: &str = "30d";
const CONFIG_DIR_ENV: &str = "KG_CONFIG_DIR";
const DEFAULT_CONFIG_DIR_NAME: &str = ".kg";
