use crate::{
    AuthConfig, CONFIG_DIR_ENV, ConfigError, ConfigErrorResult, DEFAULT_CONFIG_DIR_NAME,
    DatabaseConfig, LoggingConfig, RetryConfig, ServerConfig, SessionConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub session: SessionConfig,
    pub retry: RetryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for KG_CONFIG_DIR env var, else use ./.kg/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply KG_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Filesystem {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Filesystem {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: KG_CONFIG_DIR env var > ./.kg/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|e| ConfigError::Filesystem {
                path: PathBuf::from("."),
                source: e,
            })?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR_NAME))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.session.validate()?;
        self.retry.validate()?;

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!("  server: {}:{}", self.server.host, self.server.port);
        info!("  database: {}", self.database.path);
        info!(
            "  auth: access_ttl={}, refresh_ttl={}, federation={}",
            self.auth.access_token_ttl,
            self.auth.refresh_token_ttl,
            if self.auth.federation_secret.is_some() {
                "enabled"
            } else {
                "disabled"
            }
        );
        info!(
            "  session: max_active_sessions={}",
            self.session.max_active_sessions
        );
        info!(
            "  retry: attempts={}, initial={}ms, jitter={}",
            self.retry.max_attempts, self.retry.initial_delay_ms, self.retry.jitter
        );
        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("KG_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("KG_SERVER_PORT", &mut self.server.port);

        // Database
        Self::apply_env_string("KG_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_option_string(
            "KG_AUTH_ACCESS_TOKEN_SECRET",
            &mut self.auth.access_token_secret,
        );
        Self::apply_env_option_string(
            "KG_AUTH_REFRESH_TOKEN_SECRET",
            &mut self.auth.refresh_token_secret,
        );
        Self::apply_env_string("KG_AUTH_ACCESS_TOKEN_TTL", &mut self.auth.access_token_ttl);
        Self::apply_env_string("KG_AUTH_REFRESH_TOKEN_TTL", &mut self.auth.refresh_token_ttl);
        Self::apply_env_option_string(
            "KG_AUTH_FEDERATION_SECRET",
            &mut self.auth.federation_secret,
        );

        // Session
        Self::apply_env_parse(
            "KG_SESSION_MAX_ACTIVE_SESSIONS",
            &mut self.session.max_active_sessions,
        );

        // Retry
        Self::apply_env_parse("KG_RETRY_MAX_ATTEMPTS", &mut self.retry.max_attempts);
        Self::apply_env_parse(
            "KG_RETRY_INITIAL_DELAY_MS",
            &mut self.retry.initial_delay_ms,
        );
        Self::apply_env_bool("KG_RETRY_JITTER", &mut self.retry.jitter);

        // Logging
        Self::apply_env_parse("KG_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("KG_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("KG_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
