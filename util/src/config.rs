//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from `.env` and environment variables.
//! Tests override individual fields through the per-field setters.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock};

/// Errors raised while validating configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required; set it in the environment or your .env file")]
    MissingVar(&'static str),
}

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub salesforce_instance_url: String,
    pub access_token: String,
    pub salesforce_api_version: String,
    pub limit_name: String,
    pub poll_interval_minutes: u64,
    pub max_retries: u32,
    pub poll_paused: bool,
    pub upstream_timeout_seconds: u64,
    pub display_timezone: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn flag(key: &str) -> bool {
    matches!(
        env::var(key).unwrap_or_default().to_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Missing optional values fall back to defaults. The upstream credentials
    /// are left empty when absent; [`AppConfig::require_upstream`] reports them.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: var_or("APP_ENV", "development"),
            project_name: var_or("PROJECT_NAME", "limit-watch"),
            log_level: var_or("LOG_LEVEL", "api=info,services=info,db=info"),
            log_file: var_or("LOG_FILE", "api.log"),
            log_to_stdout: flag("LOG_TO_STDOUT"),
            database_path: var_or("DATABASE_PATH", "data/limits.sqlite"),
            host: var_or("HOST", "127.0.0.1"),
            port: parsed_or("PORT", 3000),
            salesforce_instance_url: env::var("SALESFORCE_INSTANCE_URL").unwrap_or_default(),
            access_token: env::var("ACCESS_TOKEN").unwrap_or_default(),
            salesforce_api_version: var_or("SALESFORCE_API_VERSION", "v63.0"),
            limit_name: var_or("LIMIT_NAME", "DailyDurableStreamingApiEvents"),
            poll_interval_minutes: parsed_or("POLL_INTERVAL_MINUTES", 30),
            max_retries: parsed_or("MAX_RETRIES", 2),
            poll_paused: flag("POLL_PAUSED"),
            upstream_timeout_seconds: parsed_or("UPSTREAM_TIMEOUT_SECONDS", 30),
            display_timezone: var_or("DISPLAY_TIMEZONE", "Asia/Bangkok"),
        }
    }

    /// Checks that the upstream base URL and bearer token are present.
    pub fn require_upstream(&self) -> Result<(), ConfigError> {
        if self.salesforce_instance_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("SALESFORCE_INSTANCE_URL"));
        }
        if self.access_token.trim().is_empty() {
            return Err(ConfigError::MissingVar("ACCESS_TOKEN"));
        }
        Ok(())
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock is poisoned.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock
                .write()
                .expect("Failed to acquire AppConfig write lock");
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock
            .write()
            .expect("Failed to acquire AppConfig write lock");
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_salesforce_instance_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.salesforce_instance_url = value.into());
    }

    pub fn set_access_token(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.access_token = value.into());
    }

    pub fn set_limit_name(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.limit_name = value.into());
    }

    pub fn set_max_retries(value: u32) {
        AppConfig::set_field(|cfg| cfg.max_retries = value);
    }

    pub fn set_poll_paused(value: bool) {
        AppConfig::set_field(|cfg| cfg.poll_paused = value);
    }

    pub fn set_display_timezone(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.display_timezone = value.into());
    }
}

// --- Free accessors used by binaries ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn salesforce_instance_url() -> String {
    AppConfig::global().salesforce_instance_url.clone()
}

pub fn access_token() -> String {
    AppConfig::global().access_token.clone()
}

pub fn salesforce_api_version() -> String {
    AppConfig::global().salesforce_api_version.clone()
}

pub fn limit_name() -> String {
    AppConfig::global().limit_name.clone()
}

pub fn poll_interval_minutes() -> u64 {
    AppConfig::global().poll_interval_minutes
}

pub fn max_retries() -> u32 {
    AppConfig::global().max_retries
}

pub fn poll_paused() -> bool {
    AppConfig::global().poll_paused
}

pub fn upstream_timeout_seconds() -> u64 {
    AppConfig::global().upstream_timeout_seconds
}

pub fn display_timezone() -> String {
    AppConfig::global().display_timezone.clone()
}
