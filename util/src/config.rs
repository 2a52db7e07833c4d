//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables. Free accessor
//! functions at the bottom of this module are the preferred way to read single
//! values from handlers and services.

use std::env;
use std::sync::{OnceLock, RwLock};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub storage_root: String,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_duration_minutes: u64,
    pub judge_api_url: String,
    pub judge_api_key: String,
    pub judge_poll_interval_ms: u64,
    pub judge_poll_attempts: u32,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Panics if required variables are missing or improperly formatted.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            env: env::var("APP_ENV").unwrap_or_else(|_| "development".into()),
            project_name: env::var("PROJECT_NAME").unwrap_or_else(|_| "lms-api".into()),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "api=info".into()),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| "api.log".into()),
            log_to_stdout: env::var("LOG_TO_STDOUT").unwrap_or_else(|_| "false".into()) == "true",
            database_path: env::var("DATABASE_PATH").expect("DATABASE_PATH is required"),
            storage_root: env::var("STORAGE_ROOT").unwrap_or_else(|_| "data/storage".into()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".into())
                .parse()
                .expect("PORT must be a number"),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET is required"),
            jwt_duration_minutes: env::var("JWT_DURATION_MINUTES")
                .unwrap_or_else(|_| "60".into())
                .parse()
                .expect("JWT_DURATION_MINUTES must be a number"),
            judge_api_url: env::var("JUDGE_API_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:2358".into()),
            judge_api_key: env::var("JUDGE_API_KEY").unwrap_or_default(),
            judge_poll_interval_ms: env::var("JUDGE_POLL_INTERVAL_MS")
                .unwrap_or_else(|_| "1000".into())
                .parse()
                .expect("JUDGE_POLL_INTERVAL_MS must be a number"),
            judge_poll_attempts: env::var("JUDGE_POLL_ATTEMPTS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("JUDGE_POLL_ATTEMPTS must be a number"),
        }
    }

    /// Returns a shared reference to the global configuration.
    ///
    /// # Panics
    /// Panics if the lock cannot be acquired.
    pub fn global() -> std::sync::RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .expect("Failed to acquire AppConfig read lock")
    }

    /// Reloads the configuration from the environment, discarding overrides.
    ///
    /// Useful in tests that mutate env vars.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().expect("Failed to acquire AppConfig write lock");
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

    // --- Per-field setters, mainly for tests ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_storage_root(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.storage_root = value.into());
    }

    pub fn set_jwt_secret(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.jwt_secret = value.into());
    }

    pub fn set_judge_api_url(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.judge_api_url = value.into());
    }

    pub fn set_judge_poll_interval_ms(value: u64) {
        AppConfig::set_field(|cfg| cfg.judge_poll_interval_ms = value);
    }

    pub fn set_judge_poll_attempts(value: u32) {
        AppConfig::set_field(|cfg| cfg.judge_poll_attempts = value);
    }
}

// --- Free accessor functions ---

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn in_development() -> bool {
    AppConfig::global().env.to_lowercase() != "production"
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

pub fn storage_root() -> String {
    AppConfig::global().storage_root.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn jwt_secret() -> String {
    AppConfig::global().jwt_secret.clone()
}

pub fn jwt_duration_minutes() -> u64 {
    AppConfig::global().jwt_duration_minutes
}

pub fn judge_api_url() -> String {
    AppConfig::global().judge_api_url.clone()
}

pub fn judge_api_key() -> String {
    AppConfig::global().judge_api_key.clone()
}

pub fn judge_poll_interval_ms() -> u64 {
    AppConfig::global().judge_poll_interval_ms
}

pub fn judge_poll_attempts() -> u32 {
    AppConfig::global().judge_poll_attempts
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn overrides_apply_and_reset_restores_env() {
        unsafe {
            std::env::set_var("DATABASE_PATH", "data/test.db");
            std::env::set_var("JWT_SECRET", "test-secret");
            std::env::remove_var("JUDGE_POLL_ATTEMPTS");
        }

        AppConfig::set_judge_poll_attempts(3);
        assert_eq!(judge_poll_attempts(), 3);

        AppConfig::reset();
        assert_eq!(judge_poll_attempts(), 30);
    }
}
