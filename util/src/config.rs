//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables (and a `.env`
//! file when present). It only drives the executable's ambient concerns such as
//! logging and default export locations; the parser itself receives its
//! configuration explicitly.

use std::env;
use std::path::PathBuf;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Represents the complete application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub project_name: String,
    /// `EnvFilter` directive string, e.g. `diffview=info,diff_parser=debug`.
    pub log_level: String,
    pub log_file: String,
    pub log_dir: String,
    pub log_to_stdout: bool,
    /// Optional path to a JSON parser configuration.
    pub diff_config: Option<String>,
    pub export_dir: String,
}

/// Lazily-initialized, thread-safe singleton instance of `AppConfig`.
static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            project_name: env_or("PROJECT_NAME", "diffview"),
            log_level: env_or("LOG_LEVEL", "diffview=info,diff_parser=info"),
            log_file: env_or("LOG_FILE", "diffview.log"),
            log_dir: env_or("LOG_DIR", "logs"),
            log_to_stdout: env_or("LOG_TO_STDOUT", "false").eq_ignore_ascii_case("true"),
            diff_config: env::var("DIFF_CONFIG").ok().filter(|v| !v.trim().is_empty()),
            export_dir: env_or("EXPORT_DIR", "exports"),
        }
    }

    /// Returns a shared reference to the global configuration.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        CONFIG_INSTANCE
            .get_or_init(|| RwLock::new(AppConfig::from_env()))
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Resets the configuration by reloading from environment variables.
    ///
    /// Useful in tests to clear overrides.
    pub fn reset() {
        if let Some(lock) = CONFIG_INSTANCE.get() {
            let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            *guard = AppConfig::from_env();
        }
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let lock = CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()));
        let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        setter(&mut guard);
    }

    pub fn set_log_level(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.log_level = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_diff_config(value: Option<String>) {
        AppConfig::set_field(|cfg| cfg.diff_config = value);
    }

    pub fn set_export_dir(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.export_dir = value.into());
    }
}

// --- Free-standing getters ---

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_dir() -> String {
    AppConfig::global().log_dir.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn diff_config_path() -> Option<PathBuf> {
    AppConfig::global().diff_config.as_ref().map(PathBuf::from)
}

pub fn export_dir() -> PathBuf {
    PathBuf::from(&AppConfig::global().export_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for key in [
            "PROJECT_NAME",
            "LOG_LEVEL",
            "LOG_FILE",
            "LOG_DIR",
            "LOG_TO_STDOUT",
            "DIFF_CONFIG",
            "EXPORT_DIR",
        ] {
            unsafe {
                env::remove_var(key);
            }
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let cfg = AppConfig::from_env();
        assert_eq!(cfg.project_name, "diffview");
        assert!(!cfg.log_to_stdout);
        assert_eq!(cfg.diff_config, None);
        assert_eq!(cfg.export_dir, "exports");
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("LOG_TO_STDOUT", "TRUE");
            env::set_var("DIFF_CONFIG", "conf/diff.json");
            env::set_var("EXPORT_DIR", "/tmp/out");
        }
        let cfg = AppConfig::from_env();
        assert!(cfg.log_to_stdout);
        assert_eq!(cfg.diff_config.as_deref(), Some("conf/diff.json"));
        assert_eq!(cfg.export_dir, "/tmp/out");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_blank_diff_config_is_none() {
        clear_env();
        unsafe {
            env::set_var("DIFF_CONFIG", "   ");
        }
        assert_eq!(AppConfig::from_env().diff_config, None);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_setters_and_reset() {
        clear_env();
        AppConfig::reset();
        AppConfig::set_export_dir("custom");
        AppConfig::set_diff_config(Some("x.json".to_string()));
        assert_eq!(export_dir(), PathBuf::from("custom"));
        assert_eq!(diff_config_path(), Some(PathBuf::from("x.json")));
        AppConfig::reset();
        assert_eq!(export_dir(), PathBuf::from("exports"));
        assert_eq!(diff_config_path(), None);
    }
}
