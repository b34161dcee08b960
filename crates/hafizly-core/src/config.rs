//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/hafizly/config.toml)
//! 3. Environment variables (HAFIZLY_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix
const ENV_PREFIX: &str = "HAFIZLY";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory for local state (passcode file, TUI log)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Base URL of the hosted table service
    #[serde(default)]
    pub table_url: Option<String>,

    /// Backend API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Collection name on the table service
    #[serde(default = "default_table")]
    pub table: String,

    /// TUI log file path (defaults to {data_dir}/debug.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            table_url: None,
            api_key: None,
            table: default_table(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (HAFIZLY_TABLE_URL, HAFIZLY_API_KEY, ...)
    /// 2. Config file (~/.config/hafizly/config.toml or HAFIZLY_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // HAFIZLY_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // HAFIZLY_TABLE_URL
        if let Ok(val) = std::env::var(format!("{}_TABLE_URL", ENV_PREFIX)) {
            self.table_url = if val.is_empty() { None } else { Some(val) };
        }

        // HAFIZLY_API_KEY
        if let Ok(val) = std::env::var(format!("{}_API_KEY", ENV_PREFIX)) {
            self.api_key = if val.is_empty() { None } else { Some(val) };
        }

        // HAFIZLY_TABLE
        if let Ok(val) = std::env::var(format!("{}_TABLE", ENV_PREFIX)) {
            if !val.is_empty() {
                self.table = val;
            }
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file location
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific path
    pub fn save_to_path(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with HAFIZLY_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hafizly")
            .join("config.toml")
    }

    /// Get the path of the private-links passcode file
    pub fn passcode_path(&self) -> PathBuf {
        self.data_dir.join("passcode")
    }
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hafizly")
}

/// Default collection name
fn default_table() -> String {
    "link-hub".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap();
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            // Clear all the vars
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "HAFIZLY_DATA_DIR",
        "HAFIZLY_TABLE_URL",
        "HAFIZLY_API_KEY",
        "HAFIZLY_TABLE",
    ];

    #[test]
    fn test_default_config() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config::default();
        assert!(config.table_url.is_none());
        assert!(config.api_key.is_none());
        assert_eq!(config.table, "link-hub");
        assert!(config.data_dir.ends_with("hafizly"));
    }

    #[test]
    fn test_passcode_path() {
        let config = Config::default();
        assert!(config.passcode_path().ends_with("passcode"));
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();

        env::set_var("HAFIZLY_DATA_DIR", "/tmp/hafizly-test");
        config.apply_env_overrides();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/hafizly-test"));
    }

    #[test]
    fn test_env_override_table_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        assert!(config.table_url.is_none());

        env::set_var("HAFIZLY_TABLE_URL", "https://project.supabase.co");
        config.apply_env_overrides();
        assert_eq!(
            config.table_url,
            Some("https://project.supabase.co".to_string())
        );

        // Empty string clears it
        env::set_var("HAFIZLY_TABLE_URL", "");
        config.apply_env_overrides();
        assert!(config.table_url.is_none());
    }

    #[test]
    fn test_env_override_table_name() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("HAFIZLY_TABLE", "link-hub-staging");
        config.apply_env_overrides();
        assert_eq!(config.table, "link-hub-staging");

        // Empty string keeps the current name
        env::set_var("HAFIZLY_TABLE", "");
        config.apply_env_overrides();
        assert_eq!(config.table, "link-hub-staging");
    }

    #[test]
    fn test_serialization() {
        let _guard = EnvGuard::new(ENV_VARS);

        let config = Config {
            data_dir: PathBuf::from("/data/hafizly"),
            table_url: Some("https://project.supabase.co".to_string()),
            api_key: Some("anon-key".to_string()),
            table: "link-hub".to_string(),
            log_file: None,
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("data_dir"));
        assert!(toml_str.contains("table_url"));
        assert!(toml_str.contains("api_key"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data_dir, config.data_dir);
        assert_eq!(parsed.table_url, config.table_url);
        assert_eq!(parsed.api_key, config.api_key);
        assert_eq!(parsed.table, config.table);
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            data_dir = "/custom/data"
            table_url = "https://project.supabase.co"
            api_key = "anon-key"
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(
            config.table_url,
            Some("https://project.supabase.co".to_string())
        );
        // Omitted fields fall back to defaults
        assert_eq!(config.table, "link-hub");
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("HAFIZLY_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        // Should return defaults when file doesn't exist
        assert!(config.table_url.is_none());
        assert_eq!(config.table, "link-hub");
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);

        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config {
            data_dir: temp_dir.path().join("data"),
            table_url: Some("https://project.supabase.co".to_string()),
            api_key: None,
            table: "link-hub".to_string(),
            log_file: None,
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_from_path(&path).unwrap();
        assert_eq!(loaded.table_url, config.table_url);
        assert_eq!(loaded.data_dir, config.data_dir);
    }
}
