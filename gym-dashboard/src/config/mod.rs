use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const TOKEN_ENV: &str = "GYM_API_TOKEN";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: String,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Config {
    /// Get config directory path (~/.gym-admin/)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".gym-admin"))
    }

    /// Get config file path (~/.gym-admin/config.toml)
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Resolve an explicit path or fall back to the default location
    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    /// Load configuration, using defaults when the file does not exist
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_file = Self::resolve_path(path)?;

        if !config_file.exists() {
            tracing::info!("Config file not found, using defaults");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_file)
            .with_context(|| format!("Failed to read config file {}", config_file.display()))?;

        toml::from_str(&contents).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Bearer token, with `GYM_API_TOKEN` taking precedence over the file
    pub fn token(&self) -> Option<String> {
        self.with_token_override(std::env::var(TOKEN_ENV).ok())
    }

    pub fn with_token_override(&self, env_token: Option<String>) -> Option<String> {
        env_token
            .filter(|token| !token.is_empty())
            .or_else(|| Some(self.auth.token.clone()).filter(|token| !token.is_empty()))
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.auth.token = token.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:3000");
        assert_eq!(config.api.timeout_seconds, 30);
        assert!(config.auth.token.is_empty());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api.timeout_seconds, 30);
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.api.base_url = "https://gym.example.com".to_string();
        config.set_token("abc123");
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.api.base_url, "https://gym.example.com");
        assert_eq!(loaded.auth.token, "abc123");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[api]\nbase_url = \"http://10.0.0.5:3000\"\n").unwrap();

        let config = Config::load_from(Some(&path)).unwrap();
        assert_eq!(config.api.base_url, "http://10.0.0.5:3000");
        assert_eq!(config.api.timeout_seconds, 30);
    }

    #[test]
    fn test_env_token_overrides_file() {
        let mut config = Config::default();
        assert_eq!(config.with_token_override(None), None);

        config.set_token("from-file");
        assert_eq!(config.with_token_override(None).as_deref(), Some("from-file"));
        assert_eq!(
            config.with_token_override(Some("from-env".to_string())).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            config.with_token_override(Some(String::new())).as_deref(),
            Some("from-file")
        );
    }
}
