use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub log_level: String,
    pub jwt_secret: String,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid port number")?;
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let jwt_secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string());
        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let config = AppConfig {
            host,
            port,
            environment,
            log_level,
            jwt_secret,
            seed_demo_data,
        };

        if config.is_production() && config.jwt_secret.starts_with("your-secret-key") {
            anyhow::bail!("JWT_SECRET must be set in production");
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_address_and_environment() {
        let config = AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "development".to_string(),
            log_level: "debug".to_string(),
            jwt_secret: "secret".to_string(),
            seed_demo_data: false,
        };

        assert_eq!(config.server_address(), "127.0.0.1:8080");
        assert!(config.is_development());
        assert!(!config.is_production());
    }
}
