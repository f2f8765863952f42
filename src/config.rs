// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEV_JWT_SECRET: &str = "jobboard-local-development-secret";

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_port() -> u16 {
    8000
}

fn default_token_ttl_days() -> i64 {
    7
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub database_path: PathBuf,
    pub port: u16,
    pub token_ttl_days: i64,
    pub jwt_secret: String,
}

impl AppConfig {
    /// Load `config.yaml` from the current directory for the active environment.
    pub fn load() -> Result<Self> {
        let environment = Self::get_environment();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from("config.yaml");
        if !config_path.exists() {
            anyhow::bail!("config.yaml not found in current directory. Server cannot start without configuration.");
        }

        let content = std::fs::read_to_string(&config_path).context("Failed to read config.yaml")?;
        Self::from_yaml(&content, &environment)
    }

    fn get_environment() -> String {
        std::env::var("JOBBOARD_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn from_yaml(content: &str, environment: &str) -> Result<Self> {
        let config_file: ConfigFile =
            serde_yaml::from_str(content).context("Failed to parse config.yaml")?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        let port = match std::env::var("ROCKET_PORT") {
            Ok(value) => value
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
            Err(_) => env_config.port,
        };

        if env_config.token_ttl_days <= 0 {
            anyhow::bail!("token_ttl_days must be positive, got {}", env_config.token_ttl_days);
        }

        Ok(Self {
            environment: environment.to_string(),
            database_path: resolve_path(&env_config.database_path)?,
            port,
            token_ttl_days: env_config.token_ttl_days,
            jwt_secret: Self::jwt_secret(environment)?,
        })
    }

    fn jwt_secret(environment: &str) -> Result<String> {
        match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => Ok(secret),
            _ if environment == "production" => {
                anyhow::bail!("JWT_SECRET environment variable not set")
            }
            _ => {
                warn!("JWT_SECRET not set, using the local development secret");
                Ok(DEV_JWT_SECRET.to_string())
            }
        }
    }
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(current_dir.join(path))
    }
}
