use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::enrichment::EnrichmentConfig;
use crate::food::config::FoodConfig;

pub const DEFAULT_DATABASE_PATH: &str = "data/recipe_enricher.db";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(String),
    #[error("Invalid value for {var}: {value}")]
    Invalid { var: String, value: String },
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub text_model: String,
    pub image_model: String,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();

        let api_key = env::var(format!("{}_API_KEY", prefix))
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|k| !k.trim().is_empty());

        let api_url = env::var(format!("{}_API_URL", prefix))
            .unwrap_or_else(|_| match provider {
                "gemini" => "https://generativelanguage.googleapis.com/v1beta".to_string(),
                _ => String::new(),
            });

        let text_model = env::var(format!("{}_MODEL", prefix))
            .unwrap_or_else(|_| "gemini-3-flash-preview".to_string());

        let image_model = env::var(format!("{}_IMAGE_MODEL", prefix))
            .unwrap_or_else(|_| "gemini-2.5-flash-image".to_string());

        let temperature = env::var(format!("{}_TEMPERATURE", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.4);

        Self {
            api_key,
            api_url,
            text_model,
            image_model,
            temperature,
        }
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ConfigError::Missing("GEMINI_API_KEY".to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub provider: ProviderConfig,
    pub recipes_path: Option<PathBuf>,
    pub database_path: PathBuf,
    pub enrichment: EnrichmentConfig,
    pub food: FoodConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = EnrichmentConfig::default();

        let enrichment = EnrichmentConfig {
            nutrition_delay_min: millis_from_env("NUTRITION_DELAY_MIN_MS", defaults.nutrition_delay_min)?,
            nutrition_delay_max: millis_from_env("NUTRITION_DELAY_MAX_MS", defaults.nutrition_delay_max)?,
            image_delay: millis_from_env("IMAGE_DELAY_MS", defaults.image_delay)?,
        };
        if enrichment.nutrition_delay_min > enrichment.nutrition_delay_max {
            return Err(ConfigError::Invalid {
                var: "NUTRITION_DELAY_MIN_MS".to_string(),
                value: format!("{} > NUTRITION_DELAY_MAX_MS", enrichment.nutrition_delay_min.as_millis()),
            });
        }

        Ok(Self {
            provider: ProviderConfig::from_env("gemini"),
            recipes_path: env::var("RECIPES_PATH").ok().map(PathBuf::from),
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH)),
            enrichment,
            food: FoodConfig::from_env()?,
        })
    }
}

fn millis_from_env(var: &str, default: Duration) -> Result<Duration, ConfigError> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::Invalid {
                var: var.to_string(),
                value: raw,
            }),
        Err(_) => Ok(default),
    }
}
