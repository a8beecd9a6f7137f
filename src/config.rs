use crate::error::{JacketAiError, Result};
use jacket_ai_common::{CostPolicy, Language, DEFAULT_HARDWARE_SURCHARGE_RATE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    /// Longest image side sent to the model (px)
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    pub temperature: f32,
    pub language: Language,
    pub hardware_surcharge_rate: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-2.5-flash".into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            max_image_size: 1568,
            timeout_seconds: 120,
            temperature: 0.2,
            language: Language::Uk,
            hardware_surcharge_rate: DEFAULT_HARDWARE_SURCHARGE_RATE,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| JacketAiError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("jacket-ai").join("config.json"))
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.hardware_surcharge_rate) {
            return Err(JacketAiError::Config(format!(
                "hardware_surcharge_rate must be within 0..=1, got {}",
                self.hardware_surcharge_rate
            )));
        }
        if self.model.trim().is_empty() {
            return Err(JacketAiError::Config("model must not be empty".into()));
        }
        Ok(())
    }

    /// API key lookup: GEMINI_API_KEY, then API_KEY, then the config file
    pub fn get_api_key(&self) -> Result<String> {
        let from_env = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|key| !key.trim().is_empty());

        from_env
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
            .ok_or(JacketAiError::MissingApiKey)
    }

    /// Stored key with everything but the first 4 characters hidden
    pub fn masked_api_key(&self) -> Option<String> {
        self.api_key.as_deref().map(|key| {
            let head: String = key.chars().take(4).collect();
            format!("{}…", head)
        })
    }

    pub fn cost_policy(&self) -> CostPolicy {
        CostPolicy {
            hardware_surcharge_rate: self.hardware_surcharge_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.language, Language::Uk);
        assert_eq!(config.hardware_surcharge_rate, 0.15);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = Config::from_json(r#"{"model": "gemini-2.0-flash", "language": "en"}"#).unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.language, Language::En);
        assert_eq!(config.timeout_seconds, 120);
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_invalid_surcharge_rate() {
        let result = Config::from_json(r#"{"hardware_surcharge_rate": 1.5}"#);
        assert!(matches!(result, Err(JacketAiError::Config(_))));
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!(Config::from_json(r#"{"language": "de"}"#).is_err());
    }

    #[test]
    fn test_masked_api_key() {
        let mut config = Config::default();
        assert!(config.masked_api_key().is_none());
        config.api_key = Some("AIzaSyExample".into());
        assert_eq!(config.masked_api_key().unwrap(), "AIza…");
    }

    #[test]
    fn test_cost_policy_from_config() {
        let config = Config::from_json(r#"{"hardware_surcharge_rate": 0.2}"#).unwrap();
        assert_eq!(config.cost_policy().hardware_surcharge_rate, 0.2);
    }
}
