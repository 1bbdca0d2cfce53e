use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::model::Language;
use crate::store::json_store::default_data_dir;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_language")]
    pub default_language: String,
    #[serde(default = "default_logic_gate_enabled")]
    pub logic_gate_enabled: bool,
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
}

fn default_api_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_request_timeout_secs() -> u64 {
    120
}
fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_language() -> String {
    Language::Python3.key().to_string()
}
fn default_logic_gate_enabled() -> bool {
    true
}
fn default_cache_file() -> String {
    default_data_dir()
        .join("topic_cache.json")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            theme: default_theme(),
            default_language: default_language(),
            logic_gate_enabled: default_logic_gate_enabled(),
            cache_file: default_cache_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preptime")
            .join("config.toml")
    }

    /// Fix up values that deserialized but are unusable.
    pub fn normalize(&mut self) {
        let trimmed = self.api_base_url.trim().trim_end_matches('/');
        self.api_base_url = if trimmed.is_empty() {
            default_api_base_url()
        } else {
            trimmed.to_string()
        };
        if Language::from_key(&self.default_language).is_none() {
            self.default_language = default_language();
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
    }

    pub fn language(&self) -> Language {
        Language::from_key(&self.default_language).unwrap_or(Language::Python3)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn cache_path(&self) -> PathBuf {
        PathBuf::from(&self.cache_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout_secs, 120);
        assert!(config.logic_gate_enabled);
        assert!(config.cache_file.ends_with("topic_cache.json"));
    }

    #[test]
    fn test_config_partial_file() {
        let toml_str = r#"
api_base_url = "https://trainer.example.hf.space/"
default_language = "cpp"
logic_gate_enabled = false
"#;
        let mut config: Config = toml::from_str(toml_str).unwrap();
        config.normalize();
        assert_eq!(config.api_base_url, "https://trainer.example.hf.space");
        assert_eq!(config.language(), Language::Cpp);
        assert!(!config.logic_gate_enabled);
        assert_eq!(config.theme, "catppuccin-mocha");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.api_base_url, deserialized.api_base_url);
        assert_eq!(config.cache_file, deserialized.cache_file);
        assert_eq!(config.default_language, deserialized.default_language);
    }

    #[test]
    fn test_normalize_unknown_language_resets() {
        let mut config = Config::default();
        config.default_language = "haskell".to_string();
        config.normalize();
        assert_eq!(config.language(), Language::Python3);
    }

    #[test]
    fn test_normalize_empty_base_url_and_zero_timeout() {
        let mut config = Config::default();
        config.api_base_url = "  ".to_string();
        config.request_timeout_secs = 0;
        config.normalize();
        assert_eq!(config.api_base_url, "http://localhost:8000");
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
    }
}
