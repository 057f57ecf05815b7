//! Configuration loading and validation for rummage.
//!
//! Loads configuration from `~/.rummage/config.toml` with environment
//! variable overrides. All values are fixed constants for the lifetime of
//! the process; nothing is reloadable mid-session.

use rummage_core::error::Error;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The root configuration structure.
///
/// Maps directly to `~/.rummage/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the model service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model identifier (a fast tier model by default)
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per model response (provider default when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Hard ceiling on tool-requesting model calls per turn
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// The model's knowledge cutoff year, referenced by the system prompt
    #[serde(default = "default_knowledge_cutoff")]
    pub knowledge_cutoff: String,

    /// Override for the model service base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Encyclopedia lookup settings
    #[serde(default)]
    pub wikipedia: WikipediaConfig,

    /// Web search settings
    #[serde(default)]
    pub web_search: WebSearchConfig,
}

fn default_model() -> String {
    "gemini-1.5-flash".into()
}
fn default_temperature() -> f32 {
    0.1
}
fn default_max_steps() -> u32 {
    10
}
fn default_knowledge_cutoff() -> String {
    "2024".into()
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_steps", &self.max_steps)
            .field("knowledge_cutoff", &self.knowledge_cutoff)
            .field("api_url", &self.api_url)
            .field("wikipedia", &self.wikipedia)
            .field("web_search", &self.web_search)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikipediaConfig {
    /// Maximum number of articles per lookup
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Maximum characters kept per article
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

fn default_top_k() -> usize {
    3
}
fn default_max_chars() -> usize {
    1000
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            max_chars: default_max_chars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSearchConfig {
    /// Maximum number of result snippets per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    5
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            max_steps: default_max_steps(),
            knowledge_cutoff: default_knowledge_cutoff(),
            api_url: None,
            wikipedia: WikipediaConfig::default(),
            web_search: WebSearchConfig::default(),
        }
    }
}

impl AppConfig {
    /// The config directory: `~/.rummage`.
    pub fn config_dir() -> PathBuf {
        home_dir().join(".rummage")
    }

    /// Load from the default config file, then apply env overrides.
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::config_dir().join("config.toml"))
    }

    /// Load from a specific path (missing file means defaults), then apply
    /// env overrides and validate.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let mut config = if path.is_file() {
            let raw = std::fs::read_to_string(path).map_err(|e| Error::Config {
                message: format!("Failed to read {}: {e}", path.display()),
            })?;
            toml::from_str(&raw).map_err(|e| Error::Config {
                message: format!("Failed to parse {}: {e}", path.display()),
            })?
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Environment variables take precedence over the config file.
    fn apply_env_overrides(&mut self) {
        for var in ["GEMINI_API_KEY", "GOOGLE_API_KEY", "RUMMAGE_API_KEY"] {
            if let Ok(key) = std::env::var(var) {
                if !key.trim().is_empty() {
                    self.api_key = Some(key);
                    break;
                }
            }
        }
        if let Ok(model) = std::env::var("RUMMAGE_MODEL") {
            if !model.trim().is_empty() {
                self.model = model;
            }
        }
    }

    /// Reject settings the agent cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(Error::Config {
                message: format!("temperature must be in 0.0..=2.0, got {}", self.temperature),
            });
        }
        if self.max_steps == 0 {
            return Err(Error::Config {
                message: "max_steps must be at least 1".into(),
            });
        }
        if self.wikipedia.top_k == 0 {
            return Err(Error::Config {
                message: "wikipedia.top_k must be at least 1".into(),
            });
        }
        if self.wikipedia.max_chars == 0 {
            return Err(Error::Config {
                message: "wikipedia.max_chars must be at least 1".into(),
            });
        }
        if self.web_search.max_results == 0 {
            return Err(Error::Config {
                message: "web_search.max_results must be at least 1".into(),
            });
        }
        Ok(())
    }
}

fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_sane() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.max_steps, 10);
        assert_eq!(config.wikipedia.top_k, 3);
        assert_eq!(config.wikipedia.max_chars, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
model = "gemini-1.5-pro"
temperature = 0.3
max_steps = 5

[wikipedia]
top_k = 2
max_chars = 500
"#
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.wikipedia.top_k, 2);
        assert_eq!(config.wikipedia.max_chars, 500);
        // Unset section keeps its defaults.
        assert_eq!(config.web_search.max_results, 5);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.max_steps, 10);
    }

    #[test]
    fn rejects_zero_max_steps() {
        let config = AppConfig {
            max_steps: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_temperature() {
        let config = AppConfig {
            temperature: 3.5,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("sk-very-secret".into()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
