// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::provider::{self, DEFAULT_MODEL};
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_course() -> String {
    "General".to_string()
}
fn default_gemini_url() -> String {
    GEMINI_BASE_URL.to_string()
}
fn default_openai_url() -> String {
    OPENAI_BASE_URL.to_string()
}
fn default_groq_url() -> String {
    GROQ_BASE_URL.to_string()
}

/// Read-only view of the settings the assistant needs at call time.
pub trait Settings {
    fn selected_model(&self) -> &str;

    /// API key for a provider (by routing key), falling back to the shared key.
    fn api_key_for(&self, provider_key: &str) -> Option<&str>;
}

/// Upstream base URLs. Overridable so tests can point at a local mock server.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Endpoints {
    #[serde(default = "default_gemini_url")]
    pub gemini: String,
    #[serde(default = "default_openai_url")]
    pub openai: String,
    #[serde(default = "default_groq_url")]
    pub groq: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            gemini: default_gemini_url(),
            openai: default_openai_url(),
            groq: default_groq_url(),
        }
    }
}

impl Endpoints {
    /// Every provider served from one base URL (mock servers in tests).
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            gemini: base.clone(),
            openai: base.clone(),
            groq: base,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    #[serde(default = "default_model")]
    pub selected_model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_course")]
    pub default_course: String,
    /// Per-provider keys, by provider routing key ("google", "openai", "groq").
    #[serde(default)]
    pub api_keys: HashMap<String, String>,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            selected_model: default_model(),
            api_key: None,
            api_keys: HashMap::new(),
            temperature: default_temperature(),
            default_course: default_course(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings for Config {
    fn selected_model(&self) -> &str {
        &self.selected_model
    }

    fn api_key_for(&self, provider_key: &str) -> Option<&str> {
        // A blank per-provider entry must not hide the shared key.
        self.api_keys
            .get(provider_key)
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .or_else(|| {
                self.api_key
                    .as_deref()
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
            })
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Loads the config, treating a missing file as defaults. Parse errors still fail.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(c) => Ok(c),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Selects a model, rejecting ids no provider owns.
    pub fn set_model(&mut self, model_id: &str) -> Result<()> {
        if provider::provider_for_model(model_id).is_none() {
            return Err(anyhow::anyhow!("Unknown model '{}'", model_id));
        }
        self.selected_model = model_id.to_string();
        Ok(())
    }

    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }
}
