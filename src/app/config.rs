use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_CHAT_PATH, DEFAULT_IMAGE_FIELD, DEFAULT_IMAGE_PATH, DEFAULT_SERVICE_URL,
};
use crate::utils::SkinChatError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Prediction service configuration
    #[serde(default)]
    pub service: ServiceConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,
}

/// Where and how to reach the prediction service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Base URL of the service
    pub base_url: String,
    /// Path of the symptom chat endpoint
    pub chat_path: String,
    /// Path of the image prediction endpoint
    pub image_path: String,
    /// Multipart field name carrying the image
    pub image_field: String,
    /// Bounded wait per request; unset means wait indefinitely
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_string(),
            chat_path: DEFAULT_CHAT_PATH.to_string(),
            image_path: DEFAULT_IMAGE_PATH.to_string(),
            image_field: DEFAULT_IMAGE_FIELD.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UIConfig {
    /// Show the verdict panel next to the transcript
    pub show_verdicts: bool,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            show_verdicts: true,
        }
    }
}

impl Config {
    /// Reject settings that can't produce a working client
    pub fn validate(&self) -> Result<(), SkinChatError> {
        let url = &self.service.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(SkinChatError::ConfigError(format!(
                "service.base_url must start with http:// or https://, got '{}'",
                url
            )));
        }
        if self.service.image_field.trim().is_empty() {
            return Err(SkinChatError::ConfigError(
                "service.image_field must not be empty".to_string(),
            ));
        }
        if self.service.request_timeout_secs == Some(0) {
            return Err(SkinChatError::ConfigError(
                "service.request_timeout_secs must be positive when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".skinchat/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    extract(figment)
}

/// Load configuration from one explicit file, still honouring the environment
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));
    extract(figment)
}

fn extract(figment: Figment) -> Result<Config> {
    // SKINCHAT_SERVICE__BASE_URL -> service.base_url
    let config: Config = figment
        .merge(Env::prefixed("SKINCHAT_").split("__"))
        .extract()
        .context("Failed to load configuration")?;
    config.validate()?;
    Ok(config)
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "skinchat") {
        Ok(proj_dirs.config_dir().to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        Ok(PathBuf::from(home).join(".config").join("skinchat"))
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(p) => p,
        None => get_config_dir()?.join("config.toml"),
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}
