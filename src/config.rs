use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{LecternError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 30;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub endpoint: String,
    pub page_size: u32,
    pub page_param: String,
    pub size_param: String,
    pub token_env: Option<String>,
    pub token_command: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoint: "/api/lectures".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            page_param: "page".to_string(),
            size_param: "size".to_string(),
            token_env: Some("LECTERN_TOKEN".to_string()),
            token_command: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub home_url: String,
    pub lecture_url: String,
    pub min_card_width: u16,
    pub card_height: u16,
    pub sentinel_height: u16,
    pub sentinel_threshold: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Open Lectures".to_string(),
            home_url: "http://localhost:8080/".to_string(),
            lecture_url: "http://localhost:8080/lectures/{id}".to_string(),
            min_card_width: 32,
            card_height: 6,
            sentinel_height: 1,
            sentinel_threshold: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

fn config_path() -> Option<PathBuf> {
    let config_dir = dirs::config_dir()?;
    Some(config_dir.join("lectern").join("config.toml"))
}

impl Config {
    /// Load from the user config dir, falling back to defaults when the file
    /// is missing or does not parse.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Config::default();
        };

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                if path.exists() {
                    tracing::warn!("ignoring {}: {}", path.display(), e);
                }
                Config::default()
            }
        }
    }

    /// Load an explicitly requested file. Errors are returned, not swallowed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| LecternError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.page_size == 0 {
            return Err(LecternError::Config("api.page_size must be at least 1".into()));
        }
        if self.ui.card_height < 3 {
            return Err(LecternError::Config("ui.card_height must be at least 3".into()));
        }
        if self.ui.min_card_width < 8 {
            return Err(LecternError::Config("ui.min_card_width must be at least 8".into()));
        }
        if self.ui.sentinel_height == 0 {
            return Err(LecternError::Config("ui.sentinel_height must be at least 1".into()));
        }
        if !(self.ui.sentinel_threshold > 0.0 && self.ui.sentinel_threshold <= 1.0) {
            return Err(LecternError::Config(
                "ui.sentinel_threshold must be in (0, 1]".into(),
            ));
        }
        Ok(())
    }
}
