use serde::{Deserialize, Serialize};
use sponsorscout_api::RetryConfig;
use std::path::{Path, PathBuf};

use crate::fuzzy::FuzzyOptions;

/// Main configuration structure
///
/// This gets loaded from the config file and then overridden by env vars
/// and CLI args. Priority: CLI > Env > File > Defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub github: GitHubConfig,
    pub feed: FeedConfig,
    pub search: FuzzyOptions,
    pub ui: UiConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Load config from default location, falling back to defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from an explicit path, defaults if the file doesn't exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|e| crate::Error::ConfigError(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Get the config file path
    /// Uses XDG on Linux, Application Support on macOS, AppData on Windows
    pub fn config_path() -> crate::Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| crate::Error::ConfigError("Could not find config directory".into()))?
            .join("sponsorscout")
            .join("config.toml"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitHubConfig {
    /// GitHub personal access token, only needed to dodge rate limits
    pub token: Option<String>,

    /// API URL (for GitHub Enterprise)
    #[serde(default = "default_github_url")]
    pub api_url: String,
}

fn default_github_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: default_github_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeedConfig {
    /// URL or path of the sponsorship CSV
    pub url: Option<String>,

    /// Parallel GitHub lookups while loading
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_concurrency() -> usize {
    8 // a few dozen repos, no need to hammer the API
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: None,
            concurrency: default_concurrency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiConfig {
    /// How many repository names the search box suggests
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,

    /// Number of steps a slider takes from one end to the other
    #[serde(default = "default_slider_steps")]
    pub slider_steps: u32,
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_slider_steps() -> u32 {
    20
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            suggestion_limit: default_suggestion_limit(),
            slider_steps: default_slider_steps(),
        }
    }
}
