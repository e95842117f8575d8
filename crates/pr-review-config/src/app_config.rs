//! Application configuration
//!
//! Configuration loaded from `.pr-review.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration loaded from `.pr-review.toml`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    /// Server root, e.g. `https://git.example.com`
    #[serde(default)]
    pub base_url: String,

    /// Project key used when none is given on the command line
    #[serde(default)]
    pub default_project: Option<String>,

    /// Repository slug used when none is given on the command line
    #[serde(default)]
    pub default_repository: Option<String>,

    /// Page size requested from paged endpoints
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    /// Pull request state filter (`OPEN`, `MERGED`, `DECLINED`, `ALL`)
    #[serde(default = "default_pull_request_state")]
    pub pull_request_state: String,

    /// Directory of recorded responses
    #[serde(default)]
    pub recordings_dir: Option<PathBuf>,
}

fn default_page_limit() -> u32 {
    100
}

fn default_pull_request_state() -> String {
    "OPEN".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            default_project: None,
            default_repository: None,
            page_limit: default_page_limit(),
            pull_request_state: default_pull_request_state(),
            recordings_dir: None,
        }
    }
}

impl AppConfig {
    /// Load config from CWD first, then home directory, or use defaults
    pub fn load() -> Self {
        Self::from_content(crate::load_config_file())
    }

    /// Parse config content, falling back to defaults when absent or invalid
    pub fn from_content(content: Option<String>) -> Self {
        if let Some(content) = content {
            match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded app config from file");
                    return config;
                }
                Err(e) => {
                    log::warn!("Failed to parse config file: {}", e);
                }
            }
        }

        log::debug!("Using default app config");
        Self::default()
    }
}
