//! Configuration and file locations for pr-review
//!
//! This crate provides:
//! - Config and cache directory resolution
//! - Configuration file lookup (TOML)
//! - Application configuration (AppConfig)

pub mod app_config;
pub mod config_file;
pub mod paths;

pub use app_config::AppConfig;
pub use config_file::{load_config_file, load_config_file_from, CONFIG_FILE};
