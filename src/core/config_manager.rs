// src/core/config_manager.rs
//! Unified configuration management - one loader for paths and search
//! settings, selected by environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
    pub fixtures_path: PathBuf,
}

/// Search-facing settings. The home country backs the
/// "Across <Country>" location sentinel, so deployments outside India
/// only need a config change.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub home_country: String,
}

impl SearchConfig {
    /// The whole-country sentinel value recognized in location
    /// filters, e.g. "Across India".
    pub fn across_sentinel(&self) -> String {
        format!("Across {}", self.home_country)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigSection {
    database_path: PathBuf,
    fixtures_path: PathBuf,
    home_country: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: ConfigSection,
    production: ConfigSection,
}

impl ConfigManager {
    /// Load all configurations
    pub fn load() -> Result<Self> {
        let environment = Self::environment_name();
        info!("Loading configuration for environment: {}", environment);

        let config_path = PathBuf::from(CONFIG_FILE);
        if config_path.exists() {
            Self::load_from_file(&config_path, &environment)
        } else {
            info!("{CONFIG_FILE} not found, using defaults");
            Self::defaults()
        }
    }

    fn environment_name() -> String {
        std::env::var("ENVIRONMENT")
            .or_else(|_| std::env::var("ENV"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_from_file(path: &Path, environment: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let section = match environment {
            "production" => file.production,
            _ => file.local,
        };

        Ok(Self {
            environment: EnvironmentConfig {
                database_path: Self::resolve_path(&section.database_path)?,
                fixtures_path: Self::resolve_path(&section.fixtures_path)?,
            },
            search: SearchConfig {
                home_country: section.home_country,
            },
        })
    }

    fn defaults() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Ok(Self {
            environment: EnvironmentConfig {
                database_path: base_dir.join("data").join("jobdeck.db"),
                fixtures_path: base_dir.join("fixtures"),
            },
            search: SearchConfig {
                home_country: "India".to_string(),
            },
        })
    }

    fn resolve_path(path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            let current_dir = std::env::current_dir().context("Failed to get current directory")?;
            Ok(current_dir.join(path))
        }
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        if let Some(db_parent) = self.environment.database_path.parent() {
            tokio::fs::create_dir_all(db_parent)
                .await
                .with_context(|| {
                    format!("Failed to create database directory: {}", db_parent.display())
                })?;
        }
        Ok(())
    }
}
