use anyhow::{Context, Result};
use chrono::format::{Item, StrftimeItems};
use config::{Config as ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use crate::state::MilestoneStatus;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub dates: DatesConfig,
    #[serde(default)]
    pub milestones: MilestonesConfig,
    #[serde(default)]
    pub state: StateConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct DatesConfig {
    /// Extra strftime formats accepted by the date parser, tried after the
    /// built-in ones
    #[serde(default)]
    pub extra_formats: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MilestonesConfig {
    /// Status assigned by `milestone add` when --status is omitted
    #[serde(default = "default_status")]
    pub default_status: String,
}

fn default_status() -> String {
    "pending".to_string()
}

impl Default for MilestonesConfig {
    fn default() -> Self {
        Self {
            default_status: default_status(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StateConfig {
    /// Optional override for the state directory (for testing)
    pub state_dir_override: Option<PathBuf>,
}

impl DatesConfig {
    /// Validate that every extra format is a well-formed strftime pattern
    pub fn validate(&self) -> Result<()> {
        for format in &self.extra_formats {
            if format.trim().is_empty() {
                anyhow::bail!("Invalid date format: empty string");
            }
            let malformed = StrftimeItems::new(format).any(|item| matches!(item, Item::Error));
            if malformed {
                anyhow::bail!("Invalid date format '{}'", format);
            }
        }
        Ok(())
    }
}

impl MilestonesConfig {
    /// Validate that the default status names a known status
    pub fn validate(&self) -> Result<()> {
        MilestoneStatus::from_str(&self.default_status)
            .with_context(|| format!("Invalid default_status '{}'", self.default_status))?;
        Ok(())
    }
}

impl Config {
    /// Validate all configuration
    pub fn validate(&self) -> Result<()> {
        self.dates.validate()?;
        self.milestones.validate()?;
        Ok(())
    }
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

pub fn config_path() -> Result<PathBuf> {
    let config_dir = home::home_dir()
        .context("Could not find home directory")?
        .join(".duespan");
    Ok(config_dir.join("config.toml"))
}

pub fn load() -> Result<Config> {
    let config = load_from_path(config_path()?)?;
    config.validate()?;
    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
