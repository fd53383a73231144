//! Configuration loading and merging logic
//!
//! Precedence order (highest to lowest):
//! 1. Command line flags (applied by the caller)
//! 2. Environment variable overrides
//! 3. Config file
//! 4. Built-in defaults

use super::{
    defaults, paths,
    schema::{ColorMode, Config, parse_condition_types},
};
use anyhow::{Context, Result};
use std::path::Path;

pub const CONDITION_TYPES_ENV: &str = "KUBETREE_CONDITION_TYPES";
pub const COLOR_ENV: &str = "KUBETREE_COLOR";
pub const NO_COLOR_ENV: &str = "NO_COLOR";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the file and environment layers merged
    ///
    /// An explicitly requested file must exist; a missing default file just
    /// means built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let config = match explicit {
            Some(path) => Self::load_file(path)?,
            None => match paths::root_config_path() {
                Some(path) if path.exists() => Self::load_file(&path)?,
                path => {
                    tracing::debug!(path = ?path, "no config file, using defaults");
                    defaults::default_config()
                }
            },
        };

        let config = Self::apply_env_overrides(config)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        // An empty file deserializes to unit, not to a map
        if contents.trim().is_empty() {
            return Ok(defaults::default_config());
        }

        let config: Config = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(config: Config) -> Result<Config> {
        Self::apply_overrides(config, |key| std::env::var(key).ok())
    }

    fn apply_overrides(mut config: Config, lookup: impl Fn(&str) -> Option<String>) -> Result<Config> {
        if let Some(types) = lookup(CONDITION_TYPES_ENV) {
            let types = parse_condition_types(&types);
            if !types.is_empty() {
                config.condition_types = types;
            }
        }

        if let Some(color) = lookup(COLOR_ENV) {
            config.color = color
                .parse()
                .with_context(|| format!("{} is not a valid color mode", COLOR_ENV))?;
        }

        // https://no-color.org: any non-empty value disables color
        if lookup(NO_COLOR_ENV).is_some_and(|v| !v.is_empty()) {
            config.color = ColorMode::Never;
        }

        Ok(config)
    }
}
