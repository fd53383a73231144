//! Configuration schema definitions
//!
//! Defines the structure of the configuration file using serde.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::defaults;

/// When to emit ANSI colors
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color only when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn enabled(self, is_terminal: bool) -> bool {
        match self {
            ColorMode::Auto => is_terminal,
            ColorMode::Always => true,
            ColorMode::Never => false,
        }
    }
}

impl FromStr for ColorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ColorMode::Auto),
            "always" => Ok(ColorMode::Always),
            "never" => Ok(ColorMode::Never),
            other => Err(anyhow::anyhow!(
                "invalid color mode {:?}, expected auto, always or never",
                other
            )),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorMode::Auto => "auto",
            ColorMode::Always => "always",
            ColorMode::Never => "never",
        })
    }
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Condition types consulted for the READY column, first match wins
    #[serde(default = "defaults::condition_types")]
    pub condition_types: Vec<String>,

    #[serde(default)]
    pub color: ColorMode,

    /// Objects requested per list call
    #[serde(default = "defaults::page_size")]
    pub page_size: u32,

    /// Render whatever was fetched even when some resource types failed
    #[serde(default)]
    pub best_effort: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            condition_types: defaults::condition_types(),
            color: ColorMode::default(),
            page_size: defaults::page_size(),
            best_effort: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.condition_types.is_empty() {
            anyhow::bail!("conditionTypes must name at least one condition type");
        }
        if self.page_size == 0 {
            anyhow::bail!("pageSize must be greater than zero");
        }
        Ok(())
    }
}

/// Split a comma separated list of condition types, dropping blanks
pub fn parse_condition_types(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = serde_yaml::from_str("color: never\n").unwrap();
        assert_eq!(config.color, ColorMode::Never);
        assert_eq!(config.condition_types, vec!["Ready".to_string()]);
        assert_eq!(config.page_size, 250);
        assert!(!config.best_effort);
    }

    #[test]
    fn test_camel_case_keys() {
        let config: Config = serde_yaml::from_str(
            "conditionTypes: [Available, Ready]\npageSize: 100\nbestEffort: true\n",
        )
        .unwrap();
        assert_eq!(config.condition_types, vec!["Available", "Ready"]);
        assert_eq!(config.page_size, 100);
        assert!(config.best_effort);
    }

    #[test]
    fn test_validate() {
        assert!(Config::default().validate().is_ok());
        let empty = Config {
            condition_types: Vec::new(),
            ..Default::default()
        };
        assert!(empty.validate().is_err());
        let zero = Config {
            page_size: 0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_color_mode() {
        assert_eq!("Always".parse::<ColorMode>().unwrap(), ColorMode::Always);
        assert!("sometimes".parse::<ColorMode>().is_err());
        assert!(ColorMode::Auto.enabled(true));
        assert!(!ColorMode::Auto.enabled(false));
        assert!(!ColorMode::Never.enabled(true));
        assert_eq!(ColorMode::Never.to_string(), "never");
    }

    #[test]
    fn test_parse_condition_types() {
        assert_eq!(
            parse_condition_types(" Ready, ,Processed ,"),
            vec!["Ready".to_string(), "Processed".to_string()]
        );
        assert!(parse_condition_types("").is_empty());
    }
}
