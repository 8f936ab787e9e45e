//! TOML configuration file support.
//!
//! Settings can be kept in a config file instead of repeating CLI flags:
//!
//! ```toml
//! # assay2msp.toml
//! [conversion]
//! remove_decoys = true
//! grouping = "strict"
//! ```
//!
//! Flags given on the command line take precedence.

use anyhow::{Context, Result};
use mspconvert::aggregate::GroupingMode;
use mspconvert::converter::ConverterConfig;
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for assay2msp.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Conversion-specific settings.
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Configuration for the convert command.
#[derive(Debug, Default, Deserialize)]
pub struct ConversionConfig {
    /// Drop decoy transitions (default: true).
    pub remove_decoys: Option<bool>,

    /// Group boundary handling.
    pub grouping: Option<GroupingMode>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}

impl ConversionConfig {
    /// Merge file settings with command-line flags into a converter config.
    ///
    /// `--keep-decoys` and an explicit `--grouping` win over the file; unset
    /// values fall back to [`ConverterConfig::default`].
    pub fn resolve(&self, keep_decoys: bool, grouping: Option<GroupingMode>) -> ConverterConfig {
        let defaults = ConverterConfig::default();
        ConverterConfig {
            remove_decoys: !keep_decoys && self.remove_decoys.unwrap_or(defaults.remove_decoys),
            grouping: grouping.or(self.grouping).unwrap_or(defaults.grouping),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [conversion]
            remove_decoys = false
            grouping = "strict"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.conversion.remove_decoys, Some(false));
        assert_eq!(config.conversion.grouping, Some(GroupingMode::Strict));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [conversion]
            grouping = "adjacent"
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.conversion.grouping, Some(GroupingMode::Adjacent));
        assert_eq!(config.conversion.remove_decoys, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.conversion.remove_decoys, None);
        assert_eq!(config.conversion.grouping, None);
    }

    #[test]
    fn test_unknown_grouping_is_rejected() {
        let toml = r#"
            [conversion]
            grouping = "sorted"
        "#;
        assert!(Config::from_str(toml).is_err());
    }

    #[test]
    fn test_keep_decoys_flag_overrides_file() {
        let config = Config::from_str("[conversion]\nremove_decoys = true\n").unwrap();
        assert!(!config.conversion.resolve(true, None).remove_decoys);
        assert!(config.conversion.resolve(false, None).remove_decoys);
    }

    #[test]
    fn test_grouping_flag_overrides_file() {
        let config = Config::from_str("[conversion]\ngrouping = \"adjacent\"\n").unwrap();
        let resolved = config.conversion.resolve(false, Some(GroupingMode::Strict));
        assert_eq!(resolved.grouping, GroupingMode::Strict);
        assert_eq!(config.conversion.resolve(false, None).grouping, GroupingMode::Adjacent);
    }

    #[test]
    fn test_file_values_used_without_flags() {
        let toml = r#"
            [conversion]
            remove_decoys = false
            grouping = "strict"
        "#;
        let resolved = Config::from_str(toml).unwrap().conversion.resolve(false, None);
        assert!(!resolved.remove_decoys);
        assert_eq!(resolved.grouping, GroupingMode::Strict);
    }

    #[test]
    fn test_defaults_without_file_or_flags() {
        let resolved = ConversionConfig::default().resolve(false, None);
        assert!(resolved.remove_decoys);
        assert_eq!(resolved.grouping, GroupingMode::Adjacent);
    }
}
