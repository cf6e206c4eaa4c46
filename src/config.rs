// src/config.rs

//! Optional TOML analysis configuration.
//!
//! Every field has a built-in default, so an empty file (or no file at all)
//! behaves exactly like the compiled-in constants.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::DEFAULT_FREQUENCY_HZ;
use crate::data_input::layout::{LayoutProfile, LayoutSelector};
use crate::error::{MocapError, MocapResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sampling rate used when a capture has no usable `FREQUENCY` entry.
    pub default_frequency_hz: f64,
    /// Marker layout rules.
    pub layouts: LayoutSelector,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_frequency_hz: DEFAULT_FREQUENCY_HZ,
            layouts: LayoutSelector::builtin(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> MocapResult<()> {
        if !self.default_frequency_hz.is_finite() || self.default_frequency_hz <= 0.0 {
            return Err(MocapError::Config(format!(
                "default_frequency_hz must be positive, got {}",
                self.default_frequency_hz
            )));
        }
        let profiles = self
            .layouts
            .rules
            .iter()
            .map(|rule| &rule.profile)
            .chain(std::iter::once(&self.layouts.default_profile));
        for profile in profiles {
            if profile.role_table().iter().any(|entry| entry.label == 0) {
                return Err(MocapError::Config(format!(
                    "{} layout: marker labels start at 1",
                    profile.name()
                )));
            }
            if let LayoutProfile::CompanionMatched(layout) = profile {
                if layout.companion_file.trim().is_empty() {
                    return Err(MocapError::Config(
                        "companion_file must not be empty".to_string(),
                    ));
                }
            }
        }
        if self
            .layouts
            .rules
            .iter()
            .any(|rule| rule.file_name_contains.is_empty())
        {
            return Err(MocapError::Config(
                "file_name_contains must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Loads and validates a config file.
    pub fn load(path: &Path) -> MocapResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => MocapError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => MocapError::Io(e),
        })?;
        let config: Self =
            toml::from_str(&content).map_err(|e| MocapError::Config(e.to_string()))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Loads `path` when given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> MocapResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> MocapResult<String> {
        toml::to_string_pretty(self).map_err(|e| MocapError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_input::layout::{CenterLineSplitLayout, LayoutRule};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.default_frequency_hz, 100.0);
        assert_eq!(config.layouts, LayoutSelector::builtin());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip_serialization() {
        let original = AnalysisConfig::default();
        let toml_str = original.to_toml().unwrap();
        assert!(toml_str.contains("default_frequency_hz"));
        let deserialized: AnalysisConfig = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(deserialized, original);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AnalysisConfig = toml::from_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_load_custom_rule() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("mocap.toml");

        let mut config = AnalysisConfig::default();
        config.default_frequency_hz = 250.0;
        config.layouts.rules.push(LayoutRule {
            file_name_contains: "Trial".to_string(),
            profile: LayoutProfile::CenterLineSplit(CenterLineSplitLayout {
                excluded_labels: vec!["l1".to_string()],
                role_table: Vec::new(),
            }),
        });
        fs::write(&path, config.to_toml().unwrap()).unwrap();

        let loaded = AnalysisConfig::load(&path).expect("Failed to load config");
        assert_eq!(loaded.default_frequency_hz, 250.0);
        assert_eq!(loaded.layouts.rules.len(), 2);
        assert_eq!(
            loaded.layouts.select(Path::new("Trial3.tsv")),
            &config.layouts.rules[1].profile
        );
    }

    #[test]
    fn test_invalid_frequency_rejected() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("bad.toml");
        fs::write(&path, "default_frequency_hz = -1.0\n").unwrap();
        assert!(matches!(
            AnalysisConfig::load(&path),
            Err(MocapError::Config(_))
        ));
    }
}
