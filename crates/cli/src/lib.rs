//! # LogixUML CLI
//!
//! Command implementations for the `logixuml` binary.

pub mod commands;

use std::path::Path;

use serde::Serialize;
use shared::LogixConfig;

/// Options shared by every command
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub config: LogixConfig,
    /// Print machine-readable JSON instead of a summary
    pub json: bool,
}

impl Settings {
    /// Build settings from an optional config file
    pub fn load(config: Option<&Path>, json: bool) -> anyhow::Result<Self> {
        let config = match config {
            Some(path) => LogixConfig::from_file(path)?,
            None => LogixConfig::default(),
        };
        Ok(Self { config, json })
    }

    /// Print `value` as pretty JSON
    pub fn print_json<T: Serialize>(&self, value: &T) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_without_file() {
        let settings = Settings::load(None, true).unwrap();
        assert!(settings.json);
        assert_eq!(settings.config, LogixConfig::default());
    }

    #[test]
    fn test_settings_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logixuml.json");
        std::fs::write(&path, r#"{ "aoi": { "inputProject": "line1.L5X" } }"#).unwrap();

        let settings = Settings::load(Some(&path), false).unwrap();
        assert_eq!(settings.config.aoi.input_project, "line1.L5X");
    }

    #[test]
    fn test_settings_reject_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logixuml.json");
        std::fs::write(&path, r#"{ "patterns": { "eventQueueSize": 20 } }"#).unwrap();

        assert!(Settings::load(Some(&path), false).is_err());
    }
}
