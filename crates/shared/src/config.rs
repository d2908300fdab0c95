//! Configuration types for LogixUML

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{LogixError, Result};

/// Lower, inclusive limit for event queue sizes
pub const MIN_EVENT_QUEUE_SIZE: u32 = 1;

/// Upper, inclusive limit for event queue sizes
pub const MAX_EVENT_QUEUE_SIZE: u32 = 8;

/// Settings for merging AOI definitions into a PLC project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AoiImportConfig {
    /// Project that AOIs are imported into
    pub input_project: String,

    /// Project written after every AOI has been merged
    pub output_project: String,

    /// Extension of candidate AOI export files, without the dot
    pub extension: String,
}

impl Default for AoiImportConfig {
    fn default() -> Self {
        Self {
            input_project: "unittest.L5X".to_string(),
            output_project: "out.L5X".to_string(),
            extension: "L5X".to_string(),
        }
    }
}

/// Settings for pattern instantiation and state machine annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatternConfig {
    /// Extension of pattern definition files, without the dot
    pub extension: String,

    /// Trailing character marking a pattern applied once per scan mode.
    /// Generated names put the mode after it, and it is the separator the
    /// mode is read back from.
    pub multiplicity_marker: char,

    /// Host-predefined package excluded from target selection
    pub primitive_package: String,

    /// Module defining the stereotype
    pub module_name: String,

    /// Stereotype applied to every state machine
    pub stereotype_name: String,

    /// Event queue size written to every state machine
    pub event_queue_size: u32,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            extension: "umlt".to_string(),
            multiplicity_marker: '_',
            primitive_package: "UML Types".to_string(),
            module_name: "LogixUML".to_string(),
            stereotype_name: "StateMachineAoi".to_string(),
            event_queue_size: 2,
        }
    }
}

/// Top-level configuration file (logixuml.json / logixuml.yaml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogixConfig {
    pub aoi: AoiImportConfig,
    pub patterns: PatternConfig,
}

impl LogixConfig {
    /// Load configuration from a JSON or YAML file, chosen by extension
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => serde_json::from_str(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipelines cannot work with
    pub fn validate(&self) -> Result<()> {
        let size = self.patterns.event_queue_size;
        if !(MIN_EVENT_QUEUE_SIZE..=MAX_EVENT_QUEUE_SIZE).contains(&size) {
            return Err(LogixError::Config(format!(
                "eventQueueSize {} is outside {}..={}",
                size, MIN_EVENT_QUEUE_SIZE, MAX_EVENT_QUEUE_SIZE
            )));
        }

        let marker = self.patterns.multiplicity_marker;
        if marker.is_alphanumeric() {
            return Err(LogixError::Config(format!(
                "multiplicityMarker '{}' must not be a letter or digit",
                marker
            )));
        }

        if self.aoi.extension.is_empty() || self.patterns.extension.is_empty() {
            return Err(LogixError::Config("file extensions must not be empty".to_string()));
        }

        Ok(())
    }
}

/// Logger interface for dependency injection
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn info(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn warn(&self, message: &str, meta: Option<&HashMap<String, String>>);
    fn error(&self, message: &str, meta: Option<&HashMap<String, String>>);
}

/// Logger forwarding to the `tracing` subscriber installed by the binary
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        match meta {
            Some(meta) => tracing::debug!(?meta, "{}", message),
            None => tracing::debug!("{}", message),
        }
    }

    fn info(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        match meta {
            Some(meta) => tracing::info!(?meta, "{}", message),
            None => tracing::info!("{}", message),
        }
    }

    fn warn(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        match meta {
            Some(meta) => tracing::warn!(?meta, "{}", message),
            None => tracing::warn!("{}", message),
        }
    }

    fn error(&self, message: &str, meta: Option<&HashMap<String, String>>) {
        match meta {
            Some(meta) => tracing::error!(?meta, "{}", message),
            None => tracing::error!("{}", message),
        }
    }
}

/// No-op logger for testing
#[derive(Debug, Clone, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn debug(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn info(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn warn(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
    fn error(&self, _message: &str, _meta: Option<&HashMap<String, String>>) {}
}
