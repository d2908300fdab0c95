//! Error types for LogixUML

use thiserror::Error;

/// Error raised when the target document has no container for a kind
#[derive(Debug, Error)]
#[error("Target document has no '{container}' element")]
pub struct ContainerNotFoundError {
    pub container: String,
}

/// Error raised when the repository does not hold exactly one user package
#[derive(Debug, Error)]
#[error("Expected exactly one target package, found {}: [{}]", candidates.len(), candidates.join(", "))]
pub struct TargetPackageError {
    pub candidates: Vec<String>,
}

/// General LogixUML error type
#[derive(Debug, Error)]
pub enum LogixError {
    #[error(transparent)]
    ContainerNotFound(#[from] ContainerNotFoundError),

    #[error(transparent)]
    TargetPackage(#[from] TargetPackageError),

    #[error("String is not a valid add-on instruction name: '{0}'")]
    InvalidIdentifier(String),

    #[error("Invalid '{key}' property: {reason}")]
    InvalidProperty { key: String, reason: String },

    #[error("XML error: {0}")]
    Xml(String),

    #[error("Host error: {0}")]
    Host(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, LogixError>;
