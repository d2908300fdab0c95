//! Naming conventions
//!
//! State machines carry their transition scan mode in a name suffix:
//! `Motor_dual` scans dual, `Motor_sequential` scans sequential, and any
//! name without a recognized suffix falls back to single.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LogixError;

/// Character separating a base name from its classification suffix
pub const SUFFIX_SEPARATOR: char = '_';

/// Classify `name` by its final `separator`-delimited segment.
///
/// Returns the segment when it is one of `recognized`, otherwise `default`.
/// Matching is exact and case-sensitive.
pub fn derive_classification<'a>(
    name: &str,
    separator: char,
    recognized: &[&'a str],
    default: &'a str,
) -> &'a str {
    let suffix = name.rsplit(separator).next().unwrap_or(name);
    recognized
        .iter()
        .copied()
        .find(|token| *token == suffix)
        .unwrap_or(default)
}

/// How a state machine evaluates its transitions each scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// At most one transition per scan (default)
    #[default]
    Single,
    /// Up to two transitions per scan
    Dual,
    /// Transitions are taken until the machine settles
    Sequential,
}

impl ScanMode {
    /// Every mode, in the order variants are generated
    pub const ALL: [ScanMode; 3] = [ScanMode::Single, ScanMode::Dual, ScanMode::Sequential];

    /// Name suffix and property value for this mode
    pub fn token(&self) -> &'static str {
        match self {
            ScanMode::Single => "single",
            ScanMode::Dual => "dual",
            ScanMode::Sequential => "sequential",
        }
    }

    /// Exact, case-sensitive token lookup
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.token() == token)
    }

    /// Recover the mode from an element name, defaulting when unmarked
    pub fn from_name(name: &str) -> Self {
        Self::from_name_with(name, SUFFIX_SEPARATOR)
    }

    /// Like [`ScanMode::from_name`], for names whose suffix follows `separator`
    pub fn from_name_with(name: &str, separator: char) -> Self {
        let tokens = Self::ALL.map(|m| m.token());
        let token = derive_classification(name, separator, &tokens, Self::default().token());
        Self::from_token(token).unwrap_or_default()
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Lenient parsing for property table values: trimmed and case-insensitive
impl FromStr for ScanMode {
    type Err = LogixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        Self::from_token(&value).ok_or_else(|| LogixError::InvalidProperty {
            key: "transitionScanMode".to_string(),
            reason: format!("undefined transition scan mode '{}'", s.trim()),
        })
    }
}
