//! Logix tag and instruction name rules
//!
//! Per the RSLogix documentation, referencing IEC 61131-3 section 2.1.2:
//! a letter or underscore first, then letters, digits and single
//! underscores, 40 characters at most, never ending in an underscore.

use regex::Regex;
use std::sync::OnceLock;

use shared::{LogixError, Result};

/// Longest identifier the controller accepts
pub const MAX_IDENTIFIER_LEN: usize = 40;

fn identifier_shape() -> Option<&'static Regex> {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    SHAPE
        .get_or_init(|| {
            Regex::new(&format!(
                r"^[A-Za-z_][A-Za-z0-9_]{{0,{}}}$",
                MAX_IDENTIFIER_LEN - 1
            ))
            .ok()
        })
        .as_ref()
}

/// Check whether `id` is a legal AOI, parameter or tag name
pub fn is_valid_identifier(id: &str) -> bool {
    identifier_shape()
        .map(|r| r.is_match(id))
        .unwrap_or(false)
        && !id.contains("__")
        && !id.ends_with('_')
}

/// Like [`is_valid_identifier`], as a `Result`
pub fn validate_identifier(id: &str) -> Result<()> {
    if is_valid_identifier(id) {
        Ok(())
    } else {
        Err(LogixError::InvalidIdentifier(id.to_string()))
    }
}
