//! Stereotype property table for state machine AOIs
//!
//! Reads back and validates the values the annotation pass writes, the way
//! the AOI exporter consumes them.

use crate::host::{ElementId, ModelRepository};
use shared::{LogixError, Result, ScanMode, MAX_EVENT_QUEUE_SIZE, MIN_EVENT_QUEUE_SIZE};

/// Property holding the event queue capacity
pub const EVENT_QUEUE_SIZE_KEY: &str = "eventQueueSize";

/// Property holding the transition scan mode
pub const TRANSITION_SCAN_MODE_KEY: &str = "transitionScanMode";

/// The module/stereotype pair that scopes the properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StereotypeScope {
    pub module: String,
    pub stereotype: String,
}

impl StereotypeScope {
    pub fn new(module: impl Into<String>, stereotype: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            stereotype: stereotype.into(),
        }
    }
}

/// Typed view of one element's stereotype properties
pub struct StereotypeProperties<'a> {
    repository: &'a dyn ModelRepository,
    element: &'a ElementId,
    scope: &'a StereotypeScope,
}

impl<'a> StereotypeProperties<'a> {
    pub fn new(
        repository: &'a dyn ModelRepository,
        element: &'a ElementId,
        scope: &'a StereotypeScope,
    ) -> Self {
        Self {
            repository,
            element,
            scope,
        }
    }

    /// Event queue size, 1 to 8 inclusive
    pub fn event_queue_size(&self) -> Result<u32> {
        let raw = self.table_value(EVENT_QUEUE_SIZE_KEY)?;
        raw.parse::<u32>()
            .ok()
            .filter(|size| (MIN_EVENT_QUEUE_SIZE..=MAX_EVENT_QUEUE_SIZE).contains(size))
            .ok_or_else(|| LogixError::InvalidProperty {
                key: EVENT_QUEUE_SIZE_KEY.to_string(),
                reason: format!(
                    "'{}' is not between {} and {} inclusive",
                    raw, MIN_EVENT_QUEUE_SIZE, MAX_EVENT_QUEUE_SIZE
                ),
            })
    }

    /// Transition scan mode, case-insensitive
    pub fn transition_scan_mode(&self) -> Result<ScanMode> {
        self.table_value(TRANSITION_SCAN_MODE_KEY)?.parse()
    }

    // A property never set reads as empty, matching the table's defaults.
    fn table_value(&self, key: &str) -> Result<String> {
        let value = self.repository.property(
            self.element,
            &self.scope.module,
            &self.scope.stereotype,
            key,
        )?;
        Ok(value.unwrap_or_default().trim().to_string())
    }
}
