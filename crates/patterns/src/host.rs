//! Host Ports - What the pipelines need from the modeling application
//!
//! These traits are the PORTS of the pattern pipeline. The modeling tool
//! plugs in its own pattern service and model repository; the in-memory
//! adapters in [`crate::in_memory`] stand in for tests and dry runs.
//!
//! ```text
//! Pipeline              │  Host adapter
//! ──────────────────────┼────────────────────────
//! trait PatternService  │  modeling tool pattern catalog
//!   fn add_pattern()    │  InMemoryPatternService
//!   fn apply_pattern()  │
//! trait ModelRepository │  modeling tool session
//!   fn packages()       │  InMemoryModel
//!   fn state_machines() │
//! ```
//!
//! Note: No async here. Every call is local and runs to completion.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use shared::Result;

/// Parameter key carrying the generated name of one pattern variant
pub const NAME_PARAM: &str = "$(name)";

/// Opaque handle to a model element owned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ElementId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A package in the model, as seen by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRef {
    pub id: ElementId,
    pub name: String,
}

/// A state machine in the model, as seen by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateMachineRef {
    pub id: ElementId,
    pub name: String,
}

/// Value bound to a pattern parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Package(PackageRef),
    Text(String),
}

/// Parameters for one pattern application, keyed by parameter name
pub type PatternParams = BTreeMap<String, ParamValue>;

/// Pattern catalog and instantiation service
pub trait PatternService {
    /// Register a pattern file with the catalog. Registering the same file
    /// again is allowed.
    fn add_pattern(&mut self, path: &Path) -> Result<()>;

    /// Instantiate a registered pattern into the model
    fn apply_pattern(&mut self, pattern_name: &str, params: &PatternParams) -> Result<()>;
}

/// Model repository with stereotype property storage
pub trait ModelRepository {
    /// Every package in the model, the predefined ones included
    fn packages(&self) -> Result<Vec<PackageRef>>;

    /// Every state machine in the model
    fn state_machines(&self) -> Result<Vec<StateMachineRef>>;

    /// Apply a stereotype. Applying it again is a no-op.
    fn add_stereotype(&mut self, element: &ElementId, module: &str, stereotype: &str) -> Result<()>;

    /// Set a stereotype property value, replacing any previous value
    fn set_property(
        &mut self,
        element: &ElementId,
        module: &str,
        stereotype: &str,
        key: &str,
        value: &str,
    ) -> Result<()>;

    /// Read a stereotype property; `None` when never set
    fn property(
        &self,
        element: &ElementId,
        module: &str,
        stereotype: &str,
        key: &str,
    ) -> Result<Option<String>>;
}

/// Explicit handle to the running host session
///
/// Passed to every component needing the model, in place of a global
/// "current session".
pub struct HostContext<'a> {
    /// Directory holding the pattern definition files
    pub workspace: PathBuf,
    pub patterns: &'a mut dyn PatternService,
    pub repository: &'a mut dyn ModelRepository,
}

impl<'a> HostContext<'a> {
    pub fn new(
        workspace: impl Into<PathBuf>,
        patterns: &'a mut dyn PatternService,
        repository: &'a mut dyn ModelRepository,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            patterns,
            repository,
        }
    }
}
