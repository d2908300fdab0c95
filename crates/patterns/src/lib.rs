//! # LogixUML Patterns
//!
//! Instantiates workspace patterns into a model repository and annotates
//! the resulting state machines for AOI generation.
//!
//! ## Components
//!
//! - `host` - Ports onto the modeling tool (pattern service, repository)
//! - `PatternImporter` - Registers and applies pattern files
//! - `AnnotationWriter` - Applies the stereotype and its properties
//! - `StereotypeProperties` - Reads the properties back, validated
//! - `in_memory` - Host adapters for tests and dry runs

pub mod annotate;
pub mod host;
pub mod in_memory;
pub mod instantiate;
pub mod pipeline;
pub mod stereotype;

pub use annotate::{Annotation, AnnotationWriter};
pub use host::{
    ElementId, HostContext, ModelRepository, PackageRef, ParamValue, PatternParams,
    PatternService, StateMachineRef, NAME_PARAM,
};
pub use in_memory::{InMemoryModel, InMemoryPatternService};
pub use instantiate::{InstantiationReport, PatternApplication, PatternImporter};
pub use pipeline::{run, PatternRunReport};
pub use stereotype::{StereotypeProperties, StereotypeScope};
