//! # LogixUML L5X
//!
//! Merges Add-On Instruction exports into a Logix project document.
//!
//! ## Components
//!
//! - `XmlDocument` - Owned XML tree read and written with quick-xml
//! - `ArtifactLoader` - Validates an export and lifts out its definition
//! - `ProjectDocument` - Replaces or inserts definitions by name
//! - `AoiImporter` - Runs the loader and merge over a whole directory

pub mod identifier;
pub mod importer;
pub mod kind;
pub mod loader;
pub mod project;
pub mod xml;

pub use identifier::{is_valid_identifier, validate_identifier};
pub use importer::{AoiImporter, ImportReport, MergedArtifact, SkippedFile};
pub use kind::ArtifactKind;
pub use loader::{ArtifactLoader, LoadOutcome, SkipReason, SourceArtifact};
pub use project::{MergeOutcome, ProjectDocument};
pub use xml::{Element, Node, XmlDocument};
