//! # LogixUML Shared
//!
//! Common types used by the AOI merge and pattern annotation pipelines.

pub mod config;
pub mod error;
pub mod naming;
pub mod scan;

// Re-exports
pub use config::*;
pub use error::*;
pub use naming::*;
pub use scan::files_with_extension;
