//! CLI Commands

pub mod aoi;
pub mod patterns;
pub mod scan_mode;

pub use aoi::AoiCommand;
pub use patterns::PatternsCommand;
pub use scan_mode::ScanModeCommand;
