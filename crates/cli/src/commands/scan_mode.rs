//! logixuml scan-mode command

use clap::Args;
use serde::Serialize;

use crate::Settings;
use shared::ScanMode;

#[derive(Debug, Args)]
pub struct ScanModeCommand {
    /// State machine names
    #[arg(required = true)]
    pub names: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Derived<'a> {
    name: &'a str,
    scan_mode: ScanMode,
}

impl ScanModeCommand {
    pub fn run(&self, settings: &Settings) -> anyhow::Result<()> {
        let marker = settings.config.patterns.multiplicity_marker;
        let derived: Vec<Derived<'_>> = self
            .names
            .iter()
            .map(|name| Derived {
                name,
                scan_mode: ScanMode::from_name_with(name, marker),
            })
            .collect();

        if settings.json {
            return settings.print_json(&derived);
        }

        for d in &derived {
            println!("{}: {}", d.name, d.scan_mode);
        }
        Ok(())
    }
}
