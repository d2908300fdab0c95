//! logixuml aoi command

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::Settings;
use l5x::AoiImporter;
use shared::TracingLogger;

#[derive(Debug, Args)]
pub struct AoiCommand {
    /// Directory holding the project and the AOI exports
    #[arg(default_value = ".")]
    pub directory: PathBuf,
}

impl AoiCommand {
    pub fn run(&self, settings: &Settings) -> anyhow::Result<()> {
        let importer = AoiImporter::new(Arc::new(TracingLogger), settings.config.aoi.clone());
        let report = importer.run(&self.directory)?;

        if settings.json {
            return settings.print_json(&report);
        }

        for merged in &report.merged {
            println!("✓ {} ({:?})", merged.name, merged.outcome);
        }
        for skipped in &report.skipped {
            println!("- {} skipped: {}", skipped.path.display(), skipped.reason);
        }
        if let Some(output) = &report.output {
            println!(
                "Wrote {} ({} merged, {} replaced, {} skipped)",
                output.display(),
                report.merged.len(),
                report.replaced_count(),
                report.skipped.len()
            );
        }
        Ok(())
    }
}
