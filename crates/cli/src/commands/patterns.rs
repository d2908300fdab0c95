//! logixuml patterns command

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::Settings;
use patterns::{HostContext, InMemoryModel, InMemoryPatternService};
use shared::TracingLogger;

/// Dry run of the pattern pipeline against an in-memory model.
///
/// The modeling tool supplies its own host adapters; this shows which
/// applications and annotations a workspace would produce.
#[derive(Debug, Args)]
pub struct PatternsCommand {
    /// Workspace directory holding the pattern files
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Name of the package receiving the generated elements
    #[arg(short, long, default_value = "Model")]
    pub package: String,
}

impl PatternsCommand {
    pub fn run(&self, settings: &Settings) -> anyhow::Result<()> {
        let config = &settings.config.patterns;

        let mut model = InMemoryModel::new();
        model.add_package(config.primitive_package.clone())?;
        model.add_package(self.package.clone())?;
        let mut service = InMemoryPatternService::new(model.clone());

        let report = {
            let mut ctx = HostContext::new(&self.directory, &mut service, &mut model);
            patterns::run(&mut ctx, config, Arc::new(TracingLogger))?
        };

        if settings.json {
            return settings.print_json(&report);
        }

        for application in &report.instantiation.applications {
            match &application.generated_name {
                Some(name) => println!("apply {} as {}", application.pattern_name, name),
                None => println!("apply {}", application.pattern_name),
            }
        }
        for annotation in &report.annotations {
            println!(
                "✓ {} {}::{} eventQueueSize={} transitionScanMode={}",
                annotation.name,
                config.module_name,
                config.stereotype_name,
                annotation.event_queue_size,
                annotation.scan_mode
            );
        }
        Ok(())
    }
}
