//! Pattern pipeline - Instantiate, then annotate

use serde::Serialize;
use std::sync::Arc;

use crate::annotate::{Annotation, AnnotationWriter};
use crate::host::HostContext;
use crate::instantiate::{InstantiationReport, PatternImporter};
use shared::{Logger, PatternConfig, Result};

/// Summary of a full pattern run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRunReport {
    pub instantiation: InstantiationReport,
    pub annotations: Vec<Annotation>,
}

/// Apply every workspace pattern, then annotate every state machine.
///
/// Model changes are made in place; saving them is up to the host. A
/// failure part way leaves whatever was already applied.
pub fn run(
    ctx: &mut HostContext<'_>,
    config: &PatternConfig,
    logger: Arc<dyn Logger>,
) -> Result<PatternRunReport> {
    let importer = PatternImporter::new(logger.clone(), config.clone());
    let instantiation = importer.import_patterns(ctx)?;

    let writer = AnnotationWriter::new(logger, config);
    let annotations = writer.annotate_all(&mut *ctx.repository)?;

    Ok(PatternRunReport {
        instantiation,
        annotations,
    })
}
