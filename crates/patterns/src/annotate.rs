//! AnnotationWriter - Stamp generation metadata onto every state machine

use serde::Serialize;
use std::sync::Arc;

use crate::host::{ModelRepository, StateMachineRef};
use crate::stereotype::{StereotypeScope, EVENT_QUEUE_SIZE_KEY, TRANSITION_SCAN_MODE_KEY};
use shared::{Logger, PatternConfig, Result, ScanMode};

/// Metadata written to one state machine
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    pub name: String,
    pub event_queue_size: u32,
    pub scan_mode: ScanMode,
}

/// Applies the AOI stereotype and its properties to state machines
///
/// The scan mode comes from each machine's own name, read after the
/// configured multiplicity marker, so machines that were not generated from
/// a pattern are handled the same way.
pub struct AnnotationWriter {
    scope: StereotypeScope,
    event_queue_size: u32,
    separator: char,
    logger: Arc<dyn Logger>,
}

impl AnnotationWriter {
    /// Create a new AnnotationWriter
    pub fn new(logger: Arc<dyn Logger>, config: &PatternConfig) -> Self {
        Self {
            scope: StereotypeScope::new(&config.module_name, &config.stereotype_name),
            event_queue_size: config.event_queue_size,
            separator: config.multiplicity_marker,
            logger,
        }
    }

    pub fn scope(&self) -> &StereotypeScope {
        &self.scope
    }

    /// Annotate every state machine in the repository.
    ///
    /// Safe to run repeatedly: stereotype and property assignment overwrite.
    pub fn annotate_all(&self, repository: &mut dyn ModelRepository) -> Result<Vec<Annotation>> {
        let machines = repository.state_machines()?;
        let mut annotations = Vec::with_capacity(machines.len());

        for machine in &machines {
            annotations.push(self.annotate(repository, machine)?);
        }

        self.logger.info(
            &format!("Annotated {} state machines", annotations.len()),
            None,
        );
        Ok(annotations)
    }

    /// Annotate a single state machine
    pub fn annotate(
        &self,
        repository: &mut dyn ModelRepository,
        machine: &StateMachineRef,
    ) -> Result<Annotation> {
        let StereotypeScope { module, stereotype } = &self.scope;
        let scan_mode = ScanMode::from_name_with(&machine.name, self.separator);

        repository.add_stereotype(&machine.id, module, stereotype)?;
        repository.set_property(
            &machine.id,
            module,
            stereotype,
            EVENT_QUEUE_SIZE_KEY,
            &self.event_queue_size.to_string(),
        )?;
        repository.set_property(
            &machine.id,
            module,
            stereotype,
            TRANSITION_SCAN_MODE_KEY,
            scan_mode.token(),
        )?;

        self.logger.debug(
            &format!("State machine '{}': scan mode {}", machine.name, scan_mode),
            None,
        );

        Ok(Annotation {
            name: machine.name.clone(),
            event_queue_size: self.event_queue_size,
            scan_mode,
        })
    }
}
