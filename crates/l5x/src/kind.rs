//! Artifact kinds and how they are laid out in a project

use serde::Serialize;

/// Where artifacts of one kind live and how they are identified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactKind {
    /// Tag of one artifact element; also the expected root discriminator value
    pub tag: &'static str,
    /// Tag of the element collecting every artifact of this kind
    pub container_tag: &'static str,
    /// Attribute holding the artifact's unique name
    pub identity_attr: &'static str,
    /// Root attribute declaring what an export file contains
    pub discriminator_attr: &'static str,
}

impl ArtifactKind {
    /// Add-On Instruction definitions in an RSLogix 5000 project
    pub const ADD_ON_INSTRUCTION: ArtifactKind = ArtifactKind {
        tag: "AddOnInstructionDefinition",
        container_tag: "AddOnInstructionDefinitions",
        identity_attr: "Name",
        discriminator_attr: "TargetType",
    };
}

impl Default for ArtifactKind {
    fn default() -> Self {
        Self::ADD_ON_INSTRUCTION
    }
}
