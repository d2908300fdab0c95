//! ArtifactLoader - Extract a portable definition from an export file

use serde::Serialize;
use std::fmt;
use std::path::Path;

use crate::kind::ArtifactKind;
use crate::xml::{Element, XmlDocument};
use shared::Result;

/// A definition lifted out of one export file
///
/// Owns a detached copy of its subtree, so the source document can be
/// dropped as soon as loading finishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceArtifact {
    kind: ArtifactKind,
    identity_key: String,
    payload: Element,
}

impl SourceArtifact {
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    pub fn payload(&self) -> &Element {
        &self.payload
    }

    pub fn into_payload(self) -> Element {
        self.payload
    }
}

/// Why a file was passed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "reason")]
pub enum SkipReason {
    /// The root declares some other kind of content, or none at all
    WrongArtifactKind { found: Option<String> },
    /// The root declares the kind but holds no definition element
    MissingDefinition,
    /// The definition has no identity attribute
    MissingIdentity,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::WrongArtifactKind { found: Some(found) } => {
                write!(f, "wrong artifact kind '{}'", found)
            }
            SkipReason::WrongArtifactKind { found: None } => write!(f, "no artifact kind declared"),
            SkipReason::MissingDefinition => write!(f, "no definition element"),
            SkipReason::MissingIdentity => write!(f, "definition has no name"),
        }
    }
}

/// Result of loading one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(SourceArtifact),
    Skipped(SkipReason),
}

/// Loads artifacts of one kind from export documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactLoader {
    kind: ArtifactKind,
}

impl ArtifactLoader {
    pub fn new(kind: ArtifactKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Read and classify one file.
    ///
    /// Unreadable or malformed files are errors; files that are simply
    /// something else come back as `Skipped`.
    pub fn load_file(&self, path: &Path) -> Result<LoadOutcome> {
        let doc = XmlDocument::read(path)?;
        Ok(self.load_document(&doc))
    }

    /// The name is taken as written; identifier rules are not checked here.
    pub fn load_document(&self, doc: &XmlDocument) -> LoadOutcome {
        let declared = doc.root().attribute(self.kind.discriminator_attr);
        if declared != Some(self.kind.tag) {
            return LoadOutcome::Skipped(SkipReason::WrongArtifactKind {
                found: declared.map(str::to_string),
            });
        }

        let Some(definition) = doc.root().find_first(self.kind.tag) else {
            return LoadOutcome::Skipped(SkipReason::MissingDefinition);
        };

        let Some(name) = definition.attribute(self.kind.identity_attr) else {
            return LoadOutcome::Skipped(SkipReason::MissingIdentity);
        };

        LoadOutcome::Loaded(SourceArtifact {
            kind: self.kind,
            identity_key: name.to_string(),
            payload: definition.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn export(target_type: &str, body: &str) -> XmlDocument {
        let source = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<RSLogix5000Content SchemaRevision="1.0" TargetType="{}" ContainsContext="true">
<Controller Use="Context" Name="ctx">
<DataTypes Use="Context"/>
{}
</Controller>
</RSLogix5000Content>"#,
            target_type, body
        );
        XmlDocument::parse_str(&source).unwrap()
    }

    #[test]
    fn test_load_aoi_definition() {
        let doc = export(
            "AddOnInstructionDefinition",
            r#"<AddOnInstructionDefinitions Use="Context">
<AddOnInstructionDefinition Name="Motor_dual" Use="Target"><Parameters/></AddOnInstructionDefinition>
<AddOnInstructionDefinition Name="Helper" Use="Context"/>
</AddOnInstructionDefinitions>"#,
        );

        let outcome = ArtifactLoader::default().load_document(&doc);
        let LoadOutcome::Loaded(artifact) = outcome else {
            panic!("expected an artifact, got {:?}", outcome);
        };

        assert_eq!(artifact.identity_key(), "Motor_dual");
        assert_eq!(artifact.kind(), ArtifactKind::ADD_ON_INSTRUCTION);
        assert_eq!(artifact.payload().attribute("Use"), Some("Target"));
        assert!(artifact.payload().find_first("Parameters").is_some());
    }

    #[test]
    fn test_payload_outlives_source() {
        let doc = export(
            "AddOnInstructionDefinition",
            r#"<AddOnInstructionDefinitions><AddOnInstructionDefinition Name="Valve"/></AddOnInstructionDefinitions>"#,
        );
        let outcome = ArtifactLoader::default().load_document(&doc);
        drop(doc);

        let LoadOutcome::Loaded(artifact) = outcome else {
            panic!("expected an artifact");
        };
        assert_eq!(artifact.into_payload().attribute("Name"), Some("Valve"));
    }

    #[test]
    fn test_wrong_kind_is_skipped() {
        let doc = export("Controller", "");
        assert_eq!(
            ArtifactLoader::default().load_document(&doc),
            LoadOutcome::Skipped(SkipReason::WrongArtifactKind {
                found: Some("Controller".to_string())
            })
        );

        let doc = XmlDocument::parse_str("<RSLogix5000Content/>").unwrap();
        assert_eq!(
            ArtifactLoader::default().load_document(&doc),
            LoadOutcome::Skipped(SkipReason::WrongArtifactKind { found: None })
        );
    }

    #[test]
    fn test_discriminator_is_case_sensitive() {
        let doc = export("addoninstructiondefinition", "");
        assert!(matches!(
            ArtifactLoader::default().load_document(&doc),
            LoadOutcome::Skipped(SkipReason::WrongArtifactKind { .. })
        ));
    }

    #[test]
    fn test_missing_definition_or_name_is_skipped() {
        let doc = export("AddOnInstructionDefinition", "<AddOnInstructionDefinitions/>");
        assert_eq!(
            ArtifactLoader::default().load_document(&doc),
            LoadOutcome::Skipped(SkipReason::MissingDefinition)
        );

        let doc = export(
            "AddOnInstructionDefinition",
            "<AddOnInstructionDefinitions><AddOnInstructionDefinition/></AddOnInstructionDefinitions>",
        );
        assert_eq!(
            ArtifactLoader::default().load_document(&doc),
            LoadOutcome::Skipped(SkipReason::MissingIdentity)
        );
    }

    #[test]
    fn test_name_outside_identifier_rules_still_loads() {
        for name in ["Motor_", "foo__bar", "_123456789012345678901234567890123456789X"] {
            let doc = export(
                "AddOnInstructionDefinition",
                &format!(
                    r#"<AddOnInstructionDefinitions><AddOnInstructionDefinition Name="{}"/></AddOnInstructionDefinitions>"#,
                    name
                ),
            );
            let outcome = ArtifactLoader::default().load_document(&doc);
            let LoadOutcome::Loaded(artifact) = outcome else {
                panic!("{:?} was not loaded: {:?}", name, outcome);
            };
            assert_eq!(artifact.identity_key(), name);
        }
    }

    #[test]
    fn test_load_file_rejects_malformed_xml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.L5X");
        std::fs::write(&path, "<RSLogix5000Content TargetType=\"AddOnInstructionDefinition\">").unwrap();

        assert!(ArtifactLoader::default().load_file(&path).is_err());
        assert!(ArtifactLoader::default().load_file(&dir.path().join("absent.L5X")).is_err());
    }

    #[test]
    fn test_skip_reason_display() {
        let reason = SkipReason::WrongArtifactKind {
            found: Some("DataType".to_string()),
        };
        assert_eq!(reason.to_string(), "wrong artifact kind 'DataType'");
    }
}
