//! ProjectDocument - The Logix project that definitions are merged into

use serde::Serialize;
use std::path::Path;

use crate::kind::ArtifactKind;
use crate::loader::SourceArtifact;
use crate::xml::{Element, XmlDocument};
use shared::{ContainerNotFoundError, Result};

/// What a merge did to the target container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeOutcome {
    /// No definition had the artifact's name
    Inserted,
    /// A definition with the same name was removed first
    Replaced,
}

/// An open project document
///
/// Opened once, merged into any number of times, written once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDocument {
    doc: XmlDocument,
}

impl ProjectDocument {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            doc: XmlDocument::read(path)?,
        })
    }

    pub fn from_document(doc: XmlDocument) -> Self {
        Self { doc }
    }

    pub fn document(&self) -> &XmlDocument {
        &self.doc
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.doc.write(path)
    }

    /// The element collecting artifacts of `kind`
    pub fn container(&self, kind: ArtifactKind) -> Result<&Element> {
        self.doc
            .root()
            .find_first(kind.container_tag)
            .ok_or_else(|| missing_container(kind))
    }

    /// Locate an existing artifact by name anywhere in the project.
    ///
    /// Some exports declare definitions outside their canonical container,
    /// so the whole tree is searched. The first match wins.
    pub fn find_artifact(&self, kind: ArtifactKind, identity_key: &str) -> Option<&Element> {
        self.doc
            .root()
            .find_all(kind.tag)
            .into_iter()
            .find(|e| e.attribute(kind.identity_attr) == Some(identity_key))
    }

    /// Names of the artifacts held in the container, in order
    pub fn artifact_names(&self, kind: ArtifactKind) -> Result<Vec<String>> {
        Ok(self
            .container(kind)?
            .child_elements()
            .filter(|e| e.name() == kind.tag)
            .filter_map(|e| e.attribute(kind.identity_attr))
            .map(str::to_string)
            .collect())
    }

    /// Replace or insert `artifact` in its container.
    ///
    /// The first existing element with the same identity is detached from
    /// wherever it sits, then the payload is appended as the container's
    /// last child. Other elements keep their relative order, and merging the
    /// same artifact again leaves the tree unchanged.
    pub fn merge(&mut self, artifact: SourceArtifact) -> Result<MergeOutcome> {
        let kind = artifact.kind();

        // Fail before touching anything if there is nowhere to put it.
        self.container(kind)?;

        let identity_key = artifact.identity_key().to_string();
        let removed = self.doc.root_mut().remove_first(&|e| {
            e.name() == kind.tag && e.attribute(kind.identity_attr) == Some(identity_key.as_str())
        });

        let container = self
            .doc
            .root_mut()
            .find_first_mut(kind.container_tag)
            .ok_or_else(|| missing_container(kind))?;
        container.push_child(artifact.into_payload());

        Ok(match removed {
            Some(_) => MergeOutcome::Replaced,
            None => MergeOutcome::Inserted,
        })
    }
}

fn missing_container(kind: ArtifactKind) -> shared::LogixError {
    ContainerNotFoundError {
        container: kind.container_tag.to_string(),
    }
    .into()
}
