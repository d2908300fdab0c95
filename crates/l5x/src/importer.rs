//! AoiImporter - Merge every AOI export in a directory into one project

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::loader::{ArtifactLoader, LoadOutcome, SkipReason};
use crate::project::{MergeOutcome, ProjectDocument};
use shared::{files_with_extension, AoiImportConfig, Logger, Result};

/// One definition merged into the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedArtifact {
    pub path: PathBuf,
    pub name: String,
    pub outcome: MergeOutcome,
}

/// One file passed over
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: SkipReason,
}

/// Summary of an import run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub output: Option<PathBuf>,
    pub merged: Vec<MergedArtifact>,
    pub skipped: Vec<SkippedFile>,
    pub generated_at: DateTime<Utc>,
}

impl ImportReport {
    fn new() -> Self {
        Self {
            output: None,
            merged: Vec::new(),
            skipped: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn replaced_count(&self) -> usize {
        self.merged
            .iter()
            .filter(|m| m.outcome == MergeOutcome::Replaced)
            .count()
    }
}

/// Batch importer for AOI export files
pub struct AoiImporter {
    config: AoiImportConfig,
    loader: ArtifactLoader,
    logger: Arc<dyn Logger>,
}

impl AoiImporter {
    /// Create a new AoiImporter
    pub fn new(logger: Arc<dyn Logger>, config: AoiImportConfig) -> Self {
        Self {
            config,
            loader: ArtifactLoader::default(),
            logger,
        }
    }

    /// Candidate files in `dir`, sorted by path.
    ///
    /// The extension match is case-sensitive, as Logix writes it.
    pub fn candidate_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        files_with_extension(dir, &self.config.extension)
    }

    /// Merge every loadable file in `dir` into `project`.
    ///
    /// Skippable files are recorded and logged; any other failure aborts.
    pub fn import_directory(&self, project: &mut ProjectDocument, dir: &Path) -> Result<ImportReport> {
        let mut report = ImportReport::new();

        for path in self.candidate_files(dir)? {
            match self.loader.load_file(&path)? {
                LoadOutcome::Loaded(artifact) => {
                    let name = artifact.identity_key().to_string();
                    let outcome = project.merge(artifact)?;

                    let mut meta = HashMap::new();
                    meta.insert("file".to_string(), path.display().to_string());
                    self.logger.info(
                        &format!("Merged AOI '{}' ({:?})", name, outcome),
                        Some(&meta),
                    );

                    report.merged.push(MergedArtifact { path, name, outcome });
                }
                LoadOutcome::Skipped(reason) => {
                    self.logger.warn(
                        &format!("Skipping '{}': {}", path.display(), reason),
                        None,
                    );
                    report.skipped.push(SkippedFile { path, reason });
                }
            }
        }

        Ok(report)
    }

    /// Open the input project in `dir`, merge the directory into it, and
    /// write the output project. Nothing is written unless every merge
    /// succeeded.
    pub fn run(&self, dir: &Path) -> Result<ImportReport> {
        let input = dir.join(&self.config.input_project);
        let output = dir.join(&self.config.output_project);

        self.logger.info(&format!("Opening project '{}'", input.display()), None);
        let mut project = ProjectDocument::open(&input)?;

        let mut report = self.import_directory(&mut project, dir)?;

        project.save(&output)?;
        self.logger.info(
            &format!(
                "Wrote '{}' ({} merged, {} skipped)",
                output.display(),
                report.merged.len(),
                report.skipped.len()
            ),
            None,
        );

        report.output = Some(output);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::NullLogger;

    fn importer() -> AoiImporter {
        AoiImporter::new(Arc::new(NullLogger), AoiImportConfig::default())
    }

    #[test]
    fn test_candidate_files_filters_by_exact_extension() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.L5X", "a.L5X", "c.l5x", "notes.txt", "d.L5X.bak"] {
            std::fs::write(dir.path().join(name), "<x/>").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.L5X")).unwrap();

        let files: Vec<String> = importer()
            .candidate_files(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(files, vec!["a.L5X", "b.L5X"]);
    }

    #[test]
    fn test_candidate_files_in_directory_with_glob_characters() {
        let dir = tempfile::tempdir().unwrap();
        let odd = dir.path().join("[plant]");
        std::fs::create_dir(&odd).unwrap();
        std::fs::write(odd.join("a.L5X"), "<x/>").unwrap();

        assert_eq!(importer().candidate_files(&odd).unwrap().len(), 1);
    }

    #[test]
    fn test_replaced_count() {
        let mut report = ImportReport::new();
        report.merged.push(MergedArtifact {
            path: PathBuf::from("a.L5X"),
            name: "A".to_string(),
            outcome: MergeOutcome::Replaced,
        });
        report.merged.push(MergedArtifact {
            path: PathBuf::from("b.L5X"),
            name: "B".to_string(),
            outcome: MergeOutcome::Inserted,
        });
        assert_eq!(report.replaced_count(), 1);
    }
}
