//! PatternImporter - Register and apply every pattern in the workspace

use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::host::{
    HostContext, ModelRepository, PackageRef, ParamValue, PatternParams, NAME_PARAM,
};
use shared::{files_with_extension, Logger, PatternConfig, Result, ScanMode, TargetPackageError};

/// One planned or performed pattern application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternApplication {
    pub pattern_name: String,
    /// Name given to this variant, for patterns applied once per scan mode
    pub generated_name: Option<String>,
    #[serde(skip)]
    pub params: PatternParams,
}

/// Summary of the instantiation pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstantiationReport {
    pub target_package: Option<String>,
    pub registered: Vec<PathBuf>,
    pub applications: Vec<PatternApplication>,
}

/// Applies workspace patterns into the single user package
pub struct PatternImporter {
    config: PatternConfig,
    logger: Arc<dyn Logger>,
}

impl PatternImporter {
    /// Create a new PatternImporter
    pub fn new(logger: Arc<dyn Logger>, config: PatternConfig) -> Self {
        Self { config, logger }
    }

    /// Pattern definition files in `dir`, sorted by path
    pub fn pattern_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        files_with_extension(dir, &self.config.extension)
    }

    /// The one package that is not the host's predefined primitive package.
    ///
    /// Zero or several candidates is a configuration error.
    pub fn select_target_package(&self, repository: &dyn ModelRepository) -> Result<PackageRef> {
        let mut candidates: Vec<PackageRef> = repository
            .packages()?
            .into_iter()
            .filter(|p| p.name != self.config.primitive_package)
            .collect();

        if candidates.len() != 1 {
            return Err(TargetPackageError {
                candidates: candidates.into_iter().map(|p| p.name).collect(),
            }
            .into());
        }

        Ok(candidates.remove(0))
    }

    /// Pattern name for a definition file: the file name without extension
    pub fn pattern_name(path: &Path) -> Option<&str> {
        path.file_stem().and_then(|s| s.to_str())
    }

    /// Applications needed for one pattern.
    ///
    /// A name ending in the multiplicity marker is applied once per scan
    /// mode, each variant named `<pattern><mode>`. The marker doubles as the
    /// suffix separator, so `Motor_` yields `Motor_single`, `Motor_dual` and
    /// `Motor_sequential`, and the annotation pass reads the mode back.
    pub fn plan(&self, pattern_name: &str, package: &PackageRef) -> Vec<PatternApplication> {
        let mut base = PatternParams::new();
        base.insert(pattern_name.to_string(), ParamValue::Package(package.clone()));

        if !pattern_name.ends_with(self.config.multiplicity_marker) {
            return vec![PatternApplication {
                pattern_name: pattern_name.to_string(),
                generated_name: None,
                params: base,
            }];
        }

        ScanMode::ALL
            .iter()
            .map(|mode| {
                let name = format!("{}{}", pattern_name, mode.token());
                let mut params = base.clone();
                params.insert(NAME_PARAM.to_string(), ParamValue::Text(name.clone()));
                PatternApplication {
                    pattern_name: pattern_name.to_string(),
                    generated_name: Some(name),
                    params,
                }
            })
            .collect()
    }

    /// Register and apply every pattern file in the workspace
    pub fn import_patterns(&self, ctx: &mut HostContext<'_>) -> Result<InstantiationReport> {
        let package = self.select_target_package(&*ctx.repository)?;
        self.logger.info(&format!("Target package: '{}'", package.name), None);

        let mut report = InstantiationReport {
            target_package: Some(package.name.clone()),
            ..Default::default()
        };

        for path in self.pattern_files(&ctx.workspace)? {
            let Some(pattern_name) = Self::pattern_name(&path) else {
                self.logger.warn(
                    &format!("Skipping pattern with non UTF-8 name: {}", path.display()),
                    None,
                );
                continue;
            };

            ctx.patterns.add_pattern(&path)?;

            for application in self.plan(pattern_name, &package) {
                ctx.patterns
                    .apply_pattern(&application.pattern_name, &application.params)?;

                let mut meta = HashMap::new();
                meta.insert("file".to_string(), path.display().to_string());
                self.logger.info(
                    &format!(
                        "Applied pattern '{}'{}",
                        application.pattern_name,
                        application
                            .generated_name
                            .as_deref()
                            .map(|n| format!(" as '{}'", n))
                            .unwrap_or_default()
                    ),
                    Some(&meta),
                );

                report.applications.push(application);
            }

            report.registered.push(path);
        }

        Ok(report)
    }
}
