//! In-Memory Host Implementations
//!
//! Simple in-memory implementations of the host ports.
//! Useful for testing and for dry runs outside the modeling tool.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::host::{
    ElementId, ModelRepository, PackageRef, ParamValue, PatternParams, PatternService,
    StateMachineRef, NAME_PARAM,
};
use shared::{LogixError, Result};

type PropertyKey = (ElementId, String, String, String);

#[derive(Debug, Default)]
struct ModelState {
    next_id: u64,
    packages: Vec<PackageRef>,
    state_machines: Vec<(StateMachineRef, ElementId)>,
    stereotypes: BTreeSet<(ElementId, String, String)>,
    properties: BTreeMap<PropertyKey, String>,
    property_writes: Vec<PropertyKey>,
}

impl ModelState {
    fn allocate_id(&mut self, prefix: &str) -> ElementId {
        self.next_id += 1;
        ElementId::new(format!("{}-{:04}", prefix, self.next_id))
    }
}

/// In-memory model repository
///
/// Clones share the same model, so a pattern service can create elements
/// that the repository then sees.
#[derive(Debug, Clone, Default)]
pub struct InMemoryModel {
    state: Arc<RwLock<ModelState>>,
}

impl InMemoryModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, ModelState>> {
        self.state
            .read()
            .map_err(|_| LogixError::Host("Failed to acquire read lock".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, ModelState>> {
        self.state
            .write()
            .map_err(|_| LogixError::Host("Failed to acquire write lock".to_string()))
    }

    /// Add a package to the model
    pub fn add_package(&self, name: impl Into<String>) -> Result<PackageRef> {
        let mut state = self.write()?;
        let package = PackageRef {
            id: state.allocate_id("pkg"),
            name: name.into(),
        };
        state.packages.push(package.clone());
        Ok(package)
    }

    /// Add a state machine owned by `package`
    pub fn add_state_machine(&self, package: &ElementId, name: impl Into<String>) -> Result<ElementId> {
        let mut state = self.write()?;
        if !state.packages.iter().any(|p| &p.id == package) {
            return Err(LogixError::Host(format!("Unknown package: {}", package)));
        }

        let id = state.allocate_id("sm");
        state.state_machines.push((
            StateMachineRef {
                id: id.clone(),
                name: name.into(),
            },
            package.clone(),
        ));
        Ok(id)
    }

    /// Names of the state machines owned by `package`, in creation order
    pub fn state_machine_names_in(&self, package: &ElementId) -> Result<Vec<String>> {
        Ok(self
            .read()?
            .state_machines
            .iter()
            .filter(|(_, owner)| owner == package)
            .map(|(sm, _)| sm.name.clone())
            .collect())
    }

    /// Stereotypes applied to `element`, as (module, stereotype) pairs
    pub fn stereotypes_of(&self, element: &ElementId) -> Result<Vec<(String, String)>> {
        Ok(self
            .read()?
            .stereotypes
            .iter()
            .filter(|(id, _, _)| id == element)
            .map(|(_, module, stereotype)| (module.clone(), stereotype.clone()))
            .collect())
    }

    /// How many times `key` was written on `element`
    pub fn property_write_count(&self, element: &ElementId, key: &str) -> Result<usize> {
        Ok(self
            .read()?
            .property_writes
            .iter()
            .filter(|(id, _, _, k)| id == element && k == key)
            .count())
    }
}

impl ModelRepository for InMemoryModel {
    fn packages(&self) -> Result<Vec<PackageRef>> {
        Ok(self.read()?.packages.clone())
    }

    fn state_machines(&self) -> Result<Vec<StateMachineRef>> {
        Ok(self
            .read()?
            .state_machines
            .iter()
            .map(|(sm, _)| sm.clone())
            .collect())
    }

    fn add_stereotype(&mut self, element: &ElementId, module: &str, stereotype: &str) -> Result<()> {
        self.write()?
            .stereotypes
            .insert((element.clone(), module.to_string(), stereotype.to_string()));
        Ok(())
    }

    fn set_property(
        &mut self,
        element: &ElementId,
        module: &str,
        stereotype: &str,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let mut state = self.write()?;
        let has_stereotype = state.stereotypes.contains(&(
            element.clone(),
            module.to_string(),
            stereotype.to_string(),
        ));
        if !has_stereotype {
            return Err(LogixError::Host(format!(
                "Element {} has no {}::{} stereotype",
                element, module, stereotype
            )));
        }

        let property = (
            element.clone(),
            module.to_string(),
            stereotype.to_string(),
            key.to_string(),
        );
        state.properties.insert(property.clone(), value.to_string());
        state.property_writes.push(property);
        Ok(())
    }

    fn property(
        &self,
        element: &ElementId,
        module: &str,
        stereotype: &str,
        key: &str,
    ) -> Result<Option<String>> {
        let property = (
            element.clone(),
            module.to_string(),
            stereotype.to_string(),
            key.to_string(),
        );
        Ok(self.read()?.properties.get(&property).cloned())
    }
}

/// One recorded pattern application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedPattern {
    pub pattern_name: String,
    pub params: PatternParams,
}

/// In-memory pattern catalog
///
/// Applying a pattern creates one state machine in the bound package,
/// named by the `$(name)` parameter when given, else by the pattern.
#[derive(Debug, Clone)]
pub struct InMemoryPatternService {
    model: InMemoryModel,
    catalog: BTreeMap<String, PathBuf>,
    registrations: Vec<PathBuf>,
    applied: Vec<AppliedPattern>,
}

impl InMemoryPatternService {
    pub fn new(model: InMemoryModel) -> Self {
        Self {
            model,
            catalog: BTreeMap::new(),
            registrations: Vec::new(),
            applied: Vec::new(),
        }
    }

    /// Every `add_pattern` call, in order
    pub fn registrations(&self) -> &[PathBuf] {
        &self.registrations
    }

    /// Every `apply_pattern` call, in order
    pub fn applied(&self) -> &[AppliedPattern] {
        &self.applied
    }
}

impl PatternService for InMemoryPatternService {
    fn add_pattern(&mut self, path: &Path) -> Result<()> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| LogixError::Host(format!("Bad pattern path: {}", path.display())))?;

        self.catalog.insert(name.to_string(), path.to_path_buf());
        self.registrations.push(path.to_path_buf());
        Ok(())
    }

    fn apply_pattern(&mut self, pattern_name: &str, params: &PatternParams) -> Result<()> {
        if !self.catalog.contains_key(pattern_name) {
            return Err(LogixError::Host(format!(
                "Pattern '{}' is not in the catalog",
                pattern_name
            )));
        }

        let package = match params.get(pattern_name) {
            Some(ParamValue::Package(package)) => package,
            _ => {
                return Err(LogixError::Host(format!(
                    "Pattern '{}' has no target package bound",
                    pattern_name
                )))
            }
        };

        let name = match params.get(NAME_PARAM) {
            Some(ParamValue::Text(name)) => name.clone(),
            _ => pattern_name.to_string(),
        };

        self.model.add_state_machine(&package.id, name)?;
        self.applied.push(AppliedPattern {
            pattern_name: pattern_name.to_string(),
            params: params.clone(),
        });
        Ok(())
    }
}
