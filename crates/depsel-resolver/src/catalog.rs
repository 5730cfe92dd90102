//! In-memory resolver over a fixed catalog of published versions.
//!
//! The catalog can be built in code or loaded from TOML:
//!
//! ```toml
//! [[module]]
//! id = "org.example:lib"
//! versions = ["1.0", "1.5", "2.0"]
//! broken = ["1.5"]
//!
//! [module.dependencies]
//! "2.0" = ["org.example:util:1.0"]
//!
//! [[project]]
//! path = ":core"
//! id = "com.acme:core:0.1"
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use depsel_core::config::CatalogConfig;
use depsel_core::coordinate::{ComponentSelector, ModuleId, ModuleVersionId};
use depsel_core::declaration::DependencyMetadata;
use depsel_core::failure::ResolveFailure;
use depsel_util::errors::{DepselError, DepselResult};

use crate::component::ComponentMetadata;
use crate::id_resolver::{
    ComponentMetadataResolver, IdResolveResult, IdentifierResolver, ResolvedVersionConstraint,
};
use crate::version::MavenVersion;

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default, rename = "module")]
    modules: Vec<CatalogModule>,
    #[serde(default, rename = "project")]
    projects: Vec<CatalogProject>,
}

#[derive(Debug, Deserialize)]
struct CatalogModule {
    id: String,
    #[serde(default)]
    versions: Vec<String>,
    #[serde(default)]
    broken: Vec<String>,
    #[serde(default)]
    dependencies: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct CatalogProject {
    path: String,
    id: String,
}

#[derive(Debug, Default)]
struct ModuleEntry {
    versions: Vec<MavenVersion>,
    broken: HashSet<String>,
    dependencies: HashMap<String, Vec<DependencyMetadata>>,
}

#[derive(Debug, Default)]
pub struct CatalogResolver {
    modules: HashMap<ModuleId, ModuleEntry>,
    projects: HashMap<String, ModuleVersionId>,
    include_snapshots: bool,
}

impl CatalogResolver {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            include_snapshots: config.include_snapshots,
            ..Self::default()
        }
    }

    /// Publish `versions` of `module`.
    pub fn with_module(mut self, module: ModuleId, versions: &[&str]) -> Self {
        let entry = self.modules.entry(module).or_default();
        entry
            .versions
            .extend(versions.iter().map(|v| MavenVersion::parse(v)));
        self
    }

    /// Mark a published version as having an unreadable descriptor.
    pub fn with_broken(mut self, id: &ModuleVersionId) -> Self {
        self.modules
            .entry(id.module.clone())
            .or_default()
            .broken
            .insert(id.version.clone());
        self
    }

    pub fn with_dependency(mut self, id: &ModuleVersionId, dependency: DependencyMetadata) -> Self {
        self.modules
            .entry(id.module.clone())
            .or_default()
            .dependencies
            .entry(id.version.clone())
            .or_default()
            .push(dependency);
        self
    }

    pub fn with_project(mut self, path: impl Into<String>, id: ModuleVersionId) -> Self {
        self.projects.insert(path.into(), id);
        self
    }

    pub fn from_toml_str(content: &str, config: &CatalogConfig) -> DepselResult<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| DepselError::Config {
            message: format!("Failed to parse catalog: {e}"),
        })?;

        let mut catalog = Self::new(config);
        for module in file.modules {
            let id = ModuleId::parse(&module.id).ok_or_else(|| DepselError::Config {
                message: format!("Catalog module `{}` is not `group:name`", module.id),
            })?;
            let mut entry = ModuleEntry {
                versions: module.versions.iter().map(|v| MavenVersion::parse(v)).collect(),
                broken: module.broken.into_iter().collect(),
                dependencies: HashMap::new(),
            };
            for (version, deps) in module.dependencies {
                let parsed = deps
                    .iter()
                    .map(|d| DependencyMetadata::parse(d))
                    .collect::<Result<Vec<_>, _>>()?;
                entry.dependencies.insert(version, parsed);
            }
            catalog.modules.insert(id, entry);
        }
        for project in file.projects {
            let id = ModuleVersionId::parse(&project.id).ok_or_else(|| DepselError::Config {
                message: format!(
                    "Catalog project `{}` id `{}` is not `group:name:version`",
                    project.path, project.id
                ),
            })?;
            catalog.projects.insert(project.path, id);
        }
        Ok(catalog)
    }

    pub fn from_path(path: &Path, config: &CatalogConfig) -> DepselResult<Self> {
        let content = std::fs::read_to_string(path).map_err(DepselError::Io)?;
        Self::from_toml_str(&content, config)
    }

    fn resolve_module(
        &self,
        dependency: &DependencyMetadata,
        module: &ModuleId,
        result: &mut IdResolveResult,
    ) {
        let Some(declared) = dependency.selector.constraint() else {
            return;
        };
        let constraint = match ResolvedVersionConstraint::parse(declared) {
            Ok(c) => c,
            Err(message) => {
                result.failed(ResolveFailure::InvalidDeclaration {
                    selector: dependency.selector.to_string(),
                    message,
                });
                return;
            }
        };

        let not_found = |available: Vec<String>| ResolveFailure::NotFound {
            selector: module.to_string(),
            constraint: declared.to_string(),
            available,
        };
        let Some(entry) = self.modules.get(module) else {
            result.failed(not_found(Vec::new()));
            return;
        };

        let mut candidates = Vec::new();
        for version in &entry.versions {
            if version.is_snapshot() && constraint.is_dynamic() && !self.include_snapshots {
                continue;
            }
            if !constraint.required().matches(version) {
                continue;
            }
            if constraint.is_rejected(version) {
                result.add_rejected(version.original.clone());
                continue;
            }
            candidates.push(version);
        }

        let preferred = constraint.preferred().and_then(|p| {
            candidates
                .iter()
                .filter(|v| p.matches(v))
                .max()
                .copied()
        });
        match preferred.or_else(|| candidates.iter().max().copied()) {
            Some(version) => {
                result.resolved_id(ModuleVersionId::new(module.clone(), version.original.clone()));
                result.set_resolved_version_constraint(constraint);
            }
            None => result.failed(not_found(
                entry.versions.iter().map(|v| v.original.clone()).collect(),
            )),
        }
    }
}

impl IdentifierResolver for CatalogResolver {
    fn resolve(&self, dependency: &DependencyMetadata, result: &mut IdResolveResult) {
        match &dependency.selector {
            ComponentSelector::Module { module, .. } => {
                self.resolve_module(dependency, module, result);
            }
            ComponentSelector::Project { path } => match self.projects.get(path) {
                Some(id) => result.resolved_id(id.clone()),
                None => result.failed(ResolveFailure::not_found(
                    dependency.selector.to_string(),
                    "",
                )),
            },
        }
    }
}

impl ComponentMetadataResolver for CatalogResolver {
    fn resolve_metadata(&self, id: &ModuleVersionId) -> Result<ComponentMetadata, ResolveFailure> {
        if self.projects.values().any(|p| p == id) {
            return Ok(ComponentMetadata::new(id.clone()));
        }
        let unavailable = |message: &str| ResolveFailure::MetadataUnavailable {
            component: id.to_string(),
            message: message.to_string(),
        };
        let entry = self
            .modules
            .get(&id.module)
            .ok_or_else(|| unavailable("module is not published"))?;
        if entry.broken.contains(&id.version) {
            return Err(unavailable("descriptor could not be parsed"));
        }
        if !entry.versions.iter().any(|v| v.original == id.version) {
            return Err(unavailable("version is not published"));
        }
        Ok(ComponentMetadata {
            id: id.clone(),
            dependencies: entry.dependencies.get(&id.version).cloned().unwrap_or_default(),
        })
    }
}
