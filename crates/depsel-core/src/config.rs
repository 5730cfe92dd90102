use serde::{Deserialize, Serialize};
use std::path::Path;

use depsel_util::errors::{DepselError, DepselResult};

/// Resolve configuration, loaded from `depsel.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default)]
    pub selection: SelectionConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

/// Selector bookkeeping settings from `[selection]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default, rename = "module-reassignment")]
    pub module_reassignment: ModuleReassignment,
}

/// What happens to a module's selector set when an override moves a
/// selector to a component of another module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleReassignment {
    /// Move the selector between module sets as part of the override.
    #[default]
    Immediate,
    /// Leave the old module's set stale until an explicit reconciliation pass.
    Deferred,
}

/// Catalog resolver settings from `[catalog]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Let ranges and dynamic versions match `-SNAPSHOT` versions.
    #[serde(default, rename = "include-snapshots")]
    pub include_snapshots: bool,
}

impl ResolveConfig {
    pub const FILE_NAME: &'static str = "depsel.toml";

    pub fn from_toml_str(content: &str) -> DepselResult<Self> {
        toml::from_str(content).map_err(|e| {
            DepselError::Config {
                message: format!("Failed to parse resolve config: {e}"),
            }
            .into()
        })
    }

    pub fn from_path(path: &Path) -> DepselResult<Self> {
        let content = std::fs::read_to_string(path).map_err(DepselError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load `depsel.toml` from `dir`, or return defaults if the file doesn't exist.
    pub fn load_or_default(dir: &Path) -> DepselResult<Self> {
        let path = dir.join(Self::FILE_NAME);
        if path.is_file() {
            tracing::debug!("Loading resolve config from {}", path.display());
            Self::from_path(&path)
        } else {
            Ok(Self::default())
        }
    }
}
