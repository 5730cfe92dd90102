use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constraint::VersionConstraint;

/// The identity shared by all versions of a dependency (`group:name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    pub group: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Parse `"group:name"` into a module id.
    pub fn parse(s: &str) -> Option<Self> {
        let (group, name) = s.split_once(':')?;
        if group.is_empty() || name.is_empty() || name.contains(':') {
            return None;
        }
        Some(Self::new(group, name))
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// One concrete version of a module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleVersionId {
    pub module: ModuleId,
    pub version: String,
}

impl ModuleVersionId {
    pub fn new(module: ModuleId, version: impl Into<String>) -> Self {
        Self {
            module,
            version: version.into(),
        }
    }

    /// Parse `"group:name:version"` into coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() == 3 && parts.iter().all(|p| !p.is_empty()) {
            Some(Self::new(ModuleId::new(parts[0], parts[1]), parts[2]))
        } else {
            None
        }
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.version)
    }
}

/// What a declaration asks for before any resolution happens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ComponentSelector {
    /// A module from a repository, narrowed by a version constraint.
    Module {
        module: ModuleId,
        #[serde(default)]
        constraint: VersionConstraint,
    },
    /// Another project of the same build, addressed by its path (e.g. `:core`).
    Project { path: String },
}

impl ComponentSelector {
    pub fn module(module: ModuleId, constraint: VersionConstraint) -> Self {
        Self::Module { module, constraint }
    }

    pub fn project(path: impl Into<String>) -> Self {
        Self::Project { path: path.into() }
    }

    /// The module this selector names directly, if it names one.
    pub fn module_id(&self) -> Option<&ModuleId> {
        match self {
            Self::Module { module, .. } => Some(module),
            Self::Project { .. } => None,
        }
    }

    pub fn constraint(&self) -> Option<&VersionConstraint> {
        match self {
            Self::Module { constraint, .. } => Some(constraint),
            Self::Project { .. } => None,
        }
    }
}

impl fmt::Display for ComponentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module { module, constraint } if constraint.requires.is_empty() => {
                write!(f, "{module}")
            }
            Self::Module { module, constraint } => write!(f, "{module}:{}", constraint.requires),
            Self::Project { path } => write!(f, "project {path}"),
        }
    }
}
