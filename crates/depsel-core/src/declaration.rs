//! Dependency declarations as they enter a resolve.

use std::fmt;

use depsel_util::errors::DepselError;

use crate::constraint::VersionConstraint;
use crate::coordinate::{ComponentSelector, ModuleId};
use crate::failure::ResolveFailure;
use crate::reason::SelectionDescriptor;

/// A single declared dependency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyMetadata {
    pub selector: ComponentSelector,
    /// Constraint-only: narrows acceptable versions without pulling the
    /// module into the graph by itself.
    pub pending: bool,
}

impl DependencyMetadata {
    pub fn new(selector: ComponentSelector) -> Self {
        Self {
            selector,
            pending: false,
        }
    }

    /// A constraint-only declaration for `selector`.
    pub fn constraint(selector: ComponentSelector) -> Self {
        Self {
            selector,
            pending: true,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Parse dependency notation.
    ///
    /// Accepts `group:name:version` (the version may be a Maven range such as
    /// `[1.0,2.0)` or a dynamic `+`), `group:name` (any version), and
    /// `project(:path)`.
    pub fn parse(notation: &str) -> Result<Self, DepselError> {
        let s = notation.trim();
        let invalid = |message: &str| DepselError::Declaration {
            input: notation.to_string(),
            message: message.to_string(),
        };

        if let Some(rest) = s.strip_prefix("project(") {
            let path = rest
                .strip_suffix(')')
                .ok_or_else(|| invalid("unclosed `project(`"))?
                .trim();
            if !path.starts_with(':') {
                return Err(invalid("project paths start with `:`"));
            }
            return Ok(Self::new(ComponentSelector::project(path)));
        }

        let mut parts = s.splitn(3, ':');
        let group = parts.next().unwrap_or_default();
        let name = parts
            .next()
            .ok_or_else(|| invalid("expected at least `group:name`"))?;
        if group.is_empty() || name.is_empty() {
            return Err(invalid("group and name must not be empty"));
        }
        let version = match parts.next() {
            Some("") => return Err(invalid("version after the last `:` is empty")),
            Some(version) => version,
            None => "",
        };
        if version.contains(':') && !version.starts_with('[') && !version.starts_with('(') {
            return Err(invalid("too many `:` separated parts"));
        }

        Ok(Self::new(ComponentSelector::module(
            ModuleId::new(group, name),
            VersionConstraint::requires(version),
        )))
    }
}

impl fmt::Display for DependencyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.pending {
            write!(f, "{} (constraint)", self.selector)
        } else {
            write!(f, "{}", self.selector)
        }
    }
}

/// A declaration plus what was attached to it before resolution: the rule
/// that altered it, if any, and a failure if it is already known to be bad.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyState {
    dependency: DependencyMetadata,
    rule_descriptor: Option<SelectionDescriptor>,
    failure: Option<ResolveFailure>,
}

impl DependencyState {
    pub fn new(dependency: DependencyMetadata) -> Self {
        Self {
            dependency,
            rule_descriptor: None,
            failure: None,
        }
    }

    pub fn with_rule(mut self, descriptor: SelectionDescriptor) -> Self {
        self.rule_descriptor = Some(descriptor);
        self
    }

    pub fn with_failure(mut self, failure: ResolveFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Parse `notation`; a malformed declaration becomes a pre-attached
    /// [`ResolveFailure::InvalidDeclaration`] on a selector for `fallback`
    /// instead of an error, so it can still be tracked through the resolve.
    pub fn from_notation(notation: &str, fallback: ModuleId) -> Self {
        match DependencyMetadata::parse(notation) {
            Ok(dependency) => Self::new(dependency),
            Err(e) => {
                let message = match e {
                    DepselError::Declaration { message, .. } => message,
                    other => other.to_string(),
                };
                Self::new(DependencyMetadata::new(ComponentSelector::module(
                    fallback,
                    VersionConstraint::default(),
                )))
                .with_failure(ResolveFailure::InvalidDeclaration {
                    selector: notation.to_string(),
                    message,
                })
            }
        }
    }

    pub fn dependency(&self) -> &DependencyMetadata {
        &self.dependency
    }

    pub fn requested(&self) -> &ComponentSelector {
        &self.dependency.selector
    }

    pub fn rule_descriptor(&self) -> Option<&SelectionDescriptor> {
        self.rule_descriptor.as_ref()
    }

    pub fn failure(&self) -> Option<&ResolveFailure> {
        self.failure.as_ref()
    }
}

impl fmt::Display for DependencyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dependency)
    }
}
