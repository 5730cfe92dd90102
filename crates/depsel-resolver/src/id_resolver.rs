//! Boundary to the code that turns a declaration into a component id, and
//! to the code that fetches a component's metadata.

use std::fmt;

use depsel_core::constraint::VersionConstraint;
use depsel_core::coordinate::ModuleVersionId;
use depsel_core::declaration::DependencyMetadata;
use depsel_core::failure::ResolveFailure;
use depsel_core::reason::SelectionDescriptor;

use crate::component::ComponentMetadata;
use crate::version::{MavenVersion, VersionSelector};

/// Resolves a declaration to a concrete component id.
///
/// Implementations report through `result`: either an id (optionally with
/// metadata and a resolved constraint) or a failure. They may replace the
/// selection description, which starts as "requested", or as "constraint"
/// for constraint-only declarations.
pub trait IdentifierResolver {
    fn resolve(&self, dependency: &DependencyMetadata, result: &mut IdResolveResult);
}

/// Fetches the descriptor for a resolved component id.
pub trait ComponentMetadataResolver {
    fn resolve_metadata(&self, id: &ModuleVersionId) -> Result<ComponentMetadata, ResolveFailure>;
}

/// Outcome of one identifier resolution, filled in by an [`IdentifierResolver`].
#[derive(Debug, Clone)]
pub struct IdResolveResult {
    id: Option<ModuleVersionId>,
    metadata: Option<ComponentMetadata>,
    failure: Option<ResolveFailure>,
    selection_description: SelectionDescriptor,
    version_constraint: Option<ResolvedVersionConstraint>,
    rejected: Vec<String>,
}

impl Default for IdResolveResult {
    fn default() -> Self {
        Self {
            id: None,
            metadata: None,
            failure: None,
            selection_description: SelectionDescriptor::requested(),
            version_constraint: None,
            rejected: Vec::new(),
        }
    }
}

impl IdResolveResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark as resolved to `id`, without metadata.
    pub fn resolved_id(&mut self, id: ModuleVersionId) {
        self.failure = None;
        self.metadata = None;
        self.id = Some(id);
    }

    /// Mark as resolved to the component described by `metadata`.
    pub fn resolved(&mut self, metadata: ComponentMetadata) {
        self.failure = None;
        self.id = Some(metadata.id.clone());
        self.metadata = Some(metadata);
    }

    pub fn failed(&mut self, failure: ResolveFailure) {
        self.id = None;
        self.metadata = None;
        self.failure = Some(failure);
    }

    pub fn set_selection_description(&mut self, description: SelectionDescriptor) {
        self.selection_description = description;
    }

    pub fn set_resolved_version_constraint(&mut self, constraint: ResolvedVersionConstraint) {
        self.version_constraint = Some(constraint);
    }

    /// Note a version that existed but was excluded by the constraint.
    pub fn add_rejected(&mut self, version: impl Into<String>) {
        self.rejected.push(version.into());
    }

    pub fn module_version_id(&self) -> Option<&ModuleVersionId> {
        self.id.as_ref()
    }

    pub fn metadata(&self) -> Option<&ComponentMetadata> {
        self.metadata.as_ref()
    }

    pub fn failure(&self) -> Option<&ResolveFailure> {
        self.failure.as_ref()
    }

    pub fn selection_description(&self) -> &SelectionDescriptor {
        &self.selection_description
    }

    pub fn resolved_version_constraint(&self) -> Option<&ResolvedVersionConstraint> {
        self.version_constraint.as_ref()
    }

    pub fn rejected(&self) -> &[String] {
        &self.rejected
    }

    /// True once the resolver has produced an id or a failure.
    pub fn has_result(&self) -> bool {
        self.id.is_some() || self.failure.is_some()
    }
}

/// A [`VersionConstraint`] with each version string parsed into a selector.
#[derive(Debug, Clone)]
pub struct ResolvedVersionConstraint {
    required: VersionSelector,
    preferred: Option<VersionSelector>,
    rejected: Vec<VersionSelector>,
}

impl ResolvedVersionConstraint {
    /// Parse a declared constraint. Fails with a message naming the bad part.
    pub fn parse(constraint: &VersionConstraint) -> Result<Self, String> {
        let parse = |notation: &str| {
            VersionSelector::parse(notation).ok_or_else(|| format!("malformed version `{notation}`"))
        };
        Ok(Self {
            required: parse(constraint.requires.as_str())?,
            preferred: constraint.prefers.as_deref().map(parse).transpose()?,
            rejected: constraint
                .rejects
                .iter()
                .map(|r| parse(r.as_str()))
                .collect::<Result<_, _>>()?,
        })
    }

    pub fn required(&self) -> &VersionSelector {
        &self.required
    }

    pub fn preferred(&self) -> Option<&VersionSelector> {
        self.preferred.as_ref()
    }

    pub fn rejected(&self) -> &[VersionSelector] {
        &self.rejected
    }

    pub fn is_rejected(&self, version: &MavenVersion) -> bool {
        self.rejected.iter().any(|r| r.matches(version))
    }

    /// Matches the required selector and no rejected one.
    pub fn accepts(&self, version: &MavenVersion) -> bool {
        self.required.matches(version) && !self.is_rejected(version)
    }

    pub fn is_dynamic(&self) -> bool {
        self.required.is_dynamic()
    }
}

impl fmt::Display for ResolvedVersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.required)?;
        if let Some(ref preferred) = self.preferred {
            write!(f, " (prefer {preferred})")?;
        }
        for rejected in &self.rejected {
            write!(f, " (reject {rejected})")?;
        }
        Ok(())
    }
}
