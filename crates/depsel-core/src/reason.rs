//! Selection causes and the per-component reason ledger.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of influence that contributed to a version being selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionCause {
    Root,
    Requested,
    Constraint,
    Forced,
    ConflictResolution,
    SelectedByRule,
    CompositeBuild,
    Rejection,
    ByAncestor,
}

impl SelectionCause {
    pub fn default_description(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Requested => "requested",
            Self::Constraint => "constraint",
            Self::Forced => "forced",
            Self::ConflictResolution => "conflict resolution",
            Self::SelectedByRule => "selected by rule",
            Self::CompositeBuild => "composite build substitution",
            Self::Rejection => "rejection",
            Self::ByAncestor => "by ancestor",
        }
    }
}

/// A single cause, optionally carrying a custom description
/// (e.g. which rule forced the version).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionDescriptor {
    cause: SelectionCause,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl SelectionDescriptor {
    pub fn new(cause: SelectionCause) -> Self {
        Self {
            cause,
            description: None,
        }
    }

    pub fn requested() -> Self {
        Self::new(SelectionCause::Requested)
    }

    pub fn constraint() -> Self {
        Self::new(SelectionCause::Constraint)
    }

    pub fn conflict_resolution() -> Self {
        Self::new(SelectionCause::ConflictResolution)
    }

    /// Descriptor for a declaration that a named rule altered.
    pub fn by_rule(description: impl Into<String>) -> Self {
        Self::new(SelectionCause::SelectedByRule).with_description(description)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn cause(&self) -> SelectionCause {
        self.cause
    }

    pub fn description(&self) -> &str {
        self.description
            .as_deref()
            .unwrap_or_else(|| self.cause.default_description())
    }
}

impl fmt::Display for SelectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Ordered explanation of why a component version was chosen, or why
/// choosing one failed. Entries keep insertion order; equal descriptors
/// contributed by different selectors are kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionReason {
    descriptors: Vec<SelectionDescriptor>,
}

impl SelectionReason {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of(descriptor: SelectionDescriptor) -> Self {
        Self {
            descriptors: vec![descriptor],
        }
    }

    /// Composite reason for a selector that failed to resolve.
    ///
    /// Order is `base`, then `rule`, then a constraint marker. The marker is
    /// only added when `constraint` is set and neither `base` nor `rule`
    /// already is one.
    pub fn for_failure(
        base: SelectionDescriptor,
        rule: Option<SelectionDescriptor>,
        constraint: bool,
    ) -> Self {
        let mut descriptors = vec![base];
        descriptors.extend(rule);
        if constraint
            && !descriptors
                .iter()
                .any(|d| d.cause() == SelectionCause::Constraint)
        {
            descriptors.push(SelectionDescriptor::constraint());
        }
        Self { descriptors }
    }

    /// Append a cause; `None` is ignored.
    pub fn add_cause(&mut self, descriptor: impl Into<Option<SelectionDescriptor>>) {
        if let Some(descriptor) = descriptor.into() {
            self.descriptors.push(descriptor);
        }
    }

    pub fn descriptors(&self) -> &[SelectionDescriptor] {
        &self.descriptors
    }

    pub fn causes(&self) -> impl Iterator<Item = SelectionCause> + '_ {
        self.descriptors.iter().map(SelectionDescriptor::cause)
    }

    pub fn has_cause(&self, cause: SelectionCause) -> bool {
        self.causes().any(|c| c == cause)
    }

    pub fn count_of(&self, cause: SelectionCause) -> usize {
        self.causes().filter(|&c| c == cause).count()
    }

    pub fn is_requested(&self) -> bool {
        self.has_cause(SelectionCause::Requested)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.descriptors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{d}")?;
        }
        Ok(())
    }
}
