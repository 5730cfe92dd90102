//! Per-version component state: metadata, failure, and the selection-reason
//! ledger every resolving selector contributes to.

use depsel_core::coordinate::ModuleVersionId;
use depsel_core::declaration::DependencyMetadata;
use depsel_core::failure::ResolveFailure;
use depsel_core::reason::{SelectionDescriptor, SelectionReason};

use crate::registry::{ModuleHandle, SelectorId};

/// Descriptor fetched for a component once its id is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentMetadata {
    pub id: ModuleVersionId,
    pub dependencies: Vec<DependencyMetadata>,
}

impl ComponentMetadata {
    pub fn new(id: ModuleVersionId) -> Self {
        Self {
            id,
            dependencies: Vec::new(),
        }
    }
}

/// One concrete `(module, version)` in a resolve.
///
/// Created once per distinct id by the registry and shared by every selector
/// that resolves to it; each such selector appends its causes to the ledger.
#[derive(Debug)]
pub struct ComponentRecord {
    id: ModuleVersionId,
    module: ModuleHandle,
    metadata: Option<ComponentMetadata>,
    failure: Option<ResolveFailure>,
    selection_reason: SelectionReason,
    selectors: Vec<SelectorId>,
}

impl ComponentRecord {
    pub(crate) fn new(id: ModuleVersionId, module: ModuleHandle) -> Self {
        Self {
            id,
            module,
            metadata: None,
            failure: None,
            selection_reason: SelectionReason::new(),
            selectors: Vec::new(),
        }
    }

    pub fn id(&self) -> &ModuleVersionId {
        &self.id
    }

    pub fn module(&self) -> ModuleHandle {
        self.module
    }

    pub fn metadata(&self) -> Option<&ComponentMetadata> {
        self.metadata.as_ref()
    }

    /// The metadata-resolution failure, if fetching the descriptor failed.
    pub fn failure(&self) -> Option<&ResolveFailure> {
        self.failure.as_ref()
    }

    pub fn selection_reason(&self) -> &SelectionReason {
        &self.selection_reason
    }

    /// Selectors currently pointing at this component, in arrival order.
    pub fn selectors(&self) -> &[SelectorId] {
        &self.selectors
    }

    /// True once metadata resolution has run, successfully or not.
    pub fn is_metadata_resolved(&self) -> bool {
        self.metadata.is_some() || self.failure.is_some()
    }

    /// Record that `selector` chose this component.
    pub fn selected_by(&mut self, selector: SelectorId) {
        if !self.selectors.contains(&selector) {
            self.selectors.push(selector);
        }
    }

    pub(crate) fn unselected_by(&mut self, selector: SelectorId) {
        self.selectors.retain(|&s| s != selector);
    }

    /// Append a cause to the ledger; `None` is ignored.
    pub fn add_cause(&mut self, descriptor: impl Into<Option<SelectionDescriptor>>) {
        if let Some(descriptor) = descriptor.into() {
            tracing::trace!("{}: adding cause `{descriptor}`", self.id);
            self.selection_reason.add_cause(descriptor);
        }
    }

    pub fn set_metadata(&mut self, metadata: ComponentMetadata) {
        self.failure = None;
        self.metadata = Some(metadata);
    }

    pub fn set_failure(&mut self, failure: ResolveFailure) {
        self.metadata = None;
        self.failure = Some(failure);
    }
}
