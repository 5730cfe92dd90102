//! Resolution state for one declared selector.

use std::fmt;

use depsel_core::coordinate::ComponentSelector;
use depsel_core::declaration::{DependencyMetadata, DependencyState};
use depsel_core::failure::ResolveFailure;
use depsel_core::reason::{SelectionCause, SelectionDescriptor, SelectionReason};

use crate::id_resolver::{IdResolveResult, IdentifierResolver, ResolvedVersionConstraint};
use crate::registry::{ComponentHandle, ModuleHandle, ResolutionRegistry, SelectorId};

/// Where a selector is in its lifecycle.
///
/// `Unresolved` moves to `Resolved` or `Failed` exactly once. Conflict
/// resolution can move any state to `Overridden`; overriding a failed
/// selector keeps its failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorOutcome {
    Unresolved,
    Resolved(ComponentHandle),
    Failed(ResolveFailure),
    Overridden {
        component: ComponentHandle,
        failure: Option<ResolveFailure>,
    },
}

#[derive(Debug)]
pub struct SelectorRecord {
    id: SelectorId,
    dependency_state: DependencyState,
    target_module: ModuleHandle,
    outcome: SelectorOutcome,
    id_resolve_result: Option<IdResolveResult>,
    version_constraint: Option<ResolvedVersionConstraint>,
}

impl SelectorRecord {
    pub(crate) fn new(
        id: SelectorId,
        dependency_state: DependencyState,
        target_module: ModuleHandle,
    ) -> Self {
        Self {
            id,
            dependency_state,
            target_module,
            outcome: SelectorOutcome::Unresolved,
            id_resolve_result: None,
            version_constraint: None,
        }
    }

    pub fn id(&self) -> SelectorId {
        self.id
    }

    pub fn result_id(&self) -> u64 {
        self.id.result_id()
    }

    pub fn requested(&self) -> &ComponentSelector {
        self.dependency_state.requested()
    }

    pub fn dependency_state(&self) -> &DependencyState {
        &self.dependency_state
    }

    pub fn dependency(&self) -> &DependencyMetadata {
        self.dependency_state.dependency()
    }

    pub fn target_module(&self) -> ModuleHandle {
        self.target_module
    }

    pub fn outcome(&self) -> &SelectorOutcome {
        &self.outcome
    }

    /// The component chosen for this selector, by resolution or override.
    pub fn selected(&self) -> Option<ComponentHandle> {
        match self.outcome {
            SelectorOutcome::Resolved(component)
            | SelectorOutcome::Overridden { component, .. } => Some(component),
            SelectorOutcome::Unresolved | SelectorOutcome::Failed(_) => None,
        }
    }

    pub fn resolve_result(&self) -> Option<&IdResolveResult> {
        self.id_resolve_result.as_ref()
    }

    pub fn version_constraint(&self) -> Option<&ResolvedVersionConstraint> {
        self.version_constraint.as_ref()
    }

    /// Resolve this selector to a component, at most once.
    ///
    /// Later calls return the memoized outcome without side effects: the
    /// selected component, or `None` after a failure.
    pub fn resolve(
        &mut self,
        registry: &mut ResolutionRegistry,
        resolver: &dyn IdentifierResolver,
    ) -> Option<ComponentHandle> {
        match self.outcome {
            SelectorOutcome::Resolved(component)
            | SelectorOutcome::Overridden { component, .. } => return Some(component),
            SelectorOutcome::Failed(_) => return None,
            SelectorOutcome::Unresolved => {}
        }

        let dependency = self.dependency_state.dependency();
        let mut result = IdResolveResult::new();
        if let Some(failure) = self.dependency_state.failure() {
            result.failed(failure.clone());
        } else {
            if dependency.is_pending() {
                result.set_selection_description(SelectionDescriptor::constraint());
            }
            resolver.resolve(dependency, &mut result);
        }

        let id = match (result.failure(), result.module_version_id()) {
            (None, Some(id)) => id.clone(),
            (failure, _) => {
                let failure = failure.cloned().unwrap_or_else(|| {
                    ResolveFailure::not_found(
                        dependency.selector.to_string(),
                        dependency
                            .selector
                            .constraint()
                            .map(|c| c.to_string())
                            .unwrap_or_default(),
                    )
                });
                tracing::debug!("Selector {} ({self}) failed: {failure}", self.result_id());
                self.outcome = SelectorOutcome::Failed(failure);
                self.id_resolve_result = Some(result);
                return None;
            }
        };

        let component = registry.get_or_create_component(&id);
        // A selector never resolves to a component of another module.
        assert_eq!(
            registry.component(component).module(),
            self.target_module,
            "selector {self} resolved to {id}, which belongs to another module"
        );

        let description = result.selection_description();
        let rule = self.dependency_state.rule_descriptor();
        // Same marker rule as the failure composite: once, after the rule.
        let constraint_marked = description.cause() == SelectionCause::Constraint
            || rule.is_some_and(|r| r.cause() == SelectionCause::Constraint);

        let record = registry.component_mut(component);
        record.selected_by(self.id);
        record.add_cause(description.clone());
        record.add_cause(rule.cloned());
        if dependency.is_pending() && !constraint_marked {
            record.add_cause(SelectionDescriptor::constraint());
        }
        registry.module_mut(self.target_module).add_selector(self.id);

        tracing::debug!("Selector {} ({self}) resolved to {id}", self.result_id());
        self.version_constraint = result.resolved_version_constraint().cloned();
        self.id_resolve_result = Some(result);
        self.outcome = SelectorOutcome::Resolved(component);
        Some(component)
    }

    /// This selector's own failure, else the selected component's metadata failure.
    pub fn failure<'a>(&'a self, registry: &'a ResolutionRegistry) -> Option<&'a ResolveFailure> {
        match &self.outcome {
            SelectorOutcome::Failed(failure)
            | SelectorOutcome::Overridden {
                failure: Some(failure),
                ..
            } => Some(failure),
            SelectorOutcome::Resolved(component)
            | SelectorOutcome::Overridden {
                component,
                failure: None,
            } => registry.component(*component).failure(),
            SelectorOutcome::Unresolved => None,
        }
    }

    /// Why this selector ended up where it did; `None` until it is resolved.
    ///
    /// With a selected component this is the component's ledger. After a
    /// failure it is synthesized from the resolver's description, the
    /// declaration's rule, and the constraint marker.
    pub fn selection_reason(&self, registry: &ResolutionRegistry) -> Option<SelectionReason> {
        match &self.outcome {
            SelectorOutcome::Resolved(component)
            | SelectorOutcome::Overridden { component, .. } => {
                Some(registry.component(*component).selection_reason().clone())
            }
            SelectorOutcome::Failed(_) => Some(self.failure_reason()),
            SelectorOutcome::Unresolved => None,
        }
    }

    fn failure_reason(&self) -> SelectionReason {
        let base = self
            .id_resolve_result
            .as_ref()
            .map(|r| r.selection_description().clone())
            .unwrap_or_else(SelectionDescriptor::requested);
        SelectionReason::for_failure(
            base,
            self.dependency_state.rule_descriptor().cloned(),
            self.dependency().is_pending(),
        )
    }

    /// Force this selector onto `component`.
    ///
    /// Retargets the selector at the component's module and, when the
    /// component already has metadata, marks the cached id-resolve result
    /// as resolved to it. Module selector sets are left to the caller.
    /// Returns the previous target module if it changed.
    pub fn override_selection(
        &mut self,
        registry: &mut ResolutionRegistry,
        component: ComponentHandle,
    ) -> Option<ModuleHandle> {
        let previous = self.selected();
        let failure = match std::mem::replace(&mut self.outcome, SelectorOutcome::Unresolved) {
            SelectorOutcome::Failed(failure) => Some(failure),
            SelectorOutcome::Overridden { failure, .. } => failure,
            SelectorOutcome::Resolved(_) | SelectorOutcome::Unresolved => None,
        };
        self.outcome = SelectorOutcome::Overridden { component, failure };

        if let Some(previous) = previous.filter(|&p| p != component) {
            registry.component_mut(previous).unselected_by(self.id);
        }
        let record = registry.component_mut(component);
        record.selected_by(self.id);

        let new_module = record.module();
        if let Some(metadata) = record.metadata() {
            self.id_resolve_result
                .get_or_insert_with(IdResolveResult::new)
                .resolved(metadata.clone());
        }

        tracing::debug!(
            "Selector {} ({self}) overridden to {}",
            self.result_id(),
            registry.component(component).id()
        );
        let old_module = std::mem::replace(&mut self.target_module, new_module);
        (old_module != new_module).then_some(old_module)
    }
}

impl fmt::Display for SelectorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dependency_state)
    }
}
