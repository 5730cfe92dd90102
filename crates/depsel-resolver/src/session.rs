//! One resolve pass: the registry, every selector created during the pass,
//! and the primitives the conflict-resolution layer drives.

use depsel_core::config::{ModuleReassignment, ResolveConfig};
use depsel_core::coordinate::{ModuleId, ModuleVersionId};
use depsel_core::declaration::DependencyState;
use depsel_core::failure::ResolveFailure;
use depsel_core::reason::{SelectionDescriptor, SelectionReason};
use depsel_util::errors::DepselError;

use crate::component::ComponentMetadata;
use crate::conflict::{ConflictReport, ModuleRestart};
use crate::id_resolver::{ComponentMetadataResolver, IdentifierResolver};
use crate::registry::{ComponentHandle, ModuleHandle, ResolutionRegistry, SelectorId};
use crate::selector::SelectorRecord;

/// State for a single dependency resolution.
///
/// Nothing here outlives the pass; a new resolve starts a new session.
/// All mutation happens through `&mut self`, so one session has exactly one
/// writer at a time.
#[derive(Debug, Default)]
pub struct ResolveSession {
    config: ResolveConfig,
    registry: ResolutionRegistry,
    selectors: Vec<SelectorRecord>,
    conflicts: ConflictReport,
}

impl ResolveSession {
    pub fn new(config: ResolveConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ResolveConfig {
        &self.config
    }

    pub fn registry(&self) -> &ResolutionRegistry {
        &self.registry
    }

    pub fn conflicts(&self) -> &ConflictReport {
        &self.conflicts
    }

    /// Create a selector for `dependency` targeting `target`.
    pub fn add_selector(&mut self, dependency: DependencyState, target: &ModuleId) -> SelectorId {
        let module = self.registry.get_or_create_module(target);
        let id = SelectorId::new(self.selectors.len());
        tracing::trace!("Selector {} created for {dependency}", id.result_id());
        self.selectors
            .push(SelectorRecord::new(id, dependency, module));
        id
    }

    /// Create a selector targeting the module the declaration names.
    ///
    /// Project selectors name no module and need [`Self::add_selector`].
    pub fn add_dependency(&mut self, dependency: DependencyState) -> Result<SelectorId, DepselError> {
        let target = dependency
            .requested()
            .module_id()
            .cloned()
            .ok_or_else(|| DepselError::Resolution {
                message: format!("{dependency} needs an explicit target module"),
            })?;
        Ok(self.add_selector(dependency, &target))
    }

    /// The component record for `id`, created on first use.
    pub fn get_or_create_component(&mut self, id: &ModuleVersionId) -> ComponentHandle {
        self.registry.get_or_create_component(id)
    }

    pub fn selector(&self, id: SelectorId) -> &SelectorRecord {
        &self.selectors[id.index()]
    }

    /// All selectors in creation order.
    pub fn selectors(&self) -> impl Iterator<Item = &SelectorRecord> {
        self.selectors.iter()
    }

    pub fn resolve(
        &mut self,
        id: SelectorId,
        resolver: &dyn IdentifierResolver,
    ) -> Option<ComponentHandle> {
        self.selectors[id.index()].resolve(&mut self.registry, resolver)
    }

    pub fn failure(&self, id: SelectorId) -> Option<&ResolveFailure> {
        self.selectors[id.index()].failure(&self.registry)
    }

    pub fn selection_reason(&self, id: SelectorId) -> Option<SelectionReason> {
        self.selectors[id.index()].selection_reason(&self.registry)
    }

    /// The component the selector's current target module has settled on.
    pub fn module_selection(&self, id: SelectorId) -> Option<ComponentHandle> {
        let module = self.selectors[id.index()].target_module();
        self.registry.module(module).selected()
    }

    /// Fetch metadata for `component` once; later calls return the cached outcome.
    pub fn resolve_metadata(
        &mut self,
        component: ComponentHandle,
        resolver: &dyn ComponentMetadataResolver,
    ) -> Result<&ComponentMetadata, &ResolveFailure> {
        let record = self.registry.component_mut(component);
        if !record.is_metadata_resolved() {
            match resolver.resolve_metadata(record.id()) {
                Ok(metadata) => record.set_metadata(metadata),
                Err(failure) => {
                    tracing::warn!("Metadata for {} unavailable: {failure}", record.id());
                    record.set_failure(failure);
                }
            }
        }
        let record = self.registry.component(component);
        match (record.metadata(), record.failure()) {
            (Some(metadata), _) => Ok(metadata),
            (None, Some(failure)) => Err(failure),
            (None, None) => unreachable!("metadata resolution left no outcome"),
        }
    }

    /// Force one selector onto `component`, keeping module selector sets in
    /// line with the configured [`ModuleReassignment`].
    pub fn override_selection(&mut self, id: SelectorId, component: ComponentHandle) {
        let selector = &mut self.selectors[id.index()];
        let moved_from = selector.override_selection(&mut self.registry, component);
        let target = selector.target_module();

        match self.config.selection.module_reassignment {
            ModuleReassignment::Immediate => {
                if let Some(old) = moved_from {
                    self.registry.module_mut(old).remove_selector(id);
                }
                self.registry.module_mut(target).add_selector(id);
            }
            ModuleReassignment::Deferred => {
                if let Some(old) = moved_from {
                    tracing::trace!(
                        "Selector {} left registered with {} until reconciliation",
                        id.result_id(),
                        self.registry.module(old).id()
                    );
                }
            }
        }
    }

    /// Settle `module` on `component` without touching its selectors.
    pub fn select(&mut self, module: ModuleHandle, component: ComponentHandle) {
        assert_eq!(
            self.registry.component(component).module(),
            module,
            "cannot select {} for module {}",
            self.registry.component(component).id(),
            self.registry.module(module).id()
        );
        self.registry.module_mut(module).select(component);
    }

    /// Restart `module` with `winner`: settle the winner's module on it,
    /// append `cause` to the winner's reasons, and override every selector
    /// registered with `module` that is not already on the winner.
    ///
    /// The winner may belong to another module (module replacement); the
    /// replaced module then loses its selection. Returns the number of
    /// selectors overridden.
    pub fn restart(
        &mut self,
        module: ModuleHandle,
        winner: ComponentHandle,
        cause: impl Into<Option<SelectionDescriptor>>,
    ) -> usize {
        let cause = cause.into();
        let winner_module = self.registry.component(winner).module();
        let previous = self
            .registry
            .module(module)
            .selected()
            .map(|c| self.registry.component(c).id().clone());

        self.registry.module_mut(winner_module).select(winner);
        if winner_module != module {
            self.registry.module_mut(module).clear_selection();
        }
        let reason = cause
            .as_ref()
            .map(|c| c.description().to_string())
            .unwrap_or_else(|| "restart".to_string());
        self.registry.component_mut(winner).add_cause(cause);

        let registered = self.registry.module(module).selectors().to_vec();
        let mut overridden = 0;
        for id in registered {
            let selector = &self.selectors[id.index()];
            if selector.selected() == Some(winner) && selector.target_module() == winner_module {
                continue;
            }
            self.override_selection(id, winner);
            overridden += 1;
        }

        let restart = ModuleRestart {
            module: self.registry.module(module).id().clone(),
            previous,
            selected: self.registry.component(winner).id().clone(),
            reason,
            overridden,
        };
        tracing::debug!("Restarted {restart}");
        self.conflicts.add(restart);
        overridden
    }

    /// Bring every module's selector set in line with its selectors' current
    /// targets. Only does work under [`ModuleReassignment::Deferred`].
    /// Returns the number of selectors moved.
    pub fn reconcile_modules(&mut self) -> usize {
        let mut moved = 0;
        let handles: Vec<ModuleHandle> = self.registry.modules().map(|(h, _)| h).collect();
        for module in handles {
            let stale: Vec<SelectorId> = self
                .registry
                .module(module)
                .selectors()
                .iter()
                .copied()
                .filter(|&id| self.selectors[id.index()].target_module() != module)
                .collect();
            for id in stale {
                self.registry.module_mut(module).remove_selector(id);
                moved += 1;
            }
        }
        for selector in self.selectors.iter().filter(|s| s.selected().is_some()) {
            self.registry
                .module_mut(selector.target_module())
                .add_selector(selector.id());
        }
        if moved > 0 {
            tracing::debug!("Reconciled {moved} stale module registration(s)");
        }
        moved
    }
}
