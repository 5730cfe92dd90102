//! Identity map for one resolve: exactly one [`ModuleResolutionState`] per
//! module id and one [`ComponentRecord`] per `(module, version)` id.
//!
//! Records live in arenas owned by the registry and are addressed through
//! copyable handles, so every mutation goes through the registry.

use std::collections::HashMap;

use depsel_core::coordinate::{ModuleId, ModuleVersionId};

use crate::component::ComponentRecord;
use crate::module::ModuleResolutionState;

/// Handle to a [`ModuleResolutionState`] in a [`ResolutionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleHandle(usize);

/// Handle to a [`ComponentRecord`] in a [`ResolutionRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentHandle(usize);

/// Resolve-scoped selector id, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectorId(u64);

impl SelectorId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u64)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// The id used to correlate this selector with graph results.
    pub fn result_id(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct ResolutionRegistry {
    modules: Vec<ModuleResolutionState>,
    module_index: HashMap<ModuleId, ModuleHandle>,
    components: Vec<ComponentRecord>,
    component_index: HashMap<ModuleVersionId, ComponentHandle>,
}

impl ResolutionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the state for `id`, creating it on first use.
    pub fn get_or_create_module(&mut self, id: &ModuleId) -> ModuleHandle {
        if let Some(&handle) = self.module_index.get(id) {
            return handle;
        }
        let handle = ModuleHandle(self.modules.len());
        self.modules.push(ModuleResolutionState::new(id.clone()));
        self.module_index.insert(id.clone(), handle);
        tracing::trace!("Registered module {id}");
        handle
    }

    /// Return the record for `id`, creating it (and its module) on first use.
    pub fn get_or_create_component(&mut self, id: &ModuleVersionId) -> ComponentHandle {
        if let Some(&handle) = self.component_index.get(id) {
            return handle;
        }
        let module = self.get_or_create_module(&id.module);
        let handle = ComponentHandle(self.components.len());
        self.components.push(ComponentRecord::new(id.clone(), module));
        self.component_index.insert(id.clone(), handle);
        tracing::trace!("Registered component {id}");
        handle
    }

    pub fn find_module(&self, id: &ModuleId) -> Option<ModuleHandle> {
        self.module_index.get(id).copied()
    }

    pub fn module(&self, handle: ModuleHandle) -> &ModuleResolutionState {
        &self.modules[handle.0]
    }

    pub fn module_mut(&mut self, handle: ModuleHandle) -> &mut ModuleResolutionState {
        &mut self.modules[handle.0]
    }

    pub fn component(&self, handle: ComponentHandle) -> &ComponentRecord {
        &self.components[handle.0]
    }

    pub fn component_mut(&mut self, handle: ComponentHandle) -> &mut ComponentRecord {
        &mut self.components[handle.0]
    }

    /// All modules in registration order.
    pub fn modules(&self) -> impl Iterator<Item = (ModuleHandle, &ModuleResolutionState)> {
        self.modules
            .iter()
            .enumerate()
            .map(|(i, m)| (ModuleHandle(i), m))
    }

    /// All components in registration order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentHandle, &ComponentRecord)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| (ComponentHandle(i), c))
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}
