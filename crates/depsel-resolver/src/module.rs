//! Per-module selector aggregation.

use depsel_core::coordinate::ModuleId;

use crate::registry::{ComponentHandle, SelectorId};

/// Every selector currently targeting one module, plus the component the
/// module has settled on so far.
///
/// A selector's target can move away from this module through an override.
/// Whether the set follows immediately or only after
/// `ResolveSession::reconcile_modules` depends on the session's
/// `ModuleReassignment` setting.
#[derive(Debug)]
pub struct ModuleResolutionState {
    id: ModuleId,
    selectors: Vec<SelectorId>,
    selected: Option<ComponentHandle>,
}

impl ModuleResolutionState {
    pub(crate) fn new(id: ModuleId) -> Self {
        Self {
            id,
            selectors: Vec::new(),
            selected: None,
        }
    }

    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    /// Registered selectors, in registration order.
    pub fn selectors(&self) -> &[SelectorId] {
        &self.selectors
    }

    /// Register `selector`. Returns `false` if it was already registered.
    pub fn add_selector(&mut self, selector: SelectorId) -> bool {
        if self.selectors.contains(&selector) {
            return false;
        }
        self.selectors.push(selector);
        true
    }

    /// Unregister `selector`. Returns `false` if it was not registered.
    pub fn remove_selector(&mut self, selector: SelectorId) -> bool {
        let before = self.selectors.len();
        self.selectors.retain(|&s| s != selector);
        self.selectors.len() != before
    }

    pub fn selected(&self) -> Option<ComponentHandle> {
        self.selected
    }

    pub(crate) fn select(&mut self, component: ComponentHandle) {
        self.selected = Some(component);
    }

    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }
}
