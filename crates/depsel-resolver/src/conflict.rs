//! Record of module restarts performed during conflict resolution.

use std::fmt;

use depsel_core::coordinate::{ModuleId, ModuleVersionId};

/// Every restart performed during one resolve, in the order they happened.
#[derive(Debug, Default)]
pub struct ConflictReport {
    pub restarts: Vec<ModuleRestart>,
}

/// A module whose selectors were forced onto a winning component.
#[derive(Debug, Clone)]
pub struct ModuleRestart {
    pub module: ModuleId,
    pub previous: Option<ModuleVersionId>,
    pub selected: ModuleVersionId,
    pub reason: String,
    pub overridden: usize,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, restart: ModuleRestart) {
        self.restarts.push(restart);
    }

    pub fn is_empty(&self) -> bool {
        self.restarts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.restarts.len()
    }

    /// Restarts that touched `module`, oldest first.
    pub fn for_module<'a>(&'a self, module: &'a ModuleId) -> impl Iterator<Item = &'a ModuleRestart> {
        self.restarts.iter().filter(move |r| &r.module == module)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.restarts.is_empty() {
            return write!(f, "No module restarts.");
        }
        writeln!(f, "Module restarts ({}):", self.restarts.len())?;
        for r in &self.restarts {
            writeln!(f, "  {r}")?;
        }
        Ok(())
    }
}

impl fmt::Display for ModuleRestart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.previous {
            Some(ref previous) => write!(
                f,
                "{}: {} -> {} ({}, {} selector(s) overridden)",
                self.module, previous.version, self.selected, self.reason, self.overridden
            ),
            None => write!(
                f,
                "{}: -> {} ({}, {} selector(s) overridden)",
                self.module, self.selected, self.reason, self.overridden
            ),
        }
    }
}
