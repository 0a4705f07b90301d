use std::collections::BTreeSet;

use crate::piece::MoveHandle;

/// Outstanding piece moves. The cascade only continues once this drains.
#[derive(Debug, Default, Clone)]
pub struct MovementTracker {
    pending: BTreeSet<MoveHandle>,
}

impl MovementTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, handle: MoveHandle) {
        let fresh = self.pending.insert(handle);
        debug_assert!(fresh, "{handle:?} tracked twice");
    }

    /// Resolves `handle`. Returns `true` only for the completion that empties the set.
    pub fn complete(&mut self, handle: MoveHandle) -> bool {
        self.pending.remove(&handle) && self.pending.is_empty()
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_empty()
    }

    /// Moves still in flight.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
