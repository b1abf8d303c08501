use slotmap::SecondaryMap;

use crate::topology::EdgeId;

/// Per-seam-edge alternation state for one knot pass.
///
/// Edges never visited read as `false`. The map lives only as long as the
/// pass that owns it, so no state leaks back into the mesh.
#[derive(Debug, Default, Clone)]
pub struct SeamToggles {
    states: SecondaryMap<EdgeId, bool>,
}

impl SeamToggles {
    /// Creates an empty toggle map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of `edge`.
    #[must_use]
    pub fn get(&self, edge: EdgeId) -> bool {
        self.states.get(edge).copied().unwrap_or(false)
    }

    /// Returns the state before this visit and flips it.
    pub fn visit(&mut self, edge: EdgeId) -> bool {
        let previous = self.get(edge);
        self.states.insert(edge, !previous);
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn two_visits_restore_state() {
        let mut keys: SlotMap<EdgeId, ()> = SlotMap::with_key();
        let edge = keys.insert(());
        let other = keys.insert(());
        let mut toggles = SeamToggles::new();

        assert!(!toggles.visit(edge));
        assert!(toggles.get(edge));
        assert!(!toggles.get(other));
        assert!(toggles.visit(edge));
        assert!(!toggles.get(edge));
    }
}
