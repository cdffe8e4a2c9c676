//! One-shot reveal timers keyed by obstacle

use std::collections::BTreeMap;

use super::host::EntityId;

/// Pending reveals, advanced by the game loop's tick `dt`
#[derive(Debug, Clone, Default)]
pub struct RevealTimers {
    /// Seconds remaining per obstacle; ordered for stable firing order
    pending: BTreeMap<EntityId, f32>,
}

impl RevealTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer; returns false if one is already pending for `id`
    pub fn schedule(&mut self, id: EntityId, delay: f32) -> bool {
        if self.pending.contains_key(&id) {
            return false;
        }
        self.pending.insert(id, delay.max(0.0));
        true
    }

    /// Advance all timers; each expired id is returned exactly once
    pub fn advance(&mut self, dt: f32) -> Vec<EntityId> {
        let mut fired = Vec::new();
        for (id, remaining) in self.pending.iter_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                fired.push(*id);
            }
        }
        for id in &fired {
            self.pending.remove(id);
        }
        fired
    }

    pub fn is_pending(&self, id: EntityId) -> bool {
        self.pending.contains_key(&id)
    }

    pub fn remaining(&self, id: EntityId) -> Option<f32> {
        self.pending.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
