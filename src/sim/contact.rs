//! Ball/obstacle contact handling
//!
//! Each obstacle runs its own `Visible → Hidden → (reveal timer) → Visible`
//! cycle. A hit hides the obstacle, plays the saw sound and schedules one
//! reveal.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::host::{AudioBackend, EntityId, SceneHost};
use super::registry::{Role, SceneRegistry};
use super::timer::RevealTimers;
use crate::audio::{AudioManager, SoundEffect};

/// Visibility of one obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleState {
    #[default]
    Visible,
    Hidden,
}

/// Contact begin between two bodies, in either order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub a: EntityId,
    pub b: EntityId,
}

impl ContactEvent {
    pub fn new(a: EntityId, b: EntityId) -> Self {
        Self { a, b }
    }

    /// The body that is not `ball`, if `ball` is one of the two
    pub fn other_than(&self, ball: EntityId) -> Option<EntityId> {
        if self.a == ball {
            Some(self.b)
        } else if self.b == ball {
            Some(self.a)
        } else {
            None
        }
    }
}

/// What a contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Obstacle hidden and reveal scheduled
    Hid(EntityId),
    /// Obstacle already hidden
    AlreadyHidden(EntityId),
    /// Not a ball/obstacle pair
    Ignored,
}

#[derive(Debug, Clone)]
pub struct ContactResolver {
    ball: EntityId,
    reveal_delay: f32,
    states: BTreeMap<EntityId, ObstacleState>,
    timers: RevealTimers,
}

impl ContactResolver {
    /// Every obstacle in the registry starts visible
    pub fn new(registry: &SceneRegistry, reveal_delay: f32) -> Self {
        let states = registry
            .obstacles()
            .iter()
            .map(|id| (*id, ObstacleState::Visible))
            .collect();
        Self {
            ball: registry.ball(),
            reveal_delay,
            states,
            timers: RevealTimers::new(),
        }
    }

    /// React to a contact begin
    pub fn handle(
        &mut self,
        event: ContactEvent,
        registry: &SceneRegistry,
        scene: &mut dyn SceneHost,
        audio: &AudioManager,
        backend: &mut dyn AudioBackend,
    ) -> ContactOutcome {
        let Some(other) = event.other_than(self.ball) else {
            return ContactOutcome::Ignored;
        };
        if registry.role_of(other) != Role::Obstacle {
            return ContactOutcome::Ignored;
        }
        let Some(state) = self.states.get_mut(&other) else {
            return ContactOutcome::Ignored;
        };

        match *state {
            ObstacleState::Hidden => ContactOutcome::AlreadyHidden(other),
            ObstacleState::Visible => {
                *state = ObstacleState::Hidden;
                scene.set_hidden(other, true);
                audio.play(backend, SoundEffect::Saw);
                self.timers.schedule(other, self.reveal_delay);
                log::debug!("Obstacle {:?} hidden for {}s", other, self.reveal_delay);
                ContactOutcome::Hid(other)
            }
        }
    }

    /// Advance reveal timers and show every obstacle whose timer expired
    pub fn advance(&mut self, dt: f32, scene: &mut dyn SceneHost) -> Vec<EntityId> {
        let revealed = self.timers.advance(dt);
        for id in &revealed {
            if let Some(state) = self.states.get_mut(id) {
                *state = ObstacleState::Visible;
            }
            scene.set_hidden(*id, false);
            log::debug!("Obstacle {:?} revealed", id);
        }
        revealed
    }

    pub fn state(&self, id: EntityId) -> Option<ObstacleState> {
        self.states.get(&id).copied()
    }

    pub fn pending_reveals(&self) -> usize {
        self.timers.len()
    }

    pub fn hidden_count(&self) -> usize {
        self.states
            .values()
            .filter(|s| **s == ObstacleState::Hidden)
            .count()
    }
}
