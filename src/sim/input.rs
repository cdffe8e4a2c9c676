//! Tap-to-jump

use glam::Vec3;

use super::host::{EntityId, HitInfo};
use crate::audio::SoundEffect;
use crate::settings::JumpSettings;

/// Impulse and sound applied together by the game loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Action {
    pub impulse: Vec3,
    pub sound: SoundEffect,
}

#[derive(Debug, Clone, Copy)]
pub struct InputHandler {
    ball: EntityId,
    impulse: Vec3,
}

impl InputHandler {
    pub fn new(ball: EntityId, settings: &JumpSettings) -> Self {
        Self {
            ball,
            impulse: settings.impulse,
        }
    }

    /// A tap on the ball jumps; anything else does nothing
    pub fn on_tap(&self, hit: Option<HitInfo>) -> Option<Action> {
        let hit = hit?;
        if hit.entity != self.ball {
            return None;
        }
        Some(Action {
            impulse: self.impulse,
            sound: SoundEffect::Jump,
        })
    }
}
