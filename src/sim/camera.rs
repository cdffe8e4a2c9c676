//! Trailing camera rig
//!
//! Exponential damping toward a point above and behind the ball. The rig
//! approaches the target asymptotically; it never snaps onto it.

use glam::Vec3;

use crate::settings::CameraSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    offset: Vec3,
    damping: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(&CameraSettings::default())
    }
}

impl CameraRig {
    pub fn new(settings: &CameraSettings) -> Self {
        Self {
            offset: Vec3::new(0.0, settings.offset_y, settings.offset_z),
            damping: settings.damping,
        }
    }

    /// Where the rig wants to be for a given ball position
    #[inline]
    pub fn target(&self, ball: Vec3) -> Vec3 {
        ball + self.offset
    }

    /// One damping step from `current` toward the ball's target
    /// One damped step toward `target(ball)`. Distance to the target shrinks
    /// by `1 - damping` per call until it reaches f32 resolution, where the
    /// blend rounds back to the same point and the rig stops moving.
    pub fn update(&self, current: Vec3, ball: Vec3) -> Vec3 {
        let d = self.damping;
        current * (1.0 - d) + self.target(ball) * d
    }
}
