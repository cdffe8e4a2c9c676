//! Host collaborator interfaces
//!
//! The core never owns a scene graph, physics world, audio device or sensor.
//! The host implements these traits; the core calls them from the single
//! render/callback thread. Implementations must not block and must not call
//! back into the game loop.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Stable identifier of a scene node, assigned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Raw accelerometer-like reading (units of g)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TiltSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Result of a hit test at a screen point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitInfo {
    /// Frontmost node under the point
    pub entity: EntityId,
    /// World-space hit location
    pub point: Vec3,
}

/// Handle to a decoded, ready-to-play clip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u32);

/// Scene graph and physics world
pub trait SceneHost {
    /// Presentation position of the ball this frame
    fn ball_position(&self) -> Vec3;
    fn rig_position(&self) -> Vec3;
    fn set_rig_position(&mut self, pos: Vec3);

    /// Add to the ball body's velocity
    fn apply_velocity_delta(&mut self, delta: Vec3);
    /// Apply an instantaneous impulse to the ball body
    fn apply_impulse(&mut self, impulse: Vec3);

    /// Hidden nodes are not rendered and are excluded from contact testing
    fn set_hidden(&mut self, entity: EntityId, hidden: bool);

    fn hit_test(&self, screen_point: Vec2) -> Option<HitInfo>;

    /// Ask the physics world to report contact begins between `entity` and
    /// any body in `category`
    fn enable_contact_reports(&mut self, entity: EntityId, category: u32);
}

/// Audio device
pub trait AudioBackend {
    /// Decode and prepare a clip; `None` when the file is unavailable
    fn load(&mut self, file_name: &str) -> Option<ClipId>;
    /// Fire-and-forget playback
    fn play(&mut self, clip: ClipId, volume: f32, looping: bool);
}

/// Device motion source
pub trait MotionSampler {
    /// Newest sample since the last poll, if any arrived
    fn poll(&mut self) -> Option<TiltSample>;
}
