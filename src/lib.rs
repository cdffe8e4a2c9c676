//! Tilt Ball - a tilt-steered ball rolling game core
//!
//! Core modules:
//! - `sim`: Control core (tilt force, trailing camera, obstacle contacts, tap-to-jump, game loop)
//! - `audio`: Sound clip registry and volume mixing over a host audio backend
//! - `settings`: Data-driven tuning, persisted as JSON
//! - `headless`: In-memory host used by the demo binary and tests
//!
//! Rendering, physics integration, asset decoding and device sensors belong
//! to the host. The core only talks to them through the traits in `sim::host`.

pub mod audio;
pub mod error;
pub mod headless;
pub mod settings;
pub mod sim;

pub use audio::{AudioManager, SoundEffect};
pub use error::{SetupError, SetupResult};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use glam::Vec3;

    /// Tilt x → force x scale
    pub const TILT_SCALE_X: f32 = 0.05;
    /// Added to tilt y so a device held at its natural angle produces no force
    pub const TILT_BIAS: f32 = 0.8;
    /// Biased tilt y → force z scale (tilting toward you rolls the ball back)
    pub const TILT_SCALE_Z: f32 = -0.05;

    /// Camera rig floats above and behind the ball
    pub const CAMERA_OFFSET_Y: f32 = 5.0;
    pub const CAMERA_OFFSET_Z: f32 = 5.0;
    /// Blend weight toward the target per tick
    pub const CAMERA_DAMPING: f32 = 0.3;

    /// Impulse applied when the ball is tapped
    pub const JUMP_IMPULSE: Vec3 = Vec3::new(0.0, 4.0, -2.0);

    /// Seconds a hit obstacle stays hidden
    pub const OBSTACLE_REVEAL_DELAY: f32 = 15.0;
    /// Collision category bitmask of obstacles (trees)
    pub const CATEGORY_OBSTACLE: u32 = 2;

    /// Scene node names resolved at setup
    pub const BALL_NODE_NAME: &str = "ball";
    pub const CAMERA_RIG_NODE_NAME: &str = "selfieStick";

    /// Clip volumes
    pub const SAW_VOLUME: f32 = 0.3;
    pub const JUMP_VOLUME: f32 = 0.4;
    pub const MUSIC_VOLUME: f32 = 0.1;
    /// Looping background track, optional
    pub const MUSIC_FILE: &str = "background.mp3";

    /// Tick length used by the headless host (60 Hz display)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
}
