//! Control core
//!
//! Everything here is pure orchestration over the host traits in [`host`]:
//! - Single-threaded, driven by the host's per-frame callback
//! - Never blocks, never calls back into itself from a host callback
//! - No rendering, physics integration or platform dependencies

pub mod camera;
pub mod contact;
pub mod game_loop;
pub mod host;
pub mod input;
pub mod registry;
pub mod tilt;
pub mod timer;

pub use camera::CameraRig;
pub use contact::{ContactEvent, ContactOutcome, ContactResolver, ObstacleState};
pub use game_loop::{GameEvent, GameLoop};
pub use host::{AudioBackend, ClipId, EntityId, HitInfo, MotionSampler, SceneHost, TiltSample};
pub use input::{Action, InputHandler};
pub use registry::{NodeDescriptor, Role, SceneRegistry};
pub use tilt::TiltForceMapper;
pub use timer::RevealTimers;
