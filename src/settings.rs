//! Game tuning and preferences
//!
//! Persisted as JSON next to the executable (or wherever the host points).
//! Every field has a default so a partial file is enough.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SetupError, SetupResult};

/// Tilt → force mapping
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltSettings {
    pub scale_x: f32,
    /// Re-centers the neutral holding angle
    pub bias: f32,
    pub scale_z: f32,
}

impl Default for TiltSettings {
    fn default() -> Self {
        Self {
            scale_x: TILT_SCALE_X,
            bias: TILT_BIAS,
            scale_z: TILT_SCALE_Z,
        }
    }
}

/// Trailing camera rig
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub offset_y: f32,
    pub offset_z: f32,
    /// Blend weight per tick, (0, 1]
    pub damping: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            offset_y: CAMERA_OFFSET_Y,
            offset_z: CAMERA_OFFSET_Z,
            damping: CAMERA_DAMPING,
        }
    }
}

/// Tap-to-jump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpSettings {
    pub impulse: Vec3,
}

impl Default for JumpSettings {
    fn default() -> Self {
        Self {
            impulse: JUMP_IMPULSE,
        }
    }
}

/// Obstacle contact behaviour
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSettings {
    /// Seconds before a hit obstacle reappears
    pub reveal_delay: f32,
    /// Category bitmask that marks a node as an obstacle
    pub category: u32,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            reveal_delay: OBSTACLE_REVEAL_DELAY,
            category: CATEGORY_OBSTACLE,
        }
    }
}

/// Clip and mixer volumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub saw_volume: f32,
    pub jump_volume: f32,
    /// Start the looping background track if it is available
    pub music: bool,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            saw_volume: SAW_VOLUME,
            jump_volume: JUMP_VOLUME,
            music: true,
            muted: false,
        }
    }
}

/// All tunables of the control core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tilt: TiltSettings,
    pub camera: CameraSettings,
    pub jump: JumpSettings,
    pub obstacles: ObstacleSettings,
    pub audio: AudioSettings,
}

impl Settings {
    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> SetupResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a file, falling back to defaults
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::read(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Read settings from a file, reporting every failure
    pub fn read(path: &Path) -> SetupResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Write settings as pretty JSON
    pub fn save(&self, path: &Path) -> SetupResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check ranges the core relies on
    pub fn validate(&self) -> SetupResult<()> {
        let damping = self.camera.damping;
        if !(damping > 0.0 && damping <= 1.0) {
            return Err(invalid("camera.damping", format!("{damping} not in (0, 1]")));
        }

        let delay = self.obstacles.reveal_delay;
        if !delay.is_finite() || delay < 0.0 {
            return Err(invalid(
                "obstacles.reveal_delay",
                format!("{delay} is not a non-negative duration"),
            ));
        }

        if self.obstacles.category == 0 {
            return Err(invalid("obstacles.category", "empty bitmask".to_string()));
        }

        let a = &self.audio;
        for (field, vol) in [
            ("audio.master_volume", a.master_volume),
            ("audio.sfx_volume", a.sfx_volume),
            ("audio.music_volume", a.music_volume),
            ("audio.saw_volume", a.saw_volume),
            ("audio.jump_volume", a.jump_volume),
        ] {
            if !(0.0..=1.0).contains(&vol) {
                return Err(invalid(field, format!("{vol} not in [0, 1]")));
            }
        }

        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> SetupError {
    SetupError::InvalidSetting { field, reason }
}
