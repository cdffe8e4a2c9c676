//! Tilt → rolling force
//!
//! Small scales keep steering subtle; the bias re-centers the neutral angle
//! at which players naturally hold the device.

use glam::Vec3;

use super::host::TiltSample;
use crate::settings::TiltSettings;

/// Converts tilt samples to a per-tick velocity delta
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltForceMapper {
    scale_x: f32,
    bias: f32,
    scale_z: f32,
}

impl Default for TiltForceMapper {
    fn default() -> Self {
        Self::new(&TiltSettings::default())
    }
}

impl TiltForceMapper {
    pub fn new(settings: &TiltSettings) -> Self {
        Self {
            scale_x: settings.scale_x,
            bias: settings.bias,
            scale_z: settings.scale_z,
        }
    }

    /// Force for one sample; never has a vertical component
    #[inline]
    pub fn compute_force(&self, sample: TiltSample) -> Vec3 {
        Vec3::new(
            sample.x * self.scale_x,
            0.0,
            (sample.y + self.bias) * self.scale_z,
        )
    }
}
