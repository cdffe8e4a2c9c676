//! Sound clips and volume mixing
//!
//! Clips are decoded by the host's [`AudioBackend`]; this module resolves
//! them once at setup and applies master/sfx volumes on playback. The music
//! track is started once at setup; its volume is fixed from then on because
//! the backend cannot re-level a clip that is already playing.

use crate::consts::MUSIC_FILE;
use crate::error::{SetupError, SetupResult};
use crate::settings::AudioSettings;
use crate::sim::host::{AudioBackend, ClipId};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Ball cuts through an obstacle
    Saw,
    /// Ball tapped
    Jump,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 2] = [SoundEffect::Saw, SoundEffect::Jump];

    /// Logical name
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundEffect::Saw => "saw",
            SoundEffect::Jump => "jump",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "saw" => Some(SoundEffect::Saw),
            "jump" => Some(SoundEffect::Jump),
            _ => None,
        }
    }

    /// Asset the host decodes for this effect
    pub fn file_name(&self) -> &'static str {
        match self {
            SoundEffect::Saw => "chainsaw.wav",
            SoundEffect::Jump => "jump.wav",
        }
    }
}

/// A loaded clip and its base volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundHandle {
    pub clip: ClipId,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    saw: SoundHandle,
    jump: SoundHandle,
    music: Option<SoundHandle>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl AudioManager {
    /// Load both effect clips (required) and start background music (optional)
    pub fn load(backend: &mut dyn AudioBackend, settings: &AudioSettings) -> SetupResult<Self> {
        let saw = load_required(backend, SoundEffect::Saw, settings.saw_volume)?;
        let jump = load_required(backend, SoundEffect::Jump, settings.jump_volume)?;

        let music = if settings.music {
            match backend.load(MUSIC_FILE) {
                Some(clip) => Some(SoundHandle {
                    clip,
                    volume: crate::consts::MUSIC_VOLUME,
                }),
                None => {
                    log::warn!("Background music '{}' unavailable - playing without it", MUSIC_FILE);
                    None
                }
            }
        } else {
            None
        };

        let manager = Self {
            saw,
            jump,
            music,
            master_volume: settings.master_volume,
            sfx_volume: settings.sfx_volume,
            music_volume: settings.music_volume,
            muted: settings.muted,
        };
        log::info!("Sounds loaded (music: {})", manager.music.is_some());

        manager.start_music(backend);
        Ok(manager)
    }

    pub fn handle(&self, effect: SoundEffect) -> SoundHandle {
        match effect {
            SoundEffect::Saw => self.saw,
            SoundEffect::Jump => self.jump,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all effects
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Volume a clip would be played at right now
    pub fn effective_volume(&self, effect: SoundEffect) -> f32 {
        if self.muted {
            0.0
        } else {
            self.handle(effect).volume * self.sfx_volume * self.master_volume
        }
    }

    /// Play a sound effect, fire-and-forget
    pub fn play(&self, backend: &mut dyn AudioBackend, effect: SoundEffect) {
        let vol = self.effective_volume(effect);
        if vol <= 0.0 {
            return;
        }
        backend.play(self.handle(effect).clip, vol, false);
    }

    /// Loop the music at `clip * music * master`. Later volume changes do not
    /// reach the running track.
    fn start_music(&self, backend: &mut dyn AudioBackend) {
        let Some(music) = self.music else { return };
        if self.muted {
            return;
        }
        let vol = music.volume * self.music_volume * self.master_volume;
        if vol > 0.0 {
            backend.play(music.clip, vol, true);
        }
    }
}

fn load_required(
    backend: &mut dyn AudioBackend,
    effect: SoundEffect,
    volume: f32,
) -> SetupResult<SoundHandle> {
    backend
        .load(effect.file_name())
        .map(|clip| SoundHandle { clip, volume })
        .ok_or_else(|| SetupError::MissingSound(effect.as_str().to_string()))
}
