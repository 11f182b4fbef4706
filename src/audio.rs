//! Tone selection for gameplay cues
//!
//! The simulation raises `GameEvent`s; this module turns them into simple
//! tones (frequency, start delay, length, gain) for whatever audio backend
//! the host page provides. No audio timing feeds back into gameplay.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Reference pitch for path tones (A4)
const BASE_FREQUENCY: f32 = 440.0;
/// Equal-tempered semitone ratio
const SEMITONE: f32 = 1.059463094359;
/// Path length that plays the reference pitch
const BASE_PATH_LEN: i32 = 24;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Ball started rolling or path changed length
    Move { path_len: Option<usize> },
    /// Ball hit a wall
    Blocked,
    /// Level completed
    LevelClear,
}

impl SoundEffect {
    pub fn from_event(event: &GameEvent) -> Self {
        match *event {
            GameEvent::Moved { path_len } => SoundEffect::Move { path_len },
            GameEvent::Blocked => SoundEffect::Blocked,
            GameEvent::Completed { .. } => SoundEffect::LevelClear,
        }
    }
}

/// A single oscillator note
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    pub frequency: f32,
    /// Seconds after the cue
    pub delay: f32,
    /// Seconds
    pub duration: f32,
    /// 0.0 - 1.0
    pub gain: f32,
}

/// One semitone up per path cell, A4 at length 24
pub fn path_frequency(path_len: usize) -> f32 {
    let steps = path_len as i32 - BASE_PATH_LEN;
    BASE_FREQUENCY * SEMITONE.powi(steps)
}

/// Volume state and effect-to-tone mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioMixer {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioMixer {
    fn default() -> Self {
        Self::new(0.8, 1.0)
    }
}

impl AudioMixer {
    pub fn new(master_volume: f32, sfx_volume: f32) -> Self {
        Self {
            master_volume: master_volume.clamp(0.0, 1.0),
            sfx_volume: sfx_volume.clamp(0.0, 1.0),
            muted: false,
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

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Notes to play for `effect`; empty when silent
    pub fn tones(&self, effect: SoundEffect) -> Vec<Tone> {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return Vec::new();
        }

        match effect {
            SoundEffect::Move { path_len: Some(len) } => vec![Tone {
                frequency: path_frequency(len),
                delay: 0.0,
                duration: 0.1,
                gain: vol,
            }],
            // Rolling ball is silent
            SoundEffect::Move { path_len: None } => Vec::new(),
            SoundEffect::Blocked => vec![Tone {
                frequency: 150.0,
                delay: 0.0,
                duration: 0.15,
                gain: vol * 0.6,
            }],
            // Rising fanfare
            SoundEffect::LevelClear => [400.0, 500.0, 600.0, 800.0]
                .iter()
                .enumerate()
                .map(|(i, &frequency)| Tone {
                    frequency,
                    delay: i as f32 * 0.1,
                    duration: 0.5,
                    gain: vol * 0.3,
                })
                .collect(),
        }
    }

    /// Tones for a batch of drained events, in order
    pub fn tones_for_events(&self, events: &[GameEvent]) -> Vec<Tone> {
        events
            .iter()
            .flat_map(|event| self.tones(SoundEffect::from_event(event)))
            .collect()
    }
}
