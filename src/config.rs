//! Editor configuration
//!
//! Deserializable from JSON or straight from a JS object passed to the WASM
//! constructor. Missing fields fall back to the defaults in
//! [`crate::models::defaults`]; out-of-range values are clamped by
//! [`EditorConfig::normalized`].

use serde::{Deserialize, Serialize};

use crate::models::defaults::{DEFAULT_TEMPO_BPM, DEFAULT_TPQ, DEFAULT_TRACK_ID, DEFAULT_VELOCITY, MAX_VELOCITY};
use crate::utils::midi_utils::clamp_tempo;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Track used when no active track has been set
    pub default_track_id: String,
    /// Velocity given to clips created without one
    pub default_velocity: u8,
    /// Project tempo, used for SMF export and pattern lengths
    pub tempo_bpm: f64,
    /// SMF export resolution
    pub ticks_per_quarter: u16,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_track_id: DEFAULT_TRACK_ID.to_string(),
            default_velocity: DEFAULT_VELOCITY,
            tempo_bpm: DEFAULT_TEMPO_BPM,
            ticks_per_quarter: DEFAULT_TPQ,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    /// Clamp every field into its valid range
    pub fn normalized(mut self) -> Self {
        self.default_velocity = self.default_velocity.min(MAX_VELOCITY);
        self.tempo_bpm = clamp_tempo(self.tempo_bpm);
        if self.ticks_per_quarter == 0 {
            self.ticks_per_quarter = DEFAULT_TPQ;
        }
        if self.default_track_id.is_empty() {
            self.default_track_id = DEFAULT_TRACK_ID.to_string();
        }
        self
    }
}
