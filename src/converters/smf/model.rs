//! Interchange records between the event log and a MIDI file codec
//!
//! Times are in seconds and velocities/values normalized to 0-1, the shape
//! MIDI file libraries in the browser speak. Conversions to and from the
//! event log (milliseconds, 0-127) live in `interchange`.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MidiFileTrack {
    pub name: String,
    pub channel: u8,
    pub notes: Vec<MidiFileNote>,
    pub control_changes: Vec<MidiFileControlChange>,
}

impl MidiFileTrack {
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.control_changes.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MidiFileNote {
    /// MIDI note number (0-127)
    pub midi: u8,
    /// Start, in seconds
    pub time: f64,
    /// Length, in seconds
    pub duration: f64,
    /// 0-1
    pub velocity: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MidiFileControlChange {
    /// Controller number
    pub number: u8,
    /// 0-1
    pub value: f64,
    /// Seconds
    pub time: f64,
}

/// Convert seconds to ticks at a fixed tempo
///
/// # Arguments
/// * `seconds` - Absolute time in seconds
/// * `tempo_bpm` - Quarter notes per minute
/// * `tpq` - Ticks per quarter note
pub fn seconds_to_ticks(seconds: f64, tempo_bpm: f64, tpq: u16) -> u32 {
    let ticks = seconds * (tempo_bpm / 60.0) * tpq as f64;
    ticks.round().max(0.0) as u32
}
