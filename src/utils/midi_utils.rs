//! Shared MIDI value helpers
//!
//! Note naming plus the clamping rules used wherever caller-supplied numbers
//! enter the event log. Out-of-range input is clamped, never rejected.

use crate::models::defaults::{
    MAX_CC_VALUE, MAX_NOTE, MAX_TEMPO_BPM, MAX_VELOCITY, MIN_NOTE, MIN_TEMPO_BPM, MIN_VELOCITY,
};

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// Display name for a MIDI note number (60 = "C4", 0 = "C-1")
pub fn midi_number_to_name(note_number: u8) -> String {
    let pitch_class = (note_number % 12) as usize;
    let octave = (note_number / 12) as i8 - 1;
    format!("{}{}", NOTE_NAMES[pitch_class], octave)
}

/// Clamp a (possibly shifted) note number into 0-127
pub fn clamp_note(note: i32) -> u8 {
    note.clamp(MIN_NOTE as i32, MAX_NOTE as i32) as u8
}

/// Round then clamp a velocity into 0-127
pub fn clamp_velocity(velocity: f64) -> u8 {
    if velocity.is_nan() {
        return MIN_VELOCITY;
    }
    velocity.round().clamp(MIN_VELOCITY as f64, MAX_VELOCITY as f64) as u8
}

/// Round then clamp a controller value into 0-127
pub fn clamp_cc(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, MAX_CC_VALUE as f64) as u8
}

/// Round then clamp a tempo into the supported BPM range
pub fn clamp_tempo(tempo_bpm: f64) -> f64 {
    if !tempo_bpm.is_finite() {
        return crate::models::defaults::DEFAULT_TEMPO_BPM;
    }
    tempo_bpm.round().clamp(MIN_TEMPO_BPM, MAX_TEMPO_BPM)
}

/// Rescale a normalized 0-1 value (file interchange) into 0-127
pub fn unit_to_midi(value: f64) -> u8 {
    clamp_velocity(value * MAX_VELOCITY as f64)
}

/// Rescale a 0-127 value into normalized 0-1
pub fn midi_to_unit(value: u8) -> f64 {
    value as f64 / MAX_VELOCITY as f64
}
