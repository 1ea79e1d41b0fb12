//! MIDI ranges and default values
//!
//! Shared constants for the derivation engine, editing operations and
//! file import/export.

pub const MIN_NOTE: u8 = 0;
pub const MAX_NOTE: u8 = 127;
pub const MIN_VELOCITY: u8 = 0;
pub const MAX_VELOCITY: u8 = 127;
pub const MAX_CC_VALUE: u8 = 127;
pub const MAX_CHANNEL: u8 = 15;

/// Sustain pedal controller number
pub const SUSTAIN_CONTROLLER: u8 = 64;

/// CC64 values at or above this count as "pedal down"
pub const SUSTAIN_THRESHOLD: u8 = 64;

/// Floor for derived clip durations, in milliseconds
pub const MIN_DURATION_MS: f64 = 1.0;

/// Grace period used to force-close notes still open at the end of a pass
pub const TAIL_PADDING_MS: f64 = 200.0;

/// Velocity for created notes (~78% of full scale)
pub const DEFAULT_VELOCITY: u8 = 100;

/// Track assigned when neither the caller nor the event names one
pub const DEFAULT_TRACK_ID: &str = "track-1";

pub const DEFAULT_TEMPO_BPM: f64 = 120.0;
pub const MIN_TEMPO_BPM: f64 = 20.0;
pub const MAX_TEMPO_BPM: f64 = 300.0;

/// Ticks per quarter note for SMF export
pub const DEFAULT_TPQ: u16 = 480;

/// Pattern lengths are measured in 4/4 bars
pub const BEATS_PER_BAR: f64 = 4.0;
