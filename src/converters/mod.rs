//! Format converters
//!
//! This module contains converters between the event log and external MIDI
//! file representations.

pub mod smf;

// Re-export for convenience
pub use smf::{decode_smf, encode_smf, MidiFileError, MidiFileTrack};
