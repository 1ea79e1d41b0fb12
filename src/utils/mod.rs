//! Utility modules for the sequencer
//!
//! MIDI value helpers and id generation shared by the derivation engine,
//! the editor and the file converters.

pub mod id;
pub mod midi_utils;

// Re-export commonly used helpers
pub use id::*;
pub use midi_utils::*;
