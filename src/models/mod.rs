//! Models module for the sequencer
//!
//! This module contains the event log vocabulary and the clip projections
//! derived from it.

pub mod clip;
pub mod defaults;
pub mod events;
pub mod serde_helpers;

// Re-export commonly used types
pub use clip::{ControlChangeRecord, NoteClip};
pub use events::{ControlChangeEvent, DomainEvent, NoteEvent};
