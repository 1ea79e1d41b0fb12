//! MIDI Sequencer WASM API
//!
//! JavaScript-facing surface over the editor and the derivation engine.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error handling, and logging
//! - `types`: Result shapes returned to JavaScript
//! - `editor`: `SequencerEditor`, the stateful editing handle
//! - `derive`: stateless batch derivation and `IncrementalDeriver`

pub mod helpers;
pub mod types;
pub mod editor;
pub mod derive;

pub use editor::SequencerEditor;
pub use derive::{derive_from_events_js, IncrementalDeriver};
