//! MIDI Sequencer WASM Module
//!
//! Event-sourced piano roll core: an append-mostly log of MIDI domain events
//! is the source of truth, and note clips are derived from it by pairing
//! NoteOn/NoteOff events with sustain pedal handling.

pub mod api;
pub mod config;
pub mod converters;
pub mod derive;
pub mod editor;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use config::EditorConfig;
pub use derive::{derive_from_events, derive_incremental, DeriveResult, IncrementalDeriveResult, IncrementalDeriveState};
pub use editor::MidiEditor;
pub use models::*;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if console_log::init_with_level(log::Level::Debug).is_err() {
        return;
    }

    log::info!("MIDI sequencer WASM module initialized");
}
