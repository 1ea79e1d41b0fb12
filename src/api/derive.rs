//! Stateless derivation bindings
//!
//! For callers that keep the event log on the JS side and only need the clip
//! projections back.

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, deserialize_or_default, serialize};
use crate::derive::{derive_from_events, derive_incremental, IncrementalDeriveState};
use crate::models::{DomainEvent, NoteClip};
use crate::wasm_log;

/// Batch-derive `{ clips, clipsWithoutSustain, controlEvents }` from an event log
///
/// `existingClips` (optional) keeps known noteIds on their current tracks.
#[wasm_bindgen(js_name = deriveFromEvents)]
pub fn derive_from_events_js(
    events: JsValue,
    track_id: Option<String>,
    existing_clips: JsValue,
) -> Result<JsValue, JsValue> {
    let events: Vec<DomainEvent> = deserialize(events, "Invalid MIDI events")?;
    let existing: Vec<NoteClip> = deserialize_or_default(existing_clips, "Invalid existing clips")?;

    let result = derive_from_events(&events, track_id.as_deref(), Some(existing.as_slice()));
    wasm_log!("deriveFromEvents: {} events -> {} clips", events.len(), result.clips.len());
    serialize(&result, "Failed to serialize derive result")
}

/// Incremental deriver for one recording track
#[wasm_bindgen]
pub struct IncrementalDeriver {
    track_id: String,
    state: IncrementalDeriveState,
}

#[wasm_bindgen]
impl IncrementalDeriver {
    #[wasm_bindgen(constructor)]
    pub fn new(track_id: String) -> IncrementalDeriver {
        Self {
            track_id,
            state: IncrementalDeriveState::new(),
        }
    }

    /// Process newly received events; returns `{ newClips, newClipsWithoutSustain, controlEvents }`
    pub fn push(&mut self, events: JsValue) -> Result<JsValue, JsValue> {
        let events: Vec<DomainEvent> = deserialize(events, "Invalid MIDI events")?;
        let result = derive_incremental(&events, &self.track_id, &mut self.state);
        serialize(&result, "Failed to serialize incremental result")
    }

    #[wasm_bindgen(js_name = openNoteCount)]
    pub fn open_note_count(&self) -> usize {
        self.state.open_note_count()
    }

    pub fn reset(&mut self) {
        self.state = IncrementalDeriveState::new();
    }
}
