//! Shared types for the WASM API
//!
//! Result shapes handed back to JavaScript.

use serde::{Deserialize, Serialize};

use crate::editor::{LoadStatus, MidiEditor};
use crate::models::{ControlChangeRecord, NoteClip};

/// Everything a piano roll view needs after an edit
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub clips: Vec<NoteClip>,
    pub clips_without_sustain: Vec<NoteClip>,
    pub control_events: Vec<ControlChangeRecord>,
    pub selected_clip_ids: Vec<String>,
    pub recording_preview_clips: Vec<NoteClip>,
    pub is_recording: bool,
    pub status: LoadStatus,
    pub error: Option<String>,
}

impl From<&MidiEditor> for EditorSnapshot {
    fn from(editor: &MidiEditor) -> Self {
        Self {
            clips: editor.clips().to_vec(),
            clips_without_sustain: editor.clips_without_sustain().to_vec(),
            control_events: editor.control_events().to_vec(),
            selected_clip_ids: editor.selected_clip_ids().to_vec(),
            recording_preview_clips: editor.recording_preview_clips().to_vec(),
            is_recording: editor.is_recording(),
            status: editor.status(),
            error: editor.error().map(str::to_string),
        }
    }
}

/// Result of a paste
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PasteResult {
    pub pasted_clip_ids: Vec<String>,
}
