//! Event-sourced MIDI editor state
//!
//! [`MidiEditor`] owns the event log (the only source of truth) plus the clip
//! projections derived from it. Every mutation rewrites the log and derives
//! again; the projections are never patched directly, except for the
//! incremental append path used while recording.
//!
//! Operations are grouped by concern:
//! - `clips`: add/remove/resize/move/velocity/split edits
//! - `clipboard`: copy/cut/paste with transposition
//! - `recording`: live recording sessions and preview clips
//! - `file`: SMF import/export and load status

pub mod clipboard;
pub mod clips;
pub mod file;
pub mod recording;

pub use clipboard::{Clipboard, ClipboardItem};
pub use clips::ClipMove;
pub use file::{ImportMode, ImportOptions, LoadStatus};
pub use recording::{PreviewNote, RecordingSession};

use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::derive::{derive_from_events, DeriveResult};
use crate::models::{ControlChangeRecord, DomainEvent, NoteClip, NoteEvent};
use crate::utils::id::generate_event_id;
use crate::utils::midi_utils::clamp_note;
use recording::RecordingPreviews;

/// Active track / editing pattern supplied by the surrounding application
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditingContext {
    #[serde(default)]
    pub active_track_id: Option<String>,
    #[serde(default)]
    pub editing_pattern_id: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct MidiEditor {
    config: EditorConfig,
    context: EditingContext,
    events: Vec<DomainEvent>,
    derived: DeriveResult,
    selected_clip_ids: Vec<String>,
    clipboard: Option<Clipboard>,
    recording: RecordingSession,
    previews: RecordingPreviews,
    status: LoadStatus,
    error: Option<String>,
}

impl MidiEditor {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            config: config.normalized(),
            ..Self::default()
        }
    }

    /// Build an editor over an existing event log
    pub fn with_events(config: EditorConfig, events: Vec<DomainEvent>) -> Self {
        let mut editor = Self::new(config);
        editor.events = events;
        editor.rederive();
        editor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn context(&self) -> &EditingContext {
        &self.context
    }

    pub fn set_active_track(&mut self, track_id: Option<String>) {
        self.context.active_track_id = track_id;
    }

    pub fn set_editing_pattern(&mut self, pattern_id: Option<String>) {
        self.context.editing_pattern_id = pattern_id;
    }

    pub fn events(&self) -> &[DomainEvent] {
        &self.events
    }

    /// Sustain-extended clips
    pub fn clips(&self) -> &[NoteClip] {
        &self.derived.clips
    }

    pub fn clips_without_sustain(&self) -> &[NoteClip] {
        &self.derived.clips_without_sustain
    }

    pub fn control_events(&self) -> &[ControlChangeRecord] {
        &self.derived.control_events
    }

    pub fn derived(&self) -> &DeriveResult {
        &self.derived
    }

    pub fn clip(&self, id: &str) -> Option<&NoteClip> {
        self.derived.clips.iter().find(|clip| clip.id == id)
    }

    pub fn selected_clip_ids(&self) -> &[String] {
        &self.selected_clip_ids
    }

    pub fn set_selected_clip_ids(&mut self, ids: Vec<String>) {
        self.selected_clip_ids = ids;
    }

    /// Clear the log, projections, selection, recording and load status
    ///
    /// Configuration, editing context and the clipboard survive.
    pub fn reset(&mut self) {
        *self = Self {
            config: self.config.clone(),
            context: self.context.clone(),
            clipboard: self.clipboard.take(),
            ..Self::default()
        };
    }

    /// Track for notes created without an explicit one
    fn active_track_id(&self) -> String {
        self.context
            .active_track_id
            .clone()
            .unwrap_or_else(|| self.config.default_track_id.clone())
    }

    fn rederive(&mut self) {
        self.rederive_with(&[]);
    }

    /// Re-run batch derivation over the whole log
    ///
    /// The current clips (plus `extra_hints`) keep each noteId on the track it
    /// already belongs to.
    fn rederive_with(&mut self, extra_hints: &[NoteClip]) {
        let hint = self.context.active_track_id.as_deref();
        self.derived = if extra_hints.is_empty() {
            derive_from_events(&self.events, hint, Some(self.derived.clips.as_slice()))
        } else {
            let mut hints = self.derived.clips.clone();
            hints.extend_from_slice(extra_hints);
            derive_from_events(&self.events, hint, Some(hints.as_slice()))
        };
    }
}

/// NoteOn/NoteOff pair reproducing `clip`
pub fn note_events_from_clip(clip: &NoteClip, default_velocity: u8) -> [DomainEvent; 2] {
    let note_number = clamp_note(clip.note_number as i32);
    let velocity = clip.velocity.unwrap_or(default_velocity);
    let pair = |id: String, timestamp: f64| NoteEvent {
        id,
        timestamp,
        note_number,
        velocity,
        channel: clip.channel,
        note_id: clip.id.clone(),
        track_id: Some(clip.track_id.clone()),
        pattern_id: clip.pattern_id.clone(),
    };

    [
        DomainEvent::NoteOn(pair(generate_event_id(&clip.id, "on"), clip.start)),
        DomainEvent::NoteOff(pair(generate_event_id(&clip.id, "off"), clip.end())),
    ]
}
