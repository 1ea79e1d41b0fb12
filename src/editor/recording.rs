//! Live recording: incremental derivation per track and preview clips

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::MidiEditor;
use crate::derive::{derive_from_events, derive_incremental, insert_sorted, IncrementalDeriveState};
use crate::models::defaults::MIN_DURATION_MS;
use crate::models::{DomainEvent, NoteClip};
use crate::utils::midi_utils::{clamp_note, clamp_velocity};

/// Per-track incremental state for one recording pass
#[derive(Clone, Debug, Default)]
pub struct RecordingSession {
    active: bool,
    states: HashMap<String, IncrementalDeriveState>,
}

impl RecordingSession {
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Drop every track's carried state
    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn state_for(&mut self, track_id: &str) -> &mut IncrementalDeriveState {
        self.states.entry(track_id.to_string()).or_default()
    }

    pub fn track_state(&self, track_id: &str) -> Option<&IncrementalDeriveState> {
        self.states.get(track_id)
    }

    pub fn is_empty(&self) -> bool {
        self.states.values().all(IncrementalDeriveState::is_empty)
    }

    /// Placeholder clips for every note not closed yet, on its recorded track
    pub(crate) fn unfinished_clips(&self) -> Vec<NoteClip> {
        self.states.values().flat_map(IncrementalDeriveState::unfinished_clips).collect()
    }
}

/// A key that has gone down and has not been released yet
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewNote {
    pub note_id: String,
    pub note_number: i32,
    pub start_ms: f64,
    pub velocity: f64,
    #[serde(default)]
    pub channel: u8,
    pub track_id: String,
    #[serde(default)]
    pub pattern_id: Option<String>,
}

/// Growing display clips for held keys, keyed by noteId
#[derive(Clone, Debug, Default)]
pub(crate) struct RecordingPreviews {
    clips: Vec<NoteClip>,
    starts: HashMap<String, f64>,
}

impl MidiEditor {
    pub fn is_recording(&self) -> bool {
        self.recording.is_active()
    }

    /// Start or stop recording
    ///
    /// Both directions discard carried state and previews. Stopping runs one
    /// full batch pass so the incremental results are replaced; notes still
    /// held at that point stay on the track they were recorded to.
    pub fn set_recording(&mut self, value: bool) {
        let unfinished = self.recording.unfinished_clips();
        self.recording.clear();
        self.recording.active = value;
        self.previews = RecordingPreviews::default();

        if !value {
            self.rederive_with(&unfinished);
            log::debug!(
                "recording stopped, {} clips ({} closed at stop)",
                self.derived.clips.len(),
                unfinished.len()
            );
        }
    }

    /// Append live events for `track_id` (or the active track)
    ///
    /// While recording, only the new events are derived against the track's
    /// carried state and the results are merged into the projections.
    /// Otherwise the whole log is derived again.
    pub fn append_events(&mut self, new_events: Vec<DomainEvent>, track_id: Option<&str>) {
        if new_events.is_empty() {
            return;
        }
        let track_id = track_id.map_or_else(|| self.active_track_id(), str::to_string);

        if !self.recording.is_active() {
            self.events.extend(new_events);
            self.derived = derive_from_events(
                &self.events,
                Some(track_id.as_str()),
                Some(self.derived.clips.as_slice()),
            );
            return;
        }

        let state = self.recording.state_for(&track_id);
        let result = derive_incremental(&new_events, &track_id, state);
        self.events.extend(new_events);

        for clip in result.new_clips {
            insert_sorted(&mut self.derived.clips, clip);
        }
        for clip in result.new_clips_without_sustain {
            insert_sorted(&mut self.derived.clips_without_sustain, clip);
        }
        self.derived.control_events.extend(result.control_events);
    }

    /// Show a 1ms preview clip for a key that just went down
    ///
    /// A preview with the same noteId is replaced in place.
    pub fn begin_recording_preview(&mut self, note: PreviewNote) {
        let mut clip = NoteClip::new(
            note.note_id.clone(),
            clamp_note(note.note_number),
            note.start_ms,
            MIN_DURATION_MS,
            note.track_id,
        )
        .with_velocity(clamp_velocity(note.velocity))
        .with_channel(note.channel);
        clip.pattern_id = note.pattern_id;

        let previews = &mut self.previews;
        match previews.clips.iter_mut().find(|c| c.id == note.note_id) {
            Some(existing) => *existing = clip,
            None => previews.clips.push(clip),
        }
        previews.starts.insert(note.note_id, note.start_ms);
    }

    /// Stretch every preview to `current_ms`
    pub fn update_recording_previews(&mut self, current_ms: f64) {
        let RecordingPreviews { clips, starts } = &mut self.previews;
        for clip in clips.iter_mut() {
            if let Some(&start_ms) = starts.get(&clip.id) {
                clip.duration = (current_ms - start_ms).round().max(MIN_DURATION_MS);
            }
        }
    }

    pub fn end_recording_preview(&mut self, note_id: &str) {
        if self.previews.starts.remove(note_id).is_some() {
            self.previews.clips.retain(|clip| clip.id != note_id);
        }
    }

    pub fn clear_recording_previews(&mut self) {
        self.previews = RecordingPreviews::default();
    }

    pub fn recording_preview_clips(&self) -> &[NoteClip] {
        &self.previews.clips
    }

    pub fn recording_session(&self) -> &RecordingSession {
        &self.recording
    }
}
