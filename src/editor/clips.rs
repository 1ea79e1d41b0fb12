//! Clip editing operations
//!
//! Each operation rewrites the event log and derives again. Stale or unknown
//! clip ids are ignored: the caller's editing state may lag behind the log.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::{note_events_from_clip, MidiEditor};
use crate::models::defaults::{BEATS_PER_BAR, MIN_DURATION_MS};
use crate::models::{DomainEvent, NoteClip};
use crate::utils::id::generate_clip_id;
use crate::utils::midi_utils::{clamp_note, clamp_tempo, clamp_velocity};

/// One entry of a batched move
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClipMove {
    pub id: String,
    /// New start in ms, clamped to >= 0
    pub start: f64,
    /// New note number, clamped to 0-127
    pub note_number: i32,
}

impl ClipMove {
    pub fn new(id: impl Into<String>, start: f64, note_number: i32) -> Self {
        Self {
            id: id.into(),
            start,
            note_number,
        }
    }
}

impl MidiEditor {
    /// Append the NoteOn/NoteOff pair for `clip`
    pub fn add_clip(&mut self, clip: NoteClip) {
        let mut clip = clip;
        clip.set_note_number(clamp_note(clip.note_number as i32));
        clip.start = clip.start.max(0.0);
        clip.duration = clip.duration.max(MIN_DURATION_MS);

        self.events
            .extend(note_events_from_clip(&clip, self.config.default_velocity));
        self.rederive_with(std::slice::from_ref(&clip));
    }

    /// Delete every note event of `clip_id`
    pub fn remove_clip(&mut self, clip_id: &str) {
        let before = self.events.len();
        self.events.retain(|event| !event.belongs_to(clip_id));
        if self.events.len() != before {
            self.rederive();
        }
        self.selected_clip_ids.retain(|id| id != clip_id);
    }

    /// Move the NoteOff of `clip_id` to `start + duration`
    pub fn update_clip_duration(&mut self, clip_id: &str, duration: f64) {
        let Some(start) = self.clip(clip_id).map(|clip| clip.start) else {
            return;
        };
        let end = start + duration.max(MIN_DURATION_MS);

        for event in self.events.iter_mut() {
            if event.is_note_off() && event.belongs_to(clip_id) {
                event.set_timestamp(end);
            }
        }
        self.rederive();
    }

    /// Batched move; derives once for the whole batch
    ///
    /// The NoteOn lands on the clamped start and the NoteOff shifts by the
    /// same amount, so the key-held length is kept.
    pub fn update_clips(&mut self, updates: &[ClipMove]) {
        // noteId -> (time shift, new start, new note number)
        let mut targets: HashMap<&str, (f64, f64, u8)> = HashMap::new();
        for update in updates {
            let Some(on_ms) = self.note_on_timestamp(&update.id) else {
                continue;
            };
            let start = update.start.max(0.0);
            targets.insert(update.id.as_str(), (start - on_ms, start, clamp_note(update.note_number)));
        }
        if targets.is_empty() {
            return;
        }

        for event in self.events.iter_mut() {
            let is_note_on = event.is_note_on();
            let Some(note) = event.as_note_mut() else {
                continue;
            };
            let Some(&(shift, start, note_number)) = targets.get(note.note_id.as_str()) else {
                continue;
            };
            note.note_number = note_number;
            note.timestamp = if is_note_on { start } else { note.timestamp + shift };
        }
        self.rederive();
    }

    /// Set the NoteOn velocity of every clip in `clip_ids`
    pub fn update_clip_velocity(&mut self, clip_ids: &[String], velocity: f64) {
        if clip_ids.is_empty() {
            return;
        }
        let velocity = clamp_velocity(velocity);
        let ids: HashSet<&str> = clip_ids.iter().map(String::as_str).collect();

        let mut changed = false;
        for event in self.events.iter_mut() {
            if let DomainEvent::NoteOn(note) = event {
                if ids.contains(note.note_id.as_str()) {
                    note.velocity = velocity;
                    changed = true;
                }
            }
        }
        if changed {
            self.rederive();
        }
    }

    /// Split `clip_id` in two at `cut_ms`
    ///
    /// Cuts the key-held span (the clip without sustain), so the halves meet at
    /// `cut_ms` and add up to the held length even under the pedal. No-op
    /// unless `start < cut_ms < end` of that span. The first half keeps the
    /// id; the second gets a fresh one. A selected source is replaced in the
    /// selection by both halves.
    pub fn split_clip_at(&mut self, clip_id: &str, cut_ms: f64) {
        let raw = self.derived.clips_without_sustain.iter().find(|c| c.id == clip_id);
        let Some(clip) = raw.or_else(|| self.clip(clip_id)).cloned() else {
            return;
        };
        let end = clip.end();
        if !(cut_ms > clip.start && cut_ms < end) {
            return;
        }

        let first = NoteClip {
            duration: cut_ms - clip.start,
            ..clip.clone()
        };
        let second = NoteClip {
            id: generate_clip_id(clip.note_number, cut_ms),
            start: cut_ms,
            duration: end - cut_ms,
            ..clip
        };

        self.events.retain(|event| !event.belongs_to(clip_id));
        let velocity = self.config.default_velocity;
        self.events.extend(note_events_from_clip(&first, velocity));
        self.events.extend(note_events_from_clip(&second, velocity));
        self.rederive_with(&[first.clone(), second.clone()]);

        if self.selected_clip_ids.iter().any(|id| id == clip_id) {
            self.selected_clip_ids.retain(|id| id != clip_id);
            self.selected_clip_ids.push(first.id);
            self.selected_clip_ids.push(second.id);
        }
    }

    /// Multiply every event time by `ratio` (e.g. after a tempo change)
    pub fn scale_timeline(&mut self, ratio: f64) {
        if !ratio.is_finite() || ratio <= 0.0 || self.events.is_empty() {
            return;
        }
        for event in self.events.iter_mut() {
            let scaled = event.timestamp() * ratio;
            event.set_timestamp(scaled);
        }
        self.rederive();
    }

    /// Length of a pattern in 4/4 bars, rounded up, at least 1
    pub fn pattern_length_bars(&self, pattern_id: &str, tempo_bpm: f64) -> u32 {
        let max_end = self
            .derived
            .clips
            .iter()
            .filter(|clip| clip.pattern_id.as_deref() == Some(pattern_id))
            .map(NoteClip::end)
            .fold(None, |max: Option<f64>, end| Some(max.map_or(end, |m| m.max(end))));

        let Some(max_end) = max_end else {
            return 1;
        };
        let ms_per_bar = 60_000.0 / clamp_tempo(tempo_bpm) * BEATS_PER_BAR;
        ((max_end / ms_per_bar).ceil() as u32).max(1)
    }

    fn note_on_timestamp(&self, note_id: &str) -> Option<f64> {
        self.events
            .iter()
            .find(|event| event.is_note_on() && event.belongs_to(note_id))
            .map(DomainEvent::timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;

    fn editor_with(clips: &[NoteClip]) -> MidiEditor {
        let mut editor = MidiEditor::new(EditorConfig::default());
        for clip in clips {
            editor.add_clip(clip.clone());
        }
        editor
    }

    #[test]
    fn test_add_clip_uses_default_velocity() {
        let editor = editor_with(&[NoteClip::new("a", 60, 0.0, 500.0, "track-1")]);
        assert_eq!(editor.events().len(), 2);
        assert_eq!(editor.clip("a").unwrap().velocity, Some(100));
        assert_eq!(editor.clip("a").unwrap().duration, 500.0);
    }

    #[test]
    fn test_remove_clip_drops_selection() {
        let mut editor = editor_with(&[
            NoteClip::new("a", 60, 0.0, 500.0, "track-1"),
            NoteClip::new("b", 62, 0.0, 500.0, "track-1"),
        ]);
        editor.set_selected_clip_ids(vec!["a".into(), "b".into()]);

        editor.remove_clip("a");

        assert!(editor.clip("a").is_none());
        assert_eq!(editor.clips().len(), 1);
        assert_eq!(editor.selected_clip_ids(), &["b".to_string()]);
    }

    #[test]
    fn test_update_clip_duration() {
        let mut editor = editor_with(&[NoteClip::new("a", 60, 100.0, 500.0, "track-1")]);
        editor.update_clip_duration("a", 250.0);
        assert_eq!(editor.clip("a").unwrap().end(), 350.0);

        editor.update_clip_duration("missing", 250.0);
        assert_eq!(editor.clips().len(), 1);
    }

    #[test]
    fn test_update_clips_clamps() {
        let mut editor = editor_with(&[NoteClip::new("a", 60, 100.0, 500.0, "track-1")]);
        editor.update_clips(&[ClipMove::new("a", -50.0, 200)]);

        let clip = editor.clip("a").unwrap();
        assert_eq!(clip.start, 0.0);
        assert_eq!(clip.duration, 500.0);
        assert_eq!(clip.note_number, 127);
        assert_eq!(clip.note_name, "G9");
    }

    #[test]
    fn test_update_clip_velocity_clamps() {
        let mut editor = editor_with(&[NoteClip::new("a", 60, 0.0, 100.0, "track-1")]);
        editor.update_clip_velocity(&["a".to_string()], 300.0);
        assert_eq!(editor.clip("a").unwrap().velocity, Some(127));

        editor.update_clip_velocity(&["a".to_string()], -4.0);
        assert_eq!(editor.clip("a").unwrap().velocity, Some(0));
    }

    #[test]
    fn test_split_out_of_bounds_is_noop() {
        let mut editor = editor_with(&[NoteClip::new("a", 60, 100.0, 400.0, "track-1")]);
        let before = editor.events().to_vec();

        editor.split_clip_at("a", 100.0);
        editor.split_clip_at("a", 500.0);
        editor.split_clip_at("missing", 200.0);

        assert_eq!(editor.events(), &before[..]);
    }

    #[test]
    fn test_scale_timeline() {
        let mut editor = editor_with(&[NoteClip::new("a", 60, 100.0, 400.0, "track-1")]);
        editor.scale_timeline(0.5);
        let clip = editor.clip("a").unwrap();
        assert_eq!(clip.start, 50.0);
        assert_eq!(clip.duration, 200.0);

        editor.scale_timeline(0.0);
        editor.scale_timeline(f64::NAN);
        assert_eq!(editor.clip("a").unwrap().start, 50.0);
    }

    #[test]
    fn test_pattern_length_bars() {
        // 120 BPM: one bar = 2000ms
        let editor = editor_with(&[
            NoteClip::new("a", 60, 0.0, 2500.0, "track-1").with_pattern("p1"),
            NoteClip::new("b", 60, 0.0, 9000.0, "track-1").with_pattern("p2"),
        ]);
        assert_eq!(editor.pattern_length_bars("p1", 120.0), 2);
        assert_eq!(editor.pattern_length_bars("p2", 120.0), 5);
        assert_eq!(editor.pattern_length_bars("empty", 120.0), 1);
    }
}
