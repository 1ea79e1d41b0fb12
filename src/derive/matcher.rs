//! Event matching shared by batch and incremental derivation
//!
//! Both paths feed events one at a time through [`Matcher`], so overlap
//! resolution and sustain handling cannot drift apart between them.

use std::collections::HashMap;

use super::state::IncrementalDeriveState;
use crate::models::defaults::{DEFAULT_TRACK_ID, SUSTAIN_CONTROLLER, SUSTAIN_THRESHOLD};
use crate::models::{ControlChangeEvent, ControlChangeRecord, DomainEvent, NoteClip, NoteEvent};

/// Decides which track a newly opened note belongs to
///
/// Order: track already known for the noteId, the caller's hint, the event's
/// own trackId, then the default track.
pub(crate) struct TrackResolver {
    known: HashMap<String, String>,
    hint: Option<String>,
}

impl TrackResolver {
    pub fn new(hint: Option<&str>, existing_clips: Option<&[NoteClip]>) -> Self {
        let known = existing_clips
            .unwrap_or_default()
            .iter()
            .map(|clip| (clip.id.clone(), clip.track_id.clone()))
            .collect();
        Self {
            known,
            hint: hint.map(str::to_string),
        }
    }

    /// Every note goes to `track_id` (live recording)
    pub fn fixed(track_id: &str) -> Self {
        Self::new(Some(track_id), None)
    }

    pub fn resolve(&mut self, event: &NoteEvent) -> String {
        let track_id = self
            .known
            .get(&event.note_id)
            .cloned()
            .or_else(|| self.hint.clone())
            .or_else(|| event.track_id.clone())
            .unwrap_or_else(|| DEFAULT_TRACK_ID.to_string());
        self.known.insert(event.note_id.clone(), track_id.clone());
        track_id
    }
}

pub(crate) struct Matcher<'s> {
    state: &'s mut IncrementalDeriveState,
    tracks: TrackResolver,
    /// Sustain-extended clips
    pub clips: Vec<NoteClip>,
    /// Clips closed at the key release, ignoring the pedal
    pub raw_clips: Vec<NoteClip>,
    pub control_events: Vec<ControlChangeRecord>,
}

impl<'s> Matcher<'s> {
    pub fn new(state: &'s mut IncrementalDeriveState, tracks: TrackResolver) -> Self {
        Self {
            state,
            tracks,
            clips: Vec::new(),
            raw_clips: Vec::new(),
            control_events: Vec::new(),
        }
    }

    pub fn process(&mut self, event: &DomainEvent) {
        match event {
            DomainEvent::NoteOn(note) => self.note_on(note),
            DomainEvent::NoteOff(note) => self.note_off(note),
            DomainEvent::ControlChange(cc) => self.control_change(cc),
        }
    }

    fn note_on(&mut self, event: &NoteEvent) {
        let track_id = self.tracks.resolve(event);
        self.state.open(event, track_id);
    }

    fn note_off(&mut self, event: &NoteEvent) {
        let Some(note) = self.state.take_matching(event) else {
            log::trace!(
                "dropping unmatched noteOff {} (channel {}, note {})",
                event.note_id,
                event.channel,
                event.note_number
            );
            return;
        };

        let raw_clip = note.to_clip(event.timestamp);
        self.raw_clips.push(raw_clip.clone());

        if self.state.is_pedal_down(event.channel) {
            self.state.queue_sustain(event.channel, note);
        } else {
            self.clips.push(raw_clip);
        }
    }

    fn control_change(&mut self, event: &ControlChangeEvent) {
        self.control_events.push(ControlChangeRecord::from(event));

        if event.controller == SUSTAIN_CONTROLLER {
            let released = self.state.set_pedal(event.channel, event.value >= SUSTAIN_THRESHOLD);
            if released {
                self.release_sustain(event.channel, event.timestamp);
            }
        }
    }

    fn release_sustain(&mut self, channel: u8, timestamp: f64) {
        for note in self.state.drain_sustain(channel) {
            self.clips.push(note.to_clip(timestamp));
        }
    }

    /// Force-close everything still pending at the end of a batch pass
    ///
    /// Open notes close at `tail_ms` into both lists. Sustain queues flush at
    /// `tail_ms` while the pedal is still down and at `last_ms` otherwise.
    pub fn close_all(&mut self, last_ms: f64, tail_ms: f64) {
        for note in self.state.drain_open() {
            let clip = note.to_clip(tail_ms);
            self.raw_clips.push(clip.clone());
            self.clips.push(clip);
        }

        for (channel, pedal_down) in self.state.pedal_channels() {
            self.release_sustain(channel, if pedal_down { tail_ms } else { last_ms });
        }

        for channel in self.state.pending_channels() {
            self.release_sustain(channel, tail_ms);
        }
    }
}

/// Sort clips by (start, note number); ties keep emission order
pub fn sort_clips(clips: &mut [NoteClip]) {
    clips.sort_by(|a, b| {
        a.start
            .total_cmp(&b.start)
            .then(a.note_number.cmp(&b.note_number))
    });
}

/// Insert `clip` into an already sorted list, after any equal keys
pub fn insert_sorted(clips: &mut Vec<NoteClip>, clip: NoteClip) {
    let idx = clips.partition_point(|existing| {
        existing
            .start
            .total_cmp(&clip.start)
            .then(existing.note_number.cmp(&clip.note_number))
            .is_le()
    });
    clips.insert(idx, clip);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(note_id: &str, ts: f64) -> NoteEvent {
        NoteEvent::new(format!("{}-{}", note_id, ts), note_id, ts, 60, 100, 0)
    }

    #[test]
    fn test_track_resolver_order() {
        let existing = vec![NoteClip::new("known", 60, 0.0, 10.0, "track-known")];
        let mut resolver = TrackResolver::new(Some("track-hint"), Some(existing.as_slice()));

        assert_eq!(resolver.resolve(&note("known", 0.0)), "track-known");
        assert_eq!(resolver.resolve(&note("fresh", 0.0).with_track("track-event")), "track-hint");

        let mut no_hint = TrackResolver::new(None, None);
        assert_eq!(no_hint.resolve(&note("a", 0.0).with_track("track-event")), "track-event");
        assert_eq!(no_hint.resolve(&note("b", 0.0)), DEFAULT_TRACK_ID);
    }

    #[test]
    fn test_track_resolver_remembers_note_id() {
        let mut resolver = TrackResolver::new(None, None);
        assert_eq!(resolver.resolve(&note("a", 0.0).with_track("track-2")), "track-2");
        // Same noteId seen again without a track keeps the first assignment
        assert_eq!(resolver.resolve(&note("a", 10.0)), "track-2");
    }

    #[test]
    fn test_insert_sorted_keeps_order() {
        let mut clips = vec![
            NoteClip::new("a", 60, 0.0, 10.0, "t"),
            NoteClip::new("b", 62, 0.0, 10.0, "t"),
            NoteClip::new("c", 60, 100.0, 10.0, "t"),
        ];
        insert_sorted(&mut clips, NoteClip::new("d", 61, 0.0, 10.0, "t"));
        insert_sorted(&mut clips, NoteClip::new("e", 60, 0.0, 10.0, "t"));

        let ids: Vec<&str> = clips.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e", "d", "b", "c"]);
    }
}
