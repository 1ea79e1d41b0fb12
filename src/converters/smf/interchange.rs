use std::collections::HashMap;

use super::model::{MidiFileControlChange, MidiFileNote, MidiFileTrack};
use crate::models::{ControlChangeEvent, DomainEvent, NoteEvent};
use crate::utils::id::{generate_cc_id, generate_clip_id};
use crate::utils::midi_utils::{clamp_cc, clamp_note, midi_to_unit, unit_to_midi};

/// Shortest exported note, in seconds
const MIN_EXPORT_DURATION_S: f64 = 0.001;

/// Expand decoded file tracks into event log entries
///
/// Seconds become milliseconds and 0-1 velocities become 0-127. Every note
/// gets a fresh noteId and a NoteOn/NoteOff pair tagged with `track_id` and
/// `pattern_id`.
pub fn events_from_tracks(
    tracks: &[MidiFileTrack],
    track_id: Option<&str>,
    pattern_id: Option<&str>,
) -> Vec<DomainEvent> {
    let mut events = Vec::new();

    for track in tracks {
        for note in &track.notes {
            let note_number = clamp_note(note.midi as i32);
            let start_ms = note.time * 1000.0;
            let end_ms = (note.time + note.duration) * 1000.0;
            let velocity = unit_to_midi(note.velocity);
            let note_id = generate_clip_id(note_number, start_ms);

            let tag = |mut event: NoteEvent| {
                event.track_id = track_id.map(str::to_string);
                event.pattern_id = pattern_id.map(str::to_string);
                event
            };

            events.push(DomainEvent::NoteOn(tag(NoteEvent::new(
                format!("evt-{}-on", note_id),
                note_id.clone(),
                start_ms,
                note_number,
                velocity,
                track.channel,
            ))));
            events.push(DomainEvent::NoteOff(tag(NoteEvent::new(
                format!("evt-{}-off", note_id),
                note_id,
                end_ms,
                note_number,
                velocity,
                track.channel,
            ))));
        }

        for cc in &track.control_changes {
            let timestamp = cc.time * 1000.0;
            events.push(DomainEvent::ControlChange(ControlChangeEvent::new(
                generate_cc_id(cc.number, timestamp),
                timestamp,
                cc.number.min(127),
                clamp_cc(cc.value * 127.0),
                track.channel,
            )));
        }
    }

    events
}

/// Collect a pattern's events into one interchange track
///
/// Note events without a patternId belong to every pattern; all control
/// changes are included. NoteOn/NoteOff are paired by noteId in time order;
/// unpaired NoteOns are left out.
pub fn track_from_events(events: &[DomainEvent], pattern_id: &str, name: &str) -> MidiFileTrack {
    let mut sorted: Vec<&DomainEvent> = events
        .iter()
        .filter(|event| match event.as_note() {
            Some(note) => note.pattern_id.as_deref().map_or(true, |id| id == pattern_id),
            None => true,
        })
        .collect();
    sorted.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));

    let mut track = MidiFileTrack {
        name: name.to_string(),
        ..MidiFileTrack::default()
    };
    let mut channel: Option<u8> = None;
    let mut started: HashMap<&str, &NoteEvent> = HashMap::new();

    for event in sorted {
        match event {
            DomainEvent::NoteOn(note) => {
                channel.get_or_insert(note.channel);
                started.insert(note.note_id.as_str(), note);
            }
            DomainEvent::NoteOff(note) => {
                if let Some(on) = started.remove(note.note_id.as_str()) {
                    let time = on.timestamp / 1000.0;
                    track.notes.push(MidiFileNote {
                        midi: on.note_number,
                        time,
                        duration: (note.timestamp / 1000.0 - time).max(MIN_EXPORT_DURATION_S),
                        velocity: midi_to_unit(on.velocity),
                    });
                }
            }
            DomainEvent::ControlChange(cc) => {
                track.control_changes.push(MidiFileControlChange {
                    number: cc.controller,
                    value: midi_to_unit(cc.value),
                    time: cc.timestamp / 1000.0,
                });
            }
        }
    }

    track.channel = channel.unwrap_or(0);
    track
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_from_tracks_rescales() {
        let tracks = vec![MidiFileTrack {
            name: "Piano".to_string(),
            channel: 1,
            notes: vec![MidiFileNote { midi: 60, time: 1.5, duration: 0.25, velocity: 0.5 }],
            control_changes: vec![MidiFileControlChange { number: 64, value: 1.0, time: 1.5 }],
        }];

        let events = events_from_tracks(&tracks, Some("track-3"), Some("pattern-1"));
        assert_eq!(events.len(), 3);

        let on = events[0].as_note().unwrap();
        assert!(events[0].is_note_on());
        assert_eq!(on.timestamp, 1500.0);
        assert_eq!(on.velocity, 64);
        assert_eq!(on.channel, 1);
        assert_eq!(on.track_id.as_deref(), Some("track-3"));
        assert_eq!(on.pattern_id.as_deref(), Some("pattern-1"));

        let off = events[1].as_note().unwrap();
        assert_eq!(off.timestamp, 1750.0);
        assert_eq!(off.note_id, on.note_id);

        match &events[2] {
            DomainEvent::ControlChange(cc) => {
                assert_eq!(cc.value, 127);
                assert_eq!(cc.timestamp, 1500.0);
            }
            other => panic!("expected cc, got {:?}", other),
        }
    }

    #[test]
    fn test_track_from_events_filters_pattern() {
        let events = vec![
            DomainEvent::NoteOn(NoteEvent::new("a-on", "a", 0.0, 60, 127, 0).with_pattern("p1")),
            DomainEvent::NoteOff(NoteEvent::new("a-off", "a", 500.0, 60, 0, 0).with_pattern("p1")),
            DomainEvent::NoteOn(NoteEvent::new("b-on", "b", 0.0, 62, 127, 0).with_pattern("p2")),
            DomainEvent::NoteOff(NoteEvent::new("b-off", "b", 500.0, 62, 0, 0).with_pattern("p2")),
            DomainEvent::NoteOn(NoteEvent::new("c-on", "c", 250.0, 64, 127, 0)),
            DomainEvent::NoteOff(NoteEvent::new("c-off", "c", 250.0, 64, 0, 0)),
            DomainEvent::ControlChange(ControlChangeEvent::new("cc", 100.0, 64, 127, 0)),
        ];

        let track = track_from_events(&events, "p1", "Pattern 1");
        let midis: Vec<u8> = track.notes.iter().map(|n| n.midi).collect();
        assert_eq!(midis, vec![60, 64]);
        assert_eq!(track.notes[0].duration, 0.5);
        assert_eq!(track.notes[0].velocity, 1.0);
        // Zero-length note gets the export floor
        assert_eq!(track.notes[1].duration, MIN_EXPORT_DURATION_S);
        assert_eq!(track.control_changes.len(), 1);
        assert_eq!(track.control_changes[0].time, 0.1);
    }
}
