use midly::{Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

use super::model::{seconds_to_ticks, MidiFileTrack};
use super::{MidiFileError, Result};
use crate::utils::midi_utils::{clamp_cc, clamp_note, clamp_tempo, unit_to_midi};

/// Ordering of events sharing a tick: releases first, then controllers, then attacks
const ORDER_NOTE_OFF: u8 = 0;
const ORDER_CONTROLLER: u8 = 1;
const ORDER_NOTE_ON: u8 = 2;

/// Write an interchange track to a Standard MIDI File (Format 1)
///
/// Track 0 carries the tempo, track 1 the notes and control changes.
pub fn encode_smf(track: &MidiFileTrack, tempo_bpm: f64, tpq: u16) -> Result<Vec<u8>> {
    if track.is_empty() {
        return Err(MidiFileError::NothingToExport);
    }

    let tempo_bpm = clamp_tempo(tempo_bpm);
    let tpq = if tpq == 0 { crate::models::defaults::DEFAULT_TPQ } else { tpq };

    let smf = Smf {
        header: Header {
            format: Format::Parallel,
            timing: Timing::Metrical(tpq.into()),
        },
        tracks: vec![build_conductor_track(tempo_bpm), build_note_track(track, tempo_bpm, tpq)],
    };

    let mut out = Vec::new();
    smf.write(&mut out)
        .map_err(|e| MidiFileError::Write(format!("Failed to write MIDI: {}", e)))?;

    log::debug!("encoded {} notes into {} bytes", track.notes.len(), out.len());
    Ok(out)
}

fn build_conductor_track<'a>(tempo_bpm: f64) -> Track<'a> {
    let microseconds_per_quarter = (60_000_000.0 / tempo_bpm) as u32;
    vec![
        TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::Tempo(microseconds_per_quarter.into())),
        },
        end_of_track(),
    ]
}

fn build_note_track<'a>(track: &'a MidiFileTrack, tempo_bpm: f64, tpq: u16) -> Track<'a> {
    let channel = track.channel.min(15);
    // (absolute tick, same-tick order, event)
    let mut timed: Vec<(u32, u8, TrackEventKind<'a>)> = Vec::new();

    for note in &track.notes {
        let key = clamp_note(note.midi as i32);
        let start = seconds_to_ticks(note.time, tempo_bpm, tpq);
        let end = seconds_to_ticks(note.time + note.duration, tempo_bpm, tpq).max(start + 1);
        timed.push((
            start,
            ORDER_NOTE_ON,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOn {
                    key: key.into(),
                    vel: unit_to_midi(note.velocity).max(1).into(),
                },
            },
        ));
        timed.push((
            end,
            ORDER_NOTE_OFF,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::NoteOff {
                    key: key.into(),
                    vel: 0.into(),
                },
            },
        ));
    }

    for cc in &track.control_changes {
        timed.push((
            seconds_to_ticks(cc.time, tempo_bpm, tpq),
            ORDER_CONTROLLER,
            TrackEventKind::Midi {
                channel: channel.into(),
                message: MidiMessage::Controller {
                    controller: cc.number.min(127).into(),
                    value: clamp_cc(cc.value * 127.0).into(),
                },
            },
        ));
    }

    timed.sort_by_key(|(tick, order, _)| (*tick, *order));

    let mut events = vec![TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(track.name.as_bytes())),
    }];
    let mut prev_tick = 0u32;
    for (tick, _, kind) in timed {
        events.push(TrackEvent {
            delta: tick.saturating_sub(prev_tick).into(),
            kind,
        });
        prev_tick = tick;
    }
    events.push(end_of_track());
    events
}

fn end_of_track<'a>() -> TrackEvent<'a> {
    TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    }
}
