use std::collections::{HashMap, VecDeque};

use midly::{MetaMessage, MidiMessage, Smf, Timing, TrackEventKind};

use super::model::{MidiFileControlChange, MidiFileNote, MidiFileTrack};
use super::{MidiFileError, Result};
use crate::utils::midi_utils::midi_to_unit;

/// 500,000 us per quarter note = 120 BPM
const DEFAULT_US_PER_QUARTER: f64 = 500_000.0;

/// Decode SMF bytes into interchange tracks
///
/// Tracks without notes or control changes (e.g. a format 1 conductor track)
/// are skipped. Tick times are converted with the file's tempo map.
pub fn decode_smf(bytes: &[u8]) -> Result<Vec<MidiFileTrack>> {
    let smf = Smf::parse(bytes).map_err(|e| MidiFileError::Parse(e.to_string()))?;
    let tempo_map = TempoMap::from_smf(&smf);

    let mut tracks = Vec::new();
    for (index, track) in smf.tracks.iter().enumerate() {
        let decoded = decode_track(track, index, &tempo_map);
        if !decoded.is_empty() {
            tracks.push(decoded);
        }
    }

    log::debug!(
        "decoded {} tracks, {} notes",
        tracks.len(),
        tracks.iter().map(|t| t.notes.len()).sum::<usize>()
    );
    Ok(tracks)
}

fn decode_track(track: &[midly::TrackEvent], index: usize, tempo_map: &TempoMap) -> MidiFileTrack {
    let mut decoded = MidiFileTrack {
        name: format!("Track {}", index + 1),
        ..MidiFileTrack::default()
    };
    let mut channel: Option<u8> = None;
    // (channel, key) -> open (start tick, velocity), first in first out
    let mut open: HashMap<(u8, u8), VecDeque<(u64, u8)>> = HashMap::new();
    let mut tick = 0u64;

    for event in track {
        tick += event.delta.as_int() as u64;

        match event.kind {
            TrackEventKind::Meta(MetaMessage::TrackName(name)) => {
                decoded.name = String::from_utf8_lossy(name).into_owned();
            }
            TrackEventKind::Midi { channel: ch, message } => {
                let ch = ch.as_int();
                match message {
                    MidiMessage::NoteOn { key, vel } if vel.as_int() > 0 => {
                        channel.get_or_insert(ch);
                        open.entry((ch, key.as_int())).or_default().push_back((tick, vel.as_int()));
                    }
                    MidiMessage::NoteOn { key, .. } | MidiMessage::NoteOff { key, .. } => {
                        let started = open.get_mut(&(ch, key.as_int())).and_then(VecDeque::pop_front);
                        if let Some((start_tick, vel)) = started {
                            decoded.notes.push(make_note(key.as_int(), start_tick, tick, vel, tempo_map));
                        }
                    }
                    MidiMessage::Controller { controller, value } => {
                        channel.get_or_insert(ch);
                        decoded.control_changes.push(MidiFileControlChange {
                            number: controller.as_int(),
                            value: midi_to_unit(value.as_int()),
                            time: tempo_map.seconds_at(tick),
                        });
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    // Notes never released close at the end of the track
    for ((_, key), starts) in open {
        for (start_tick, vel) in starts {
            decoded.notes.push(make_note(key, start_tick, tick, vel, tempo_map));
        }
    }

    decoded
        .notes
        .sort_by(|a, b| a.time.total_cmp(&b.time).then(a.midi.cmp(&b.midi)));
    decoded.channel = channel.unwrap_or(0);
    decoded
}

fn make_note(key: u8, start_tick: u64, end_tick: u64, vel: u8, tempo_map: &TempoMap) -> MidiFileNote {
    let time = tempo_map.seconds_at(start_tick);
    MidiFileNote {
        midi: key,
        time,
        duration: tempo_map.seconds_at(end_tick) - time,
        velocity: midi_to_unit(vel),
    }
}

/// Tick -> seconds conversion honoring tempo changes
struct TempoMap {
    ticks_per_quarter: f64,
    /// Set for SMPTE timecode files, where ticks are absolute
    ticks_per_second: Option<f64>,
    /// (tick, microseconds per quarter), sorted by tick
    changes: Vec<(u64, f64)>,
}

impl TempoMap {
    fn from_smf(smf: &Smf) -> Self {
        let (ticks_per_quarter, ticks_per_second) = match smf.header.timing {
            Timing::Metrical(tpq) => (tpq.as_int().max(1) as f64, None),
            Timing::Timecode(fps, subframe) => (1.0, Some(fps.as_f32() as f64 * subframe.max(1) as f64)),
        };

        let mut changes = Vec::new();
        for track in &smf.tracks {
            let mut tick = 0u64;
            for event in track {
                tick += event.delta.as_int() as u64;
                if let TrackEventKind::Meta(MetaMessage::Tempo(us)) = event.kind {
                    changes.push((tick, us.as_int() as f64));
                }
            }
        }
        changes.sort_by_key(|(tick, _)| *tick);

        Self {
            ticks_per_quarter,
            ticks_per_second,
            changes,
        }
    }

    fn seconds_at(&self, tick: u64) -> f64 {
        if let Some(tps) = self.ticks_per_second {
            return tick as f64 / tps;
        }

        let mut seconds = 0.0;
        let mut last_tick = 0u64;
        let mut us_per_quarter = DEFAULT_US_PER_QUARTER;
        for &(change_tick, change_us) in &self.changes {
            if change_tick > tick {
                break;
            }
            seconds += self.span_seconds(change_tick - last_tick, us_per_quarter);
            last_tick = change_tick;
            us_per_quarter = change_us;
        }
        seconds + self.span_seconds(tick - last_tick, us_per_quarter)
    }

    fn span_seconds(&self, ticks: u64, us_per_quarter: f64) -> f64 {
        ticks as f64 / self.ticks_per_quarter * us_per_quarter / 1_000_000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use midly::{Format, Header, TrackEvent};

    fn note_on(delta: u32, key: u8, vel: u8) -> TrackEvent<'static> {
        TrackEvent {
            delta: delta.into(),
            kind: TrackEventKind::Midi {
                channel: 2.into(),
                message: MidiMessage::NoteOn { key: key.into(), vel: vel.into() },
            },
        }
    }

    fn end_of_track() -> TrackEvent<'static> {
        TrackEvent {
            delta: 0.into(),
            kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
        }
    }

    fn write(tracks: Vec<Vec<TrackEvent<'static>>>) -> Vec<u8> {
        let smf = Smf {
            header: Header {
                format: Format::Parallel,
                timing: Timing::Metrical(480.into()),
            },
            tracks,
        };
        let mut out = Vec::new();
        smf.write(&mut out).expect("Failed to write test SMF");
        out
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode_smf(b"definitely not a midi file");
        assert!(matches!(result, Err(MidiFileError::Parse(_))));
    }

    #[test]
    fn test_velocity_zero_note_on_is_note_off() {
        let bytes = write(vec![vec![note_on(0, 60, 127), note_on(480, 60, 0), end_of_track()]]);
        let tracks = decode_smf(&bytes).unwrap();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].channel, 2);
        let note = &tracks[0].notes[0];
        assert_eq!(note.midi, 60);
        assert_eq!(note.time, 0.0);
        // 480 ticks at the default 120 BPM
        assert!((note.duration - 0.5).abs() < 1e-9);
        assert_eq!(note.velocity, 1.0);
    }

    #[test]
    fn test_tempo_change_applies_to_later_ticks() {
        let conductor = vec![
            TrackEvent { delta: 0.into(), kind: TrackEventKind::Meta(MetaMessage::Tempo(500_000.into())) },
            // 60 BPM from beat 1 on
            TrackEvent { delta: 480.into(), kind: TrackEventKind::Meta(MetaMessage::Tempo(1_000_000.into())) },
            end_of_track(),
        ];
        let part = vec![note_on(960, 64, 100), note_on(480, 64, 0), end_of_track()];
        let tracks = decode_smf(&write(vec![conductor, part])).unwrap();

        assert_eq!(tracks.len(), 1);
        let note = &tracks[0].notes[0];
        // 0.5s for the first beat, then 1.0s for the second
        assert!((note.time - 1.5).abs() < 1e-9);
        assert!((note.duration - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_unterminated_note_closes_at_track_end() {
        let bytes = write(vec![vec![
            note_on(0, 60, 100),
            TrackEvent { delta: 960.into(), kind: TrackEventKind::Meta(MetaMessage::EndOfTrack) },
        ]]);
        let tracks = decode_smf(&bytes).unwrap();
        assert!((tracks[0].notes[0].duration - 1.0).abs() < 1e-9);
    }
}
