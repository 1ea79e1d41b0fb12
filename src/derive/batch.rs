//! Batch derivation: full event log -> clip projections
//!
//! # Algorithm
//! 1. Stable-sort the events by timestamp
//! 2. Feed them through the shared [`Matcher`]
//! 3. Force-close whatever is still open at `last + TAIL_PADDING_MS`
//! 4. Sort both clip lists by (start, note number)

use serde::{Deserialize, Serialize};

use super::matcher::{sort_clips, Matcher, TrackResolver};
use super::state::IncrementalDeriveState;
use crate::models::defaults::TAIL_PADDING_MS;
use crate::models::{ControlChangeRecord, DomainEvent, NoteClip};

/// Output of a derivation pass
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeriveResult {
    /// Clips extended by the sustain pedal
    pub clips: Vec<NoteClip>,
    /// Clips closed at the key release
    pub clips_without_sustain: Vec<NoteClip>,
    pub control_events: Vec<ControlChangeRecord>,
}

/// Derive clips and control-change records from an unordered event log
///
/// # Arguments
/// * `events` - The event log, in any order
/// * `track_hint` - Track for notes with no previously known track
/// * `existing_clips` - Prior projection, used to keep each note on its track
pub fn derive_from_events(
    events: &[DomainEvent],
    track_hint: Option<&str>,
    existing_clips: Option<&[NoteClip]>,
) -> DeriveResult {
    if events.is_empty() {
        return DeriveResult::default();
    }

    let mut sorted: Vec<&DomainEvent> = events.iter().collect();
    sorted.sort_by(|a, b| a.timestamp().total_cmp(&b.timestamp()));

    let last_ms = sorted
        .iter()
        .map(|event| event.timestamp())
        .fold(f64::NEG_INFINITY, f64::max);
    let tail_ms = last_ms + TAIL_PADDING_MS;

    let mut state = IncrementalDeriveState::new();
    let mut matcher = Matcher::new(&mut state, TrackResolver::new(track_hint, existing_clips));

    for event in sorted {
        matcher.process(event);
    }
    matcher.close_all(last_ms, tail_ms);

    let Matcher {
        mut clips,
        raw_clips: mut clips_without_sustain,
        control_events,
        ..
    } = matcher;

    sort_clips(&mut clips);
    sort_clips(&mut clips_without_sustain);

    log::debug!(
        "derived {} clips ({} without sustain, {} cc) from {} events",
        clips.len(),
        clips_without_sustain.len(),
        control_events.len(),
        events.len()
    );

    DeriveResult {
        clips,
        clips_without_sustain,
        control_events,
    }
}
