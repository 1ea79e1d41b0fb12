//! Incremental derivation for live recording
//!
//! Only the newly appended events are processed, against carried-forward
//! [`IncrementalDeriveState`]. Events must arrive in non-decreasing timestamp
//! order; they are not re-sorted. No tail padding runs mid-stream: notes still
//! held stay in the state until their NoteOff arrives or recording stops and a
//! full batch pass takes over.

use serde::{Deserialize, Serialize};

use super::matcher::{Matcher, TrackResolver};
use super::state::IncrementalDeriveState;
use crate::models::{ControlChangeRecord, DomainEvent, NoteClip};

/// Clips and control records produced by one incremental call
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct IncrementalDeriveResult {
    /// Newly closed sustain-extended clips, in emission order
    pub new_clips: Vec<NoteClip>,
    /// Newly closed clips ignoring the pedal, in emission order
    pub new_clips_without_sustain: Vec<NoteClip>,
    pub control_events: Vec<ControlChangeRecord>,
}

impl IncrementalDeriveResult {
    pub fn is_empty(&self) -> bool {
        self.new_clips.is_empty() && self.new_clips_without_sustain.is_empty() && self.control_events.is_empty()
    }
}

/// Process `new_events` for `track_id`, updating `state` in place
pub fn derive_incremental(
    new_events: &[DomainEvent],
    track_id: &str,
    state: &mut IncrementalDeriveState,
) -> IncrementalDeriveResult {
    let mut matcher = Matcher::new(state, TrackResolver::fixed(track_id));
    for event in new_events {
        matcher.process(event);
    }

    IncrementalDeriveResult {
        new_clips: matcher.clips,
        new_clips_without_sustain: matcher.raw_clips,
        control_events: matcher.control_events,
    }
}
