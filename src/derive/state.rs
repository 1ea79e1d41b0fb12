//! Carry-forward matching state
//!
//! Holds the in-flight notes, the sustain queues and the pedal state. Batch
//! derivation builds a fresh one per pass; live recording keeps one per track
//! across calls.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::models::defaults::MIN_DURATION_MS;
use crate::models::{NoteClip, NoteEvent};

/// (channel, note number) key of an active note stack
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NoteKey {
    pub channel: u8,
    pub note_number: u8,
}

impl NoteKey {
    pub fn of(event: &NoteEvent) -> Self {
        Self {
            channel: event.channel,
            note_number: event.note_number,
        }
    }
}

/// A NoteOn occurrence waiting for its NoteOff
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ActiveNote {
    pub note_id: String,
    pub note_number: u8,
    pub start_ms: f64,
    pub velocity: u8,
    pub channel: u8,
    pub track_id: String,
    pub pattern_id: Option<String>,
    /// Opening order, used to keep end-of-stream closing deterministic
    pub seq: u64,
}

impl ActiveNote {
    pub fn to_clip(&self, end_ms: f64) -> NoteClip {
        let mut clip = NoteClip::new(
            self.note_id.clone(),
            self.note_number,
            self.start_ms,
            (end_ms - self.start_ms).max(MIN_DURATION_MS),
            self.track_id.clone(),
        );
        clip.channel = self.channel;
        clip.velocity = Some(self.velocity);
        clip.pattern_id = self.pattern_id.clone();
        clip
    }
}

/// Matching state threaded across successive incremental derivation calls
///
/// Owned by the caller (one per recording track). `Default` is the empty state
/// a recording session starts from.
#[derive(Clone, Debug, Default)]
pub struct IncrementalDeriveState {
    active: HashMap<NoteKey, Vec<ActiveNote>>,
    pending_sustain: BTreeMap<u8, VecDeque<ActiveNote>>,
    pedal_down: BTreeMap<u8, bool>,
    next_seq: u64,
}

impl IncrementalDeriveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes that have been opened but not released
    pub fn open_note_count(&self) -> usize {
        self.active.values().map(Vec::len).sum()
    }

    /// Number of released notes waiting on the sustain pedal of `channel`
    pub fn pending_sustain_count(&self, channel: u8) -> usize {
        self.pending_sustain.get(&channel).map_or(0, VecDeque::len)
    }

    pub fn is_pedal_down(&self, channel: u8) -> bool {
        self.pedal_down.get(&channel).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
            && self.pending_sustain.values().all(VecDeque::is_empty)
            && self.pedal_down.values().all(|down| !down)
    }

    /// Notes not closed yet: held keys plus releases waiting on the pedal
    ///
    /// Each clip is zero-length at its start and only carries identity and
    /// track.
    pub(crate) fn unfinished_clips(&self) -> Vec<NoteClip> {
        self.active
            .values()
            .flatten()
            .chain(self.pending_sustain.values().flatten())
            .map(|note| note.to_clip(note.start_ms))
            .collect()
    }

    pub(crate) fn open(&mut self, event: &NoteEvent, track_id: String) {
        let note = ActiveNote {
            note_id: event.note_id.clone(),
            note_number: event.note_number,
            start_ms: event.timestamp,
            velocity: event.velocity,
            channel: event.channel,
            track_id,
            pattern_id: event.pattern_id.clone(),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.active.entry(NoteKey::of(event)).or_default().push(note);
    }

    /// Remove the note a NoteOff closes
    ///
    /// Matches by noteId first (most recently opened occurrence of that id).
    /// When no open note carries the id, falls back to the top of the
    /// (channel, note) stack. Returns `None` when nothing is open on that key.
    pub(crate) fn take_matching(&mut self, event: &NoteEvent) -> Option<ActiveNote> {
        let by_id = self
            .active
            .iter()
            .filter_map(|(key, stack)| {
                stack
                    .iter()
                    .rposition(|note| note.note_id == event.note_id)
                    .map(|idx| (*key, idx, stack[idx].seq))
            })
            .max_by_key(|(_, _, seq)| *seq);

        let (key, idx) = match by_id {
            Some((key, idx, _)) => (key, idx),
            None => {
                let key = NoteKey::of(event);
                let top = self.active.get(&key)?.len().checked_sub(1)?;
                (key, top)
            }
        };

        let stack = self.active.get_mut(&key)?;
        let note = stack.remove(idx);
        if stack.is_empty() {
            self.active.remove(&key);
        }
        Some(note)
    }

    pub(crate) fn queue_sustain(&mut self, channel: u8, note: ActiveNote) {
        self.pending_sustain.entry(channel).or_default().push_back(note);
    }

    /// Update the pedal of `channel`; returns true on a down -> up transition
    pub(crate) fn set_pedal(&mut self, channel: u8, down: bool) -> bool {
        let was_down = self.pedal_down.insert(channel, down).unwrap_or(false);
        was_down && !down
    }

    pub(crate) fn drain_sustain(&mut self, channel: u8) -> Vec<ActiveNote> {
        self.pending_sustain
            .get_mut(&channel)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// All still-open notes in the order they were opened
    pub(crate) fn drain_open(&mut self) -> Vec<ActiveNote> {
        let mut open: Vec<ActiveNote> = self.active.drain().flat_map(|(_, stack)| stack).collect();
        open.sort_by_key(|note| note.seq);
        open
    }

    pub(crate) fn pedal_channels(&self) -> Vec<(u8, bool)> {
        self.pedal_down.iter().map(|(channel, down)| (*channel, *down)).collect()
    }

    pub(crate) fn pending_channels(&self) -> Vec<u8> {
        self.pending_sustain
            .iter()
            .filter(|(_, queue)| !queue.is_empty())
            .map(|(channel, _)| *channel)
            .collect()
    }
}
