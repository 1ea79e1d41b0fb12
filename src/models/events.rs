//! Domain events: the atomic units of the event log
//!
//! The event log is the single source of truth for a pattern. Clips are only
//! ever derived from it (see [`crate::derive`]).

use serde::{Deserialize, Serialize};

use super::serde_helpers::{deserialize_channel, deserialize_midi_value, deserialize_note_number, deserialize_velocity};

/// Payload shared by NoteOn and NoteOff events
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// Unique event id
    pub id: String,

    /// Milliseconds from the start of the timeline
    pub timestamp: f64,

    /// MIDI note number (0-127)
    #[serde(deserialize_with = "deserialize_note_number")]
    pub note_number: u8,

    /// MIDI velocity (0-127)
    #[serde(deserialize_with = "deserialize_velocity")]
    pub velocity: u8,

    #[serde(deserialize_with = "deserialize_channel")]
    pub channel: u8,

    /// Correlates a NoteOn with its NoteOff; becomes the clip id
    pub note_id: String,

    /// Track this note belongs to, if assigned yet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_id: Option<String>,

    /// Pattern this note belongs to, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<String>,
}

impl NoteEvent {
    pub fn new(
        id: impl Into<String>,
        note_id: impl Into<String>,
        timestamp: f64,
        note_number: u8,
        velocity: u8,
        channel: u8,
    ) -> Self {
        Self {
            id: id.into(),
            timestamp,
            note_number,
            velocity,
            channel,
            note_id: note_id.into(),
            track_id: None,
            pattern_id: None,
        }
    }

    pub fn with_track(mut self, track_id: impl Into<String>) -> Self {
        self.track_id = Some(track_id.into());
        self
    }

    pub fn with_pattern(mut self, pattern_id: impl Into<String>) -> Self {
        self.pattern_id = Some(pattern_id.into());
        self
    }
}

/// Control change (CC) event
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlChangeEvent {
    pub id: String,
    pub timestamp: f64,
    /// Controller number (0-127), 64 = sustain pedal
    #[serde(deserialize_with = "deserialize_midi_value")]
    pub controller: u8,
    /// Controller value (0-127)
    #[serde(deserialize_with = "deserialize_midi_value")]
    pub value: u8,
    #[serde(deserialize_with = "deserialize_channel")]
    pub channel: u8,
}

impl ControlChangeEvent {
    pub fn new(id: impl Into<String>, timestamp: f64, controller: u8, value: u8, channel: u8) -> Self {
        Self {
            id: id.into(),
            timestamp,
            controller,
            value,
            channel,
        }
    }
}

/// One entry of the event log
///
/// Serialized with a `type` tag (`noteOn`, `noteOff`, `cc`) so the JS side can
/// switch on it directly.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum DomainEvent {
    #[serde(rename = "noteOn")]
    NoteOn(NoteEvent),
    #[serde(rename = "noteOff")]
    NoteOff(NoteEvent),
    #[serde(rename = "cc")]
    ControlChange(ControlChangeEvent),
}

impl DomainEvent {
    pub fn id(&self) -> &str {
        match self {
            DomainEvent::NoteOn(note) | DomainEvent::NoteOff(note) => &note.id,
            DomainEvent::ControlChange(cc) => &cc.id,
        }
    }

    pub fn timestamp(&self) -> f64 {
        match self {
            DomainEvent::NoteOn(note) | DomainEvent::NoteOff(note) => note.timestamp,
            DomainEvent::ControlChange(cc) => cc.timestamp,
        }
    }

    pub fn set_timestamp(&mut self, timestamp: f64) {
        match self {
            DomainEvent::NoteOn(note) | DomainEvent::NoteOff(note) => note.timestamp = timestamp,
            DomainEvent::ControlChange(cc) => cc.timestamp = timestamp,
        }
    }

    /// The correlating note id, `None` for control changes
    pub fn note_id(&self) -> Option<&str> {
        self.as_note().map(|note| note.note_id.as_str())
    }

    pub fn as_note(&self) -> Option<&NoteEvent> {
        match self {
            DomainEvent::NoteOn(note) | DomainEvent::NoteOff(note) => Some(note),
            DomainEvent::ControlChange(_) => None,
        }
    }

    pub fn as_note_mut(&mut self) -> Option<&mut NoteEvent> {
        match self {
            DomainEvent::NoteOn(note) | DomainEvent::NoteOff(note) => Some(note),
            DomainEvent::ControlChange(_) => None,
        }
    }

    /// True for NoteOn/NoteOff events belonging to `note_id`
    pub fn belongs_to(&self, note_id: &str) -> bool {
        self.note_id() == Some(note_id)
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, DomainEvent::NoteOn(_))
    }

    pub fn is_note_off(&self) -> bool {
        matches!(self, DomainEvent::NoteOff(_))
    }
}
