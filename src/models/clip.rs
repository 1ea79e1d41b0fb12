//! Derived projections of the event log

use serde::{Deserialize, Serialize};

use super::events::ControlChangeEvent;
use super::serde_helpers::{deserialize_channel, deserialize_note_number, deserialize_optional_velocity};
use crate::utils::midi_utils::midi_number_to_name;

/// A renderable note region derived from a NoteOn/NoteOff pair
///
/// Clips are never mutated in place by the editor: edits rewrite the event log
/// and the clip lists are derived again.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteClip {
    /// Source noteId
    pub id: String,
    #[serde(deserialize_with = "deserialize_note_number")]
    pub note_number: u8,
    /// Display name derived from the note number (e.g. "C4")
    #[serde(default)]
    pub note_name: String,
    #[serde(default, deserialize_with = "deserialize_channel")]
    pub channel: u8,
    #[serde(default, deserialize_with = "deserialize_optional_velocity")]
    pub velocity: Option<u8>,
    /// Start in milliseconds
    pub start: f64,
    /// Duration in milliseconds, never below 1
    pub duration: f64,
    pub track_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_id: Option<String>,
}

impl NoteClip {
    pub fn new(id: impl Into<String>, note_number: u8, start: f64, duration: f64, track_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            note_number,
            note_name: midi_number_to_name(note_number),
            channel: 0,
            velocity: None,
            start,
            duration,
            track_id: track_id.into(),
            pattern_id: None,
        }
    }

    pub fn with_velocity(mut self, velocity: u8) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn with_channel(mut self, channel: u8) -> Self {
        self.channel = channel;
        self
    }

    pub fn with_pattern(mut self, pattern_id: impl Into<String>) -> Self {
        self.pattern_id = Some(pattern_id.into());
        self
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    /// Change the note number, keeping the display name in sync
    pub fn set_note_number(&mut self, note_number: u8) {
        self.note_number = note_number;
        self.note_name = midi_number_to_name(note_number);
    }
}

/// Pass-through projection of a control change event
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ControlChangeRecord {
    pub id: String,
    pub timestamp: f64,
    pub controller: u8,
    pub value: u8,
    pub channel: u8,
}

impl From<&ControlChangeEvent> for ControlChangeRecord {
    fn from(event: &ControlChangeEvent) -> Self {
        Self {
            id: event.id.clone(),
            timestamp: event.timestamp,
            controller: event.controller,
            value: event.value,
            channel: event.channel,
        }
    }
}
