//! Serde helpers for MIDI numbers arriving from JavaScript
//!
//! JS numbers may be fractional or out of range. These read any number and
//! clamp it into the field's MIDI range instead of failing.

use serde::{Deserialize, Deserializer};

use super::defaults::MAX_CHANNEL;
use crate::utils::midi_utils::{clamp_cc, clamp_note, clamp_velocity};

/// Note number: rounded, clamped to 0-127
pub fn deserialize_note_number<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(clamp_note(value.round() as i32))
}

/// Velocity: rounded, clamped to 0-127
pub fn deserialize_velocity<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_velocity)
}

/// Optional velocity; `null` stays `None`
pub fn deserialize_optional_velocity<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(clamp_velocity))
}

/// Controller number or value: rounded, clamped to 0-127
pub fn deserialize_midi_value<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(clamp_cc)
}

/// MIDI channel: rounded, clamped to 0-15
pub fn deserialize_channel<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Ok(clamp_cc(value).min(MAX_CHANNEL))
}
