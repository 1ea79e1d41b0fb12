//! MIDI file import and pattern export

use serde::{Deserialize, Serialize};

use super::MidiEditor;
use crate::converters::smf::{
    decode_smf, encode_smf, events_from_tracks, track_from_events, MidiFileError, MidiFileTrack,
};
use crate::derive::derive_from_events;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Whether imported events join or replace the log
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    #[default]
    Append,
    Replace,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Falls back to the active track
    pub target_track_id: Option<String>,
    /// Falls back to the editing pattern
    pub target_pattern_id: Option<String>,
}

impl ImportOptions {
    pub fn replace() -> Self {
        Self {
            mode: ImportMode::Replace,
            ..Self::default()
        }
    }
}

impl MidiEditor {
    pub fn status(&self) -> LoadStatus {
        self.status
    }

    /// Message of the last failed load
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Decode SMF bytes and import every track
    ///
    /// Returns the number of events added. On failure the log is left as it
    /// was and the status becomes [`LoadStatus::Error`].
    pub fn load_from_bytes(&mut self, bytes: &[u8], options: &ImportOptions) -> Result<usize, MidiFileError> {
        self.recording.clear();
        self.status = LoadStatus::Loading;
        self.error = None;

        match decode_smf(bytes) {
            Ok(tracks) => Ok(self.import_tracks(&tracks, options)),
            Err(err) => {
                log::warn!("MIDI load failed: {}", err);
                self.status = LoadStatus::Error;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Import already-decoded tracks
    pub fn import_tracks(&mut self, tracks: &[MidiFileTrack], options: &ImportOptions) -> usize {
        let track_id = options
            .target_track_id
            .clone()
            .unwrap_or_else(|| self.active_track_id());
        let pattern_id = options
            .target_pattern_id
            .as_deref()
            .or(self.context.editing_pattern_id.as_deref());

        let imported = events_from_tracks(tracks, Some(track_id.as_str()), pattern_id);
        let count = imported.len();

        match options.mode {
            ImportMode::Append => self.events.extend(imported),
            ImportMode::Replace => {
                self.events = imported;
                self.selected_clip_ids.clear();
            }
        }
        self.derived = derive_from_events(&self.events, None, None);
        self.status = LoadStatus::Ready;

        log::debug!("imported {} events from {} tracks", count, tracks.len());
        count
    }

    /// Collect a pattern's events for export
    ///
    /// `None` uses the editing pattern. Returns `None` when there is no
    /// pattern to export or nothing in it.
    pub fn export_pattern(&self, pattern_id: Option<&str>) -> Option<MidiFileTrack> {
        let Some(pattern_id) = pattern_id.or(self.context.editing_pattern_id.as_deref()) else {
            log::warn!("no pattern selected for export");
            return None;
        };

        let track = track_from_events(&self.events, pattern_id, pattern_id);
        if track.is_empty() {
            log::warn!("no events to export for pattern {}", pattern_id);
            return None;
        }
        Some(track)
    }

    /// Export a pattern as SMF bytes at the configured tempo
    pub fn export_pattern_smf(&self, pattern_id: Option<&str>) -> Result<Vec<u8>, MidiFileError> {
        let track = self.export_pattern(pattern_id).ok_or(MidiFileError::NothingToExport)?;
        encode_smf(&track, self.config.tempo_bpm, self.config.ticks_per_quarter)
    }
}
