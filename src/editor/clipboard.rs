//! Copy/cut/paste of clip selections

use serde::{Deserialize, Serialize};

use super::{note_events_from_clip, MidiEditor};
use crate::models::NoteClip;
use crate::utils::id::generate_clip_id;
use crate::utils::midi_utils::clamp_note;

/// One copied clip, relative to the earliest copied start
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardItem {
    pub offset: f64,
    pub duration: f64,
    pub note_number: u8,
    pub velocity: Option<u8>,
    pub track_id: String,
    pub channel: u8,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Clipboard {
    pub items: Vec<ClipboardItem>,
    /// Note number of the earliest-starting clip; paste transposes against it
    pub base_note_number: u8,
}

impl Clipboard {
    /// Snapshot `clips`; `None` for an empty selection
    pub fn from_clips(clips: &[&NoteClip]) -> Option<Self> {
        let anchor = clips
            .iter()
            .copied()
            .reduce(|earliest, clip| if clip.start < earliest.start { clip } else { earliest })?;

        let items = clips
            .iter()
            .map(|clip| ClipboardItem {
                offset: clip.start - anchor.start,
                duration: clip.duration,
                note_number: clip.note_number,
                velocity: clip.velocity,
                track_id: clip.track_id.clone(),
                channel: clip.channel,
            })
            .collect();

        Some(Self {
            items,
            base_note_number: anchor.note_number,
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Build fresh clips with the anchor placed at (`target_ms`, `target_note`)
    pub fn instantiate(
        &self,
        target_ms: f64,
        target_note: i32,
        track_id: &str,
        pattern_id: Option<&str>,
    ) -> Vec<NoteClip> {
        let transpose = target_note - self.base_note_number as i32;

        self.items
            .iter()
            .map(|item| {
                let note_number = clamp_note(item.note_number as i32 + transpose);
                let start = (target_ms + item.offset).max(0.0);
                let mut clip = NoteClip::new(
                    generate_clip_id(note_number, start),
                    note_number,
                    start,
                    item.duration,
                    track_id,
                )
                .with_channel(item.channel);
                clip.velocity = item.velocity;
                if let Some(pattern_id) = pattern_id {
                    clip = clip.with_pattern(pattern_id);
                }
                clip
            })
            .collect()
    }
}

impl MidiEditor {
    pub fn clipboard(&self) -> Option<&Clipboard> {
        self.clipboard.as_ref()
    }

    /// Copy the selected clips; returns the number copied
    ///
    /// An empty selection leaves the clipboard as it was.
    pub fn copy_selected_clips(&mut self) -> usize {
        let selected: Vec<&NoteClip> = self
            .derived
            .clips
            .iter()
            .filter(|clip| self.selected_clip_ids.contains(&clip.id))
            .collect();

        match Clipboard::from_clips(&selected) {
            Some(clipboard) => {
                let count = clipboard.len();
                self.clipboard = Some(clipboard);
                count
            }
            None => 0,
        }
    }

    /// Copy, then delete the selected clips and clear the selection
    pub fn cut_selected_clips(&mut self) -> usize {
        let count = self.copy_selected_clips();
        if count == 0 {
            return 0;
        }

        let selected = std::mem::take(&mut self.selected_clip_ids);
        self.events
            .retain(|event| event.note_id().map_or(true, |id| !selected.iter().any(|s| s == id)));
        self.rederive();
        count
    }

    /// Paste with the earliest clip at `target_ms` and transposed onto `target_note`
    ///
    /// Pasted clips go to the active track and editing pattern and become the
    /// selection. Returns their ids.
    pub fn paste_clips_at(&mut self, target_ms: f64, target_note: i32) -> Vec<String> {
        let Some(clipboard) = self.clipboard.as_ref().filter(|c| !c.is_empty()) else {
            return Vec::new();
        };

        let track_id = self.active_track_id();
        let pasted = clipboard.instantiate(
            target_ms,
            target_note,
            &track_id,
            self.context.editing_pattern_id.as_deref(),
        );

        let velocity = self.config.default_velocity;
        for clip in &pasted {
            self.events.extend(note_events_from_clip(clip, velocity));
        }
        self.rederive_with(&pasted);

        let ids: Vec<String> = pasted.into_iter().map(|clip| clip.id).collect();
        self.selected_clip_ids = ids.clone();
        log::debug!("pasted {} clips at {}ms", ids.len(), target_ms);
        ids
    }
}
