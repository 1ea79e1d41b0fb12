//! Editor handle exported to JavaScript
//!
//! The JS side owns one `SequencerEditor` per piano roll. Every mutating call
//! returns nothing; the view pulls [`EditorSnapshot`]s or individual lists.

use wasm_bindgen::prelude::*;

use super::helpers::{deserialize, deserialize_or_default, js_error, serialize, to_uint8_array};
use super::types::{EditorSnapshot, PasteResult};
use crate::config::EditorConfig;
use crate::editor::{ClipMove, ImportOptions, MidiEditor, PreviewNote};
use crate::models::{DomainEvent, NoteClip};
use crate::{wasm_info, wasm_log, wasm_warn};

#[wasm_bindgen]
pub struct SequencerEditor {
    inner: MidiEditor,
}

#[wasm_bindgen]
impl SequencerEditor {
    /// Create an editor; `config` may be `undefined` for defaults
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<SequencerEditor, JsValue> {
        let config: EditorConfig = deserialize_or_default(config, "Invalid editor config")?;
        wasm_info!("SequencerEditor created (track {}, {} BPM)", config.default_track_id, config.tempo_bpm);
        Ok(Self {
            inner: MidiEditor::new(config),
        })
    }

    #[wasm_bindgen(js_name = getSnapshot)]
    pub fn get_snapshot(&self) -> Result<JsValue, JsValue> {
        serialize(&EditorSnapshot::from(&self.inner), "Failed to serialize editor snapshot")
    }

    #[wasm_bindgen(js_name = getClips)]
    pub fn get_clips(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.clips(), "Failed to serialize clips")
    }

    #[wasm_bindgen(js_name = getClipsWithoutSustain)]
    pub fn get_clips_without_sustain(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.clips_without_sustain(), "Failed to serialize clips")
    }

    #[wasm_bindgen(js_name = getControlEvents)]
    pub fn get_control_events(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.control_events(), "Failed to serialize control events")
    }

    #[wasm_bindgen(js_name = getEvents)]
    pub fn get_events(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.events(), "Failed to serialize events")
    }

    #[wasm_bindgen(js_name = setActiveTrack)]
    pub fn set_active_track(&mut self, track_id: Option<String>) {
        self.inner.set_active_track(track_id);
    }

    #[wasm_bindgen(js_name = setEditingPattern)]
    pub fn set_editing_pattern(&mut self, pattern_id: Option<String>) {
        self.inner.set_editing_pattern(pattern_id);
    }

    #[wasm_bindgen(js_name = addClip)]
    pub fn add_clip(&mut self, clip: JsValue) -> Result<(), JsValue> {
        let clip: NoteClip = deserialize(clip, "Invalid clip")?;
        self.inner.add_clip(clip);
        Ok(())
    }

    #[wasm_bindgen(js_name = removeClip)]
    pub fn remove_clip(&mut self, clip_id: &str) {
        self.inner.remove_clip(clip_id);
    }

    #[wasm_bindgen(js_name = updateClipDuration)]
    pub fn update_clip_duration(&mut self, clip_id: &str, duration: f64) {
        self.inner.update_clip_duration(clip_id, duration);
    }

    /// `updates`: `[{ id, start, noteNumber }]`
    #[wasm_bindgen(js_name = updateClips)]
    pub fn update_clips(&mut self, updates: JsValue) -> Result<(), JsValue> {
        let updates: Vec<ClipMove> = deserialize(updates, "Invalid clip updates")?;
        wasm_log!("updateClips: {} clips", updates.len());
        self.inner.update_clips(&updates);
        Ok(())
    }

    #[wasm_bindgen(js_name = updateClipVelocity)]
    pub fn update_clip_velocity(&mut self, clip_ids: Vec<String>, velocity: f64) {
        self.inner.update_clip_velocity(&clip_ids, velocity);
    }

    #[wasm_bindgen(js_name = splitClipAt)]
    pub fn split_clip_at(&mut self, clip_id: &str, cut_ms: f64) {
        self.inner.split_clip_at(clip_id, cut_ms);
    }

    #[wasm_bindgen(js_name = setSelectedClipIds)]
    pub fn set_selected_clip_ids(&mut self, ids: Vec<String>) {
        self.inner.set_selected_clip_ids(ids);
    }

    #[wasm_bindgen(js_name = getSelectedClipIds)]
    pub fn get_selected_clip_ids(&self) -> Vec<String> {
        self.inner.selected_clip_ids().to_vec()
    }

    #[wasm_bindgen(js_name = scaleTimeline)]
    pub fn scale_timeline(&mut self, ratio: f64) {
        self.inner.scale_timeline(ratio);
    }

    #[wasm_bindgen(js_name = patternLengthBars)]
    pub fn pattern_length_bars(&self, pattern_id: &str, tempo_bpm: f64) -> u32 {
        self.inner.pattern_length_bars(pattern_id, tempo_bpm)
    }

    #[wasm_bindgen(js_name = copySelectedClips)]
    pub fn copy_selected_clips(&mut self) -> usize {
        self.inner.copy_selected_clips()
    }

    #[wasm_bindgen(js_name = cutSelectedClips)]
    pub fn cut_selected_clips(&mut self) -> usize {
        self.inner.cut_selected_clips()
    }

    #[wasm_bindgen(js_name = pasteClipsAt)]
    pub fn paste_clips_at(&mut self, target_ms: f64, target_note: i32) -> Result<JsValue, JsValue> {
        let pasted_clip_ids = self.inner.paste_clips_at(target_ms, target_note);
        serialize(&PasteResult { pasted_clip_ids }, "Failed to serialize paste result")
    }

    #[wasm_bindgen(js_name = setRecording)]
    pub fn set_recording(&mut self, value: bool) {
        wasm_info!("setRecording: {}", value);
        self.inner.set_recording(value);
    }

    #[wasm_bindgen(js_name = isRecording)]
    pub fn is_recording(&self) -> bool {
        self.inner.is_recording()
    }

    /// `events`: `MidiDomainEvent[]`; `trackId` falls back to the active track
    #[wasm_bindgen(js_name = appendEvents)]
    pub fn append_events(&mut self, events: JsValue, track_id: Option<String>) -> Result<(), JsValue> {
        let events: Vec<DomainEvent> = deserialize(events, "Invalid MIDI events")?;
        self.inner.append_events(events, track_id.as_deref());
        Ok(())
    }

    #[wasm_bindgen(js_name = beginRecordingPreview)]
    pub fn begin_recording_preview(&mut self, note: JsValue) -> Result<(), JsValue> {
        let note: PreviewNote = deserialize(note, "Invalid preview note")?;
        self.inner.begin_recording_preview(note);
        Ok(())
    }

    #[wasm_bindgen(js_name = updateRecordingPreviews)]
    pub fn update_recording_previews(&mut self, current_ms: f64) {
        self.inner.update_recording_previews(current_ms);
    }

    #[wasm_bindgen(js_name = endRecordingPreview)]
    pub fn end_recording_preview(&mut self, note_id: &str) {
        self.inner.end_recording_preview(note_id);
    }

    #[wasm_bindgen(js_name = clearRecordingPreviews)]
    pub fn clear_recording_previews(&mut self) {
        self.inner.clear_recording_previews();
    }

    #[wasm_bindgen(js_name = getRecordingPreviewClips)]
    pub fn get_recording_preview_clips(&self) -> Result<JsValue, JsValue> {
        serialize(&self.inner.recording_preview_clips(), "Failed to serialize preview clips")
    }

    /// Import a Standard MIDI File
    ///
    /// `options`: `{ mode?: "append" | "replace", targetTrackId?, targetPatternId? }`.
    /// Returns the number of imported events. A decode failure is also
    /// reflected in the snapshot status.
    #[wasm_bindgen(js_name = loadFromArrayBuffer)]
    pub fn load_from_array_buffer(&mut self, bytes: &[u8], options: JsValue) -> Result<usize, JsValue> {
        let options: ImportOptions = deserialize_or_default(options, "Invalid import options")?;
        wasm_info!("loadFromArrayBuffer: {} bytes, mode {:?}", bytes.len(), options.mode);

        let count = self
            .inner
            .load_from_bytes(bytes, &options)
            .map_err(|e| js_error("MIDI import error", e))?;

        wasm_info!("  imported {} events", count);
        Ok(count)
    }

    /// Export a pattern as a Standard MIDI File (Format 1)
    #[wasm_bindgen(js_name = exportPattern)]
    pub fn export_pattern(&self, pattern_id: Option<String>) -> Result<js_sys::Uint8Array, JsValue> {
        let bytes = self
            .inner
            .export_pattern_smf(pattern_id.as_deref())
            .map_err(|e| {
                wasm_warn!("exportPattern: {}", e);
                js_error("MIDI export error", e)
            })?;

        wasm_info!("exportPattern: {} bytes", bytes.len());
        Ok(to_uint8_array(&bytes))
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }
}
