//! WASM API smoke tests
//!
//! Run in a browser with `wasm-pack test --headless --chrome`.

#![cfg(target_arch = "wasm32")]

use sequencer_wasm::api::{IncrementalDeriver, SequencerEditor};
use sequencer_wasm::models::{DomainEvent, NoteClip, NoteEvent};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn to_js<T: serde::Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap()
}

fn note_pair(note_id: &str, start: f64, end: f64) -> Vec<DomainEvent> {
    vec![
        DomainEvent::NoteOn(NoteEvent::new(format!("{}-on", note_id), note_id, start, 60, 100, 0)),
        DomainEvent::NoteOff(NoteEvent::new(format!("{}-off", note_id), note_id, end, 60, 0, 0)),
    ]
}

#[wasm_bindgen_test]
fn test_editor_creation() {
    let editor = SequencerEditor::new(JsValue::UNDEFINED);
    assert!(editor.is_ok());
}

#[wasm_bindgen_test]
fn test_add_clip_and_read_back() {
    let mut editor = SequencerEditor::new(JsValue::UNDEFINED).unwrap();
    let clip = NoteClip::new("a", 60, 0.0, 500.0, "track-1");

    editor.add_clip(to_js(&clip)).unwrap();

    let clips: Vec<NoteClip> = serde_wasm_bindgen::from_value(editor.get_clips().unwrap()).unwrap();
    assert_eq!(clips.len(), 1);
    assert_eq!(clips[0].duration, 500.0);
}

#[wasm_bindgen_test]
fn test_invalid_events_are_rejected() {
    let mut editor = SequencerEditor::new(JsValue::UNDEFINED).unwrap();
    let result = editor.append_events(JsValue::from_str("nope"), None);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_incremental_deriver() {
    let mut deriver = IncrementalDeriver::new("track-1".to_string());
    let events = note_pair("n1", 0.0, 250.0);

    deriver.push(to_js(&events[..1])).unwrap();
    assert_eq!(deriver.open_note_count(), 1);

    deriver.push(to_js(&events[1..])).unwrap();
    assert_eq!(deriver.open_note_count(), 0);
}

#[wasm_bindgen_test]
fn test_export_without_pattern_is_error() {
    let editor = SequencerEditor::new(JsValue::UNDEFINED).unwrap();
    assert!(editor.export_pattern(None).is_err());
}

#[wasm_bindgen_test]
fn test_load_garbage_is_error() {
    let mut editor = SequencerEditor::new(JsValue::UNDEFINED).unwrap();
    let result = editor.load_from_array_buffer(b"not a midi file", JsValue::UNDEFINED);
    assert!(result.is_err());
}

#[wasm_bindgen_test]
fn test_add_clip_clamps_js_numbers() {
    let mut editor = SequencerEditor::new(JsValue::UNDEFINED).unwrap();
    let clip = js_sys::JSON::parse(
        r#"{"id":"a","noteNumber":-3,"velocity":130,"start":0,"duration":100,"trackId":"track-1"}"#,
    )
    .unwrap();

    editor.add_clip(clip).unwrap();

    let clips: Vec<NoteClip> = serde_wasm_bindgen::from_value(editor.get_clips().unwrap()).unwrap();
    assert_eq!((clips[0].note_number, clips[0].velocity), (0, Some(127)));
}
