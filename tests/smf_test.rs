// Standard MIDI File import/export round trips through the editor

use sequencer_wasm::converters::smf::{decode_smf, encode_smf, MidiFileError};
use sequencer_wasm::editor::{ImportMode, ImportOptions, LoadStatus, MidiEditor};
use sequencer_wasm::models::{ControlChangeEvent, DomainEvent, NoteClip};
use sequencer_wasm::EditorConfig;

/// Helper to create an editor holding one pattern with a sustained phrase
fn pattern_editor() -> MidiEditor {
    let mut editor = MidiEditor::new(EditorConfig::default());
    editor.set_editing_pattern(Some("p1".to_string()));
    editor.add_clip(NoteClip::new("a", 60, 0.0, 500.0, "track-1").with_pattern("p1").with_velocity(127));
    editor.add_clip(NoteClip::new("b", 64, 500.0, 250.0, "track-1").with_pattern("p1").with_velocity(64));
    editor.add_clip(NoteClip::new("other", 48, 0.0, 1000.0, "track-1").with_pattern("p2"));
    editor.append_events(
        vec![
            DomainEvent::ControlChange(ControlChangeEvent::new("down", 0.0, 64, 127, 0)),
            DomainEvent::ControlChange(ControlChangeEvent::new("up", 1000.0, 64, 0, 0)),
        ],
        None,
    );
    editor
}

#[test]
fn test_export_pattern_filters_notes() {
    let editor = pattern_editor();
    let track = editor.export_pattern(None).unwrap();

    let notes: Vec<u8> = track.notes.iter().map(|n| n.midi).collect();
    assert_eq!(notes, vec![60, 64]);
    assert_eq!(track.notes[0].duration, 0.5);
    assert_eq!(track.notes[0].velocity, 1.0);
    assert_eq!(track.control_changes.len(), 2);
}

#[test]
fn test_export_then_import_reproduces_clips() {
    let editor = pattern_editor();
    let bytes = editor.export_pattern_smf(Some("p1")).unwrap();
    assert_eq!(&bytes[0..4], b"MThd");

    let mut imported = MidiEditor::new(EditorConfig::default());
    let options = ImportOptions {
        mode: ImportMode::Replace,
        target_track_id: Some("track-9".to_string()),
        target_pattern_id: Some("p3".to_string()),
    };
    let count = imported.load_from_bytes(&bytes, &options).unwrap();

    // Two note pairs plus two pedal changes
    assert_eq!(count, 6);
    assert_eq!(imported.status(), LoadStatus::Ready);

    let raw = imported.clips_without_sustain();
    assert_eq!(raw.len(), 2);
    assert_eq!(raw[0].note_number, 60);
    assert!((raw[0].duration - 500.0).abs() < 1e-6);
    assert!((raw[1].start - 500.0).abs() < 1e-6);
    assert_eq!(raw[1].velocity, Some(64));
    assert!(raw.iter().all(|c| c.track_id == "track-9"));
    assert!(raw.iter().all(|c| c.pattern_id.as_deref() == Some("p3")));

    // The pedal carries over, so both extended clips end at the release
    assert!(imported.clips().iter().all(|c| (c.end() - 1000.0).abs() < 1e-6));
}

#[test]
fn test_load_garbage_sets_error_status() {
    let mut editor = pattern_editor();
    let before = editor.events().len();

    let result = editor.load_from_bytes(b"not a midi file", &ImportOptions::default());

    assert!(matches!(result, Err(MidiFileError::Parse(_))));
    assert_eq!(editor.status(), LoadStatus::Error);
    assert!(editor.error().unwrap().contains("failed to parse MIDI"));
    assert_eq!(editor.events().len(), before);
}

#[test]
fn test_load_append_keeps_existing_log() {
    let mut editor = pattern_editor();
    let bytes = editor.export_pattern_smf(Some("p1")).unwrap();
    let before = editor.events().len();

    let count = editor.load_from_bytes(&bytes, &ImportOptions::default()).unwrap();

    assert_eq!(editor.events().len(), before + count);
}

#[test]
fn test_codec_round_trip_at_other_tempo() {
    let editor = pattern_editor();
    let track = editor.export_pattern(Some("p1")).unwrap();

    let bytes = encode_smf(&track, 90.0, 960).unwrap();
    let decoded = decode_smf(&bytes).unwrap();

    assert_eq!(decoded.len(), 1);
    assert_eq!(decoded[0].notes.len(), 2);
    assert!((decoded[0].notes[1].time - 0.5).abs() < 1e-3);
    assert!((decoded[0].notes[1].duration - 0.25).abs() < 1e-3);
}

#[test]
fn test_export_empty_pattern_fails() {
    let editor = MidiEditor::new(EditorConfig::default());
    let result = editor.export_pattern_smf(Some("nothing"));
    assert!(matches!(result, Err(MidiFileError::NothingToExport)));
}
