// Copy, cut and paste through the editor

use sequencer_wasm::editor::MidiEditor;
use sequencer_wasm::models::NoteClip;
use sequencer_wasm::EditorConfig;

/// Helper to create an editor with three clips and the first two selected
fn editor_with_selection() -> MidiEditor {
    let mut editor = MidiEditor::new(EditorConfig::default());
    editor.add_clip(NoteClip::new("a", 60, 1000.0, 200.0, "track-1").with_velocity(80));
    editor.add_clip(NoteClip::new("b", 67, 1250.0, 100.0, "track-1"));
    editor.add_clip(NoteClip::new("c", 72, 3000.0, 100.0, "track-1"));
    editor.set_selected_clip_ids(vec!["a".to_string(), "b".to_string()]);
    editor
}

#[test]
fn test_paste_transposes_relative_to_anchor() {
    let mut editor = editor_with_selection();
    assert_eq!(editor.copy_selected_clips(), 2);

    let pasted = editor.paste_clips_at(4000.0, 64);

    assert_eq!(pasted.len(), 2);
    assert_eq!(editor.clips().len(), 5);
    assert_eq!(editor.selected_clip_ids(), pasted.as_slice());

    let first = editor.clip(&pasted[0]).unwrap();
    assert_eq!((first.start, first.duration, first.note_number), (4000.0, 200.0, 64));
    assert_eq!(first.velocity, Some(80));
    let second = editor.clip(&pasted[1]).unwrap();
    assert_eq!((second.start, second.note_number), (4250.0, 71));
}

#[test]
fn test_paste_transpose_clamps_at_127() {
    let mut editor = MidiEditor::new(EditorConfig::default());
    editor.add_clip(NoteClip::new("low", 60, 0.0, 100.0, "track-1"));
    editor.add_clip(NoteClip::new("high", 125, 100.0, 100.0, "track-1"));
    editor.set_selected_clip_ids(vec!["low".to_string(), "high".to_string()]);
    editor.copy_selected_clips();

    let pasted = editor.paste_clips_at(500.0, 64);

    let notes: Vec<u8> = pasted.iter().map(|id| editor.clip(id).unwrap().note_number).collect();
    assert_eq!(notes, vec![64, 127]);
}

#[test]
fn test_cut_removes_sources() {
    let mut editor = editor_with_selection();

    assert_eq!(editor.cut_selected_clips(), 2);

    assert!(editor.selected_clip_ids().is_empty());
    assert_eq!(editor.clips().len(), 1);
    assert_eq!(editor.events().len(), 2);
    assert_eq!(editor.clipboard().unwrap().len(), 2);

    editor.paste_clips_at(0.0, 60);
    assert_eq!(editor.clips().len(), 3);
}

#[test]
fn test_paste_uses_editing_context() {
    let mut editor = editor_with_selection();
    editor.copy_selected_clips();
    editor.set_active_track(Some("track-4".to_string()));
    editor.set_editing_pattern(Some("pattern-2".to_string()));

    let pasted = editor.paste_clips_at(0.0, 60);

    for id in &pasted {
        let clip = editor.clip(id).unwrap();
        assert_eq!(clip.track_id, "track-4");
        assert_eq!(clip.pattern_id.as_deref(), Some("pattern-2"));
    }
    // Sources stay on their track
    assert_eq!(editor.clip("a").unwrap().track_id, "track-1");
}

#[test]
fn test_empty_clipboard_and_selection_are_noops() {
    let mut editor = editor_with_selection();
    assert!(editor.paste_clips_at(0.0, 60).is_empty());

    editor.set_selected_clip_ids(Vec::new());
    assert_eq!(editor.copy_selected_clips(), 0);
    assert_eq!(editor.cut_selected_clips(), 0);
    assert!(editor.clipboard().is_none());
    assert_eq!(editor.clips().len(), 3);
}

#[test]
fn test_paste_before_zero_clamps_start() {
    let mut editor = editor_with_selection();
    editor.copy_selected_clips();

    let pasted = editor.paste_clips_at(-1000.0, 60);

    for id in &pasted {
        assert_eq!(editor.clip(id).unwrap().start, 0.0);
    }
}
