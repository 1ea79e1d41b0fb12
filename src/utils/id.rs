//! Id generation for clips and events
//!
//! Ids carry a human readable prefix (useful when inspecting the event log in
//! devtools) plus a short random suffix from `uuid`.

use uuid::Uuid;

/// Short random token (8 hex chars)
pub fn generate_id() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(8);
    simple
}

/// Id for a newly created clip, e.g. `clip-60-1500-1a2b3c4d`
pub fn generate_clip_id(note_number: u8, start_ms: f64) -> String {
    format!("clip-{}-{}-{}", note_number, start_ms.round() as i64, generate_id())
}

/// Id for a NoteOn/NoteOff event of `note_id` (`suffix` is "on" or "off")
pub fn generate_event_id(note_id: &str, suffix: &str) -> String {
    format!("evt-{}-{}-{}", note_id, suffix, generate_id())
}

/// Id for an imported control change event
pub fn generate_cc_id(controller: u8, timestamp_ms: f64) -> String {
    format!("evt-cc-{}-{}-{}", controller, timestamp_ms.round() as i64, generate_id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_is_short_and_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_eq!(a.len(), 8);
        assert_ne!(a, b);
    }

    #[test]
    fn test_clip_id_prefix() {
        let id = generate_clip_id(60, 1500.4);
        assert!(id.starts_with("clip-60-1500-"));
    }

    #[test]
    fn test_event_id_prefix() {
        assert!(generate_event_id("clip-1", "on").starts_with("evt-clip-1-on-"));
        assert!(generate_cc_id(64, 10.0).starts_with("evt-cc-64-10-"));
    }
}
