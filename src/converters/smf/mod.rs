//! Standard MIDI File import/export
//!
//! The SMF byte layout is handled by `midly`. This module only maps between
//! SMF tracks, the interchange records (seconds, 0-1 velocity) and the event
//! log vocabulary.

mod interchange;
mod model;
mod parse;
mod write;

pub use interchange::{events_from_tracks, track_from_events};
pub use model::*;
pub use parse::decode_smf;
pub use write::encode_smf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MidiFileError {
    #[error("failed to parse MIDI: {0}")]
    Parse(String),
    #[error("midi write error: {0}")]
    Write(String),
    #[error("no events to export")]
    NothingToExport,
}

pub type Result<T> = std::result::Result<T, MidiFileError>;
