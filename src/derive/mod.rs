//! MIDI event derivation engine
//!
//! Turns the raw event log into the clip projections the piano roll renders:
//! sustain-extended clips, sustain-ignoring clips and control-change records.
//!
//! - `batch`: pure full-log derivation with tail padding
//! - `incremental`: streaming derivation over new events plus carried state
//! - `matcher` / `state`: the matching rules both paths share

pub mod batch;
pub mod incremental;
mod matcher;
mod state;

pub use batch::{derive_from_events, DeriveResult};
pub use incremental::{derive_incremental, IncrementalDeriveResult};
pub use matcher::{insert_sorted, sort_clips};
pub use state::IncrementalDeriveState;
