//! # Sync
//!
//! The buffer of record is a [`TextContainer`]. Local edits reach it as
//! minimal insert/delete calls produced by [`translate`]; remote peers
//! exchange exported payloads; persistence writes those payloads off the
//! keystroke path.

pub mod container;
pub mod persist;
pub mod rope_text;
pub mod translate;

pub use container::{ExportMode, PeerId, TextContainer, VersionVector};
pub use persist::{
    DirectoryHooks, PersistKind, PersistOutcome, PersistRequest, PersistSchedule, PersistenceHooks,
    PersistenceWorker,
};
pub use rope_text::{LoggedOp, OpId, RopeText, TextOp};
pub use translate::{DiffRun, DiffTag, diff_runs, replay, translate};
