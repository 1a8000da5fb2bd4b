//! Capture note formatting and vault persistence.
//!
//! Captured messages become timestamped markdown notes in the vault's
//! inbox folder, committed to git and pushed when configured. Saving is
//! best-effort: each stage that completes stays completed even when a
//! later stage fails.

pub mod format;
pub mod store;

pub use format::{format_note, generate_filename, CAPTURE_SUFFIX};
pub use store::{CaptureSummary, NoteStore, SaveOutcome};
