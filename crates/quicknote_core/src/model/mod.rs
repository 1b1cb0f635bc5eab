//! Domain model for the notes collection.
//!
//! # Responsibility
//! - Define the canonical note document and its write-side draft.
//! - Own title/tag normalization rules shared by every write path.
//!
//! # Invariants
//! - Every persisted note is identified by a stable `NoteId`.
//! - Titles are non-empty after trimming; titles are not unique.

pub mod note;
