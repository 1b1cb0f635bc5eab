//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for the notes collection.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `NoteDraft::validate()` before SQL.
//! - Repository APIs report "missing" as `Ok(None)`/`Ok(false)`, and only
//!   store failures as errors.

pub mod note_repo;
