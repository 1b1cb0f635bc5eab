//! Core domain logic for QuickNote.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, StoreConfig, StoreLocation};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::note::{
    normalize_tags, parse_note_id, parse_tag_list, Note, NoteDraft, NoteId, NoteValidationError,
};
pub use repo::note_repo::{
    NoteListQuery, NoteRepository, RepoError, RepoResult, SqliteNoteRepository, StoreStatus,
};
pub use service::note_service::{
    content_preview, NoteService, NoteServiceError, NoteServiceResult, NotesListResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
