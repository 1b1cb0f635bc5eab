//! Note use-case service.
//!
//! # Responsibility
//! - Provide the create/list/get/update/delete/drop-all use-cases.
//! - Parse user-supplied ids, treating malformed ones as not-found.
//! - Derive one-line content previews for list rendering.
//!
//! # Invariants
//! - Drafts are normalized through `NoteDraft::new` on every write path.
//! - `drop_all` never runs without explicit caller confirmation.
//! - Note content is never written to logs; only ids and counts.

use crate::model::note::{parse_note_id, Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::{
    normalize_note_limit, NoteListQuery, NoteRepository, RepoError, StoreStatus,
};
use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static MARKDOWN_IMAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[[^\]]*]\(([^)]+)\)").expect("valid image regex"));
static MARKDOWN_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("valid link regex"));
static MARKDOWN_SYMBOL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\*_`#>~\[\]\(\)!]+").expect("valid markdown symbol regex"));
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Title/content input breaks a note invariant.
    Validation(NoteValidationError),
    /// Bulk removal was requested without confirmation.
    ConfirmationRequired,
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ConfirmationRequired => {
                write!(f, "removing all notes requires explicit confirmation")
            }
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

pub type NoteServiceResult<T> = Result<T, NoteServiceError>;

/// List result envelope used by service callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesListResult {
    /// Items sorted by `updated_at DESC, id ASC`.
    pub items: Vec<Note>,
    /// Effective normalized limit used by the query.
    pub applied_limit: u32,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note and returns it as persisted, including its new id.
    ///
    /// # Errors
    /// - `Validation` when the title is blank or too long.
    pub fn create_note(
        &mut self,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> NoteServiceResult<Note> {
        let draft = NoteDraft::new(title, content, tags);
        draft.validate()?;

        let id = self.repo.create_note(&draft)?;
        info!(
            "event=note_create module=service status=ok note_id={id} tag_count={}",
            draft.tags.len()
        );

        self.repo
            .get_note(id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Gets one note by user-supplied id. Malformed ids yield `Ok(None)`.
    pub fn get_note(&self, raw_id: &str) -> NoteServiceResult<Option<Note>> {
        match parse_id_or_log(raw_id, "note_get") {
            Some(id) => self.get_note_by_id(id),
            None => Ok(None),
        }
    }

    /// Gets one note by parsed id.
    pub fn get_note_by_id(&self, id: NoteId) -> NoteServiceResult<Option<Note>> {
        Ok(self.repo.get_note(id)?)
    }

    /// Lists notes using optional text search, exact tag filter and limit.
    ///
    /// Blank `search`/`tag` values are treated as absent.
    pub fn list_notes(
        &self,
        search: Option<&str>,
        tag: Option<&str>,
        limit: Option<u32>,
    ) -> NoteServiceResult<NotesListResult> {
        let applied_limit = normalize_note_limit(limit);
        let query = NoteListQuery {
            search: non_blank(search),
            tag: non_blank(tag),
            limit: Some(applied_limit),
        };
        let items = self.repo.list_notes(&query)?;
        debug!(
            "event=notes_list module=service status=ok searched={} tag_filtered={} applied_limit={applied_limit} count={}",
            query.search.is_some(),
            query.tag.is_some(),
            items.len()
        );
        Ok(NotesListResult {
            items,
            applied_limit,
        })
    }

    /// Replaces title, content and tags of one note.
    ///
    /// Returns `Ok(false)` when the id is malformed, does not resolve, or the
    /// submitted values equal the stored ones.
    ///
    /// # Errors
    /// - `Validation` when the new title is blank or too long.
    pub fn update_note(
        &mut self,
        raw_id: &str,
        title: &str,
        content: &str,
        tags: &[String],
    ) -> NoteServiceResult<bool> {
        let draft = NoteDraft::new(title, content, tags);
        draft.validate()?;

        let Some(id) = parse_id_or_log(raw_id, "note_update") else {
            return Ok(false);
        };

        let updated = self.repo.update_note(id, &draft)?;
        if updated {
            info!("event=note_update module=service status=ok note_id={id}");
        } else {
            info!("event=note_update module=service status=noop note_id={id}");
        }
        Ok(updated)
    }

    /// Deletes one note. Returns `Ok(false)` for malformed or unknown ids.
    pub fn delete_note(&mut self, raw_id: &str) -> NoteServiceResult<bool> {
        let Some(id) = parse_id_or_log(raw_id, "note_delete") else {
            return Ok(false);
        };

        let deleted = self.repo.delete_note(id)?;
        if deleted {
            info!("event=note_delete module=service status=ok note_id={id}");
        } else {
            info!("event=note_delete module=service status=noop note_id={id}");
        }
        Ok(deleted)
    }

    /// Irreversibly removes every note. Returns how many were removed.
    ///
    /// # Errors
    /// - `ConfirmationRequired` unless `confirmed` is `true`; nothing is
    ///   removed in that case.
    pub fn drop_all(&mut self, confirmed: bool) -> NoteServiceResult<u64> {
        if !confirmed {
            warn!("event=notes_drop_all module=service status=rejected reason=unconfirmed");
            return Err(NoteServiceError::ConfirmationRequired);
        }

        let removed = self.repo.drop_all()?;
        warn!("event=notes_drop_all module=service status=ok removed={removed}");
        Ok(removed)
    }

    /// Lists tags currently attached to at least one note.
    pub fn list_tags(&self) -> NoteServiceResult<Vec<String>> {
        Ok(self.repo.list_tags()?)
    }

    /// Returns store engine/size metadata.
    pub fn store_status(&self) -> NoteServiceResult<StoreStatus> {
        Ok(self.repo.store_status()?)
    }
}

/// Derives a one-line plain-text preview from note content.
///
/// Markdown images are dropped, links keep their label, markdown symbols
/// are removed and whitespace collapsed. Returns `None` for empty results.
pub fn content_preview(content: &str, max_chars: usize) -> Option<String> {
    let without_images = MARKDOWN_IMAGE_RE.replace_all(content, " ");
    let without_links = MARKDOWN_LINK_RE.replace_all(&without_images, "$1");
    let without_symbols = MARKDOWN_SYMBOL_RE.replace_all(&without_links, " ");
    let normalized = WHITESPACE_RE.replace_all(&without_symbols, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut preview = trimmed.chars().take(max_chars).collect::<String>();
    if trimmed.chars().count() > max_chars {
        preview.push_str("...");
    }
    Some(preview)
}

fn parse_id_or_log(raw_id: &str, event: &str) -> Option<NoteId> {
    let parsed = parse_note_id(raw_id);
    if parsed.is_none() {
        debug!("event={event} module=service status=not_found reason=malformed_id");
    }
    parsed
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
