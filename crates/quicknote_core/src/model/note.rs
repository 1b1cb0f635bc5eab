//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note document and the draft used for writes.
//! - Validate titles and normalize tag sets before persistence.
//!
//! # Invariants
//! - `id` is assigned on creation and never reused or changed.
//! - `title` is trimmed, non-empty and at most `TITLE_MAX_CHARS` chars.
//! - `tags` are trimmed, non-empty, deduplicated and sorted.
//! - `updated_at >= created_at`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of one note document.
pub type NoteId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 120;

/// Persisted note document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Sorted, deduplicated, case preserved.
    pub tags: Vec<String>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds. Strictly increases on every mutation.
    pub updated_at: i64,
}

/// Write-side payload for create and full-replacement update.
///
/// Build drafts through [`NoteDraft::new`] so title/content/tags are
/// normalized the same way on every write path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

impl NoteDraft {
    /// Normalizes raw user input into a draft.
    ///
    /// Title and content are trimmed; tags go through [`normalize_tags`].
    /// Call [`NoteDraft::validate`] before persisting.
    pub fn new(title: impl AsRef<str>, content: impl AsRef<str>, tags: &[String]) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            content: content.as_ref().trim().to_string(),
            tags: normalize_tags(tags),
        }
    }

    /// Validates the draft against note invariants.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank.
    /// - `TitleTooLong` when the title exceeds `TITLE_MAX_CHARS`.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::EmptyTitle);
        }

        let actual = self.title.chars().count();
        if actual > TITLE_MAX_CHARS {
            return Err(NoteValidationError::TitleTooLong {
                max: TITLE_MAX_CHARS,
                actual,
            });
        }

        Ok(())
    }

    /// Returns whether writing this draft onto `note` would change nothing.
    pub fn matches(&self, note: &Note) -> bool {
        self.title == note.title && self.content == note.content && self.tags == note.tags
    }
}

/// Validation error raised before any note write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title can't be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title is {actual} characters long; maximum is {max}")
            }
        }
    }
}

impl Error for NoteValidationError {}

/// Parses a user-supplied note id.
///
/// Returns `None` for malformed input; callers treat that as not-found.
pub fn parse_note_id(raw: &str) -> Option<NoteId> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Normalizes one tag value. Blank input yields `None`.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalizes, deduplicates and sorts tag values. Case is preserved.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique = BTreeSet::new();
    for tag in tags {
        if let Some(value) = normalize_tag(tag) {
            unique.insert(value);
        }
    }
    unique.into_iter().collect()
}

/// Splits comma-separated tag input (`"work, ideas"`) into tag values.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_tag).collect()
}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{
        normalize_tags, parse_note_id, parse_tag_list, NoteDraft, NoteValidationError,
        TITLE_MAX_CHARS,
    };

    #[test]
    fn draft_trims_title_and_content() {
        let draft = NoteDraft::new("  Groceries ", "\n milk \n", &[]);
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.content, "milk");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_rejects_blank_title() {
        let draft = NoteDraft::new("   ", "body", &[]);
        assert_eq!(draft.validate(), Err(NoteValidationError::EmptyTitle));
    }

    #[test]
    fn draft_rejects_over_long_title() {
        let draft = NoteDraft::new("x".repeat(TITLE_MAX_CHARS + 1), "", &[]);
        assert!(matches!(
            draft.validate(),
            Err(NoteValidationError::TitleTooLong { actual, .. }) if actual == TITLE_MAX_CHARS + 1
        ));
    }

    #[test]
    fn tags_are_trimmed_deduplicated_and_sorted_with_case_preserved() {
        let tags = vec![
            " work".to_string(),
            "Ideas".to_string(),
            "work ".to_string(),
            "  ".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["Ideas".to_string(), "work".to_string()]);
    }

    #[test]
    fn tag_list_splits_on_commas_and_drops_blanks() {
        assert_eq!(
            parse_tag_list("work, ideas,, ,later"),
            vec!["work".to_string(), "ideas".to_string(), "later".to_string()]
        );
        assert!(parse_tag_list("").is_empty());
    }

    #[test]
    fn malformed_ids_parse_to_none() {
        assert!(parse_note_id("not-an-id").is_none());
        assert!(parse_note_id("").is_none());
        assert!(parse_note_id(" 67e55044-10b1-426f-9247-bb680e5fe0c8 ").is_some());
    }
}
