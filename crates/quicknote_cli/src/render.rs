//! Plain-text rendering of notes and store status.

use chrono::{DateTime, SecondsFormat, Utc};
use quicknote_core::{content_preview, Note, StoreStatus};
use std::io::{self, Write};

const LIST_TITLE_MAX_CHARS: usize = 60;
const LIST_PREVIEW_MAX_CHARS: usize = 80;

/// Formats epoch milliseconds as RFC 3339 UTC, falling back to the raw value.
pub fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|value| value.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| epoch_ms.to_string())
}

/// Truncates a title to `max_chars`, marking the cut with `...`.
pub fn short_title(title: &str, max_chars: usize) -> String {
    if title.chars().count() <= max_chars {
        return title.to_string();
    }
    let mut short = title.chars().take(max_chars).collect::<String>();
    short.push_str("...");
    short
}

/// Comma-joined tags, the same shape the tag prompts accept.
pub fn tag_line(tags: &[String]) -> String {
    tags.join(", ")
}

/// Two-line list entry: id/title/tags/timestamp, then a content preview.
pub fn write_note_summary(out: &mut impl Write, note: &Note) -> io::Result<()> {
    write!(
        out,
        "{}  {}",
        note.id,
        short_title(&note.title, LIST_TITLE_MAX_CHARS)
    )?;
    if !note.tags.is_empty() {
        write!(out, "  [{}]", tag_line(&note.tags))?;
    }
    writeln!(out, "  (updated {})", format_timestamp(note.updated_at))?;
    if let Some(preview) = content_preview(&note.content, LIST_PREVIEW_MAX_CHARS) {
        writeln!(out, "    {preview}")?;
    }
    Ok(())
}

pub fn write_note_list(out: &mut impl Write, notes: &[Note]) -> io::Result<()> {
    if notes.is_empty() {
        return writeln!(out, "No notes found. Create one or check your search/filter.");
    }
    for note in notes {
        write_note_summary(out, note)?;
    }
    writeln!(out, "{} note(s).", notes.len())
}

/// Full note view.
pub fn write_note_detail(out: &mut impl Write, note: &Note) -> io::Result<()> {
    writeln!(out, "ID:      {}", note.id)?;
    writeln!(out, "Title:   {}", note.title)?;
    writeln!(out, "Tags:    {}", tag_line(&note.tags))?;
    writeln!(out, "Created: {}", format_timestamp(note.created_at))?;
    writeln!(out, "Updated: {}", format_timestamp(note.updated_at))?;
    writeln!(out)?;
    if note.content.is_empty() {
        writeln!(out, "(no content)")
    } else {
        writeln!(out, "{}", note.content)
    }
}

pub fn write_status(out: &mut impl Write, status: &StoreStatus) -> io::Result<()> {
    writeln!(out, "Engine:         {} {}", status.engine, status.engine_version)?;
    writeln!(out, "Location:       {}", status.location)?;
    writeln!(out, "Schema version: {}", status.schema_version)?;
    writeln!(out, "Notes:          {}", status.note_count)?;
    writeln!(out, "Tags:           {}", status.tag_count)?;
    writeln!(out, "Size (bytes):   {}", status.size_bytes)
}
