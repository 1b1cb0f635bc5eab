//! One-shot subcommand execution.

use crate::cli::Command;
use crate::render::{tag_line, write_note_detail, write_note_list, write_status};
use anyhow::{bail, Result};
use quicknote_core::{parse_tag_list, NoteRepository, NoteService};
use serde::Serialize;
use std::io::Write;

/// Runs one non-interactive command against the service.
///
/// Not-found ids and refused confirmations are returned as errors so the
/// process exits non-zero.
pub fn run_command<R: NoteRepository>(
    service: &mut NoteService<R>,
    command: Command,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Create {
            title,
            content,
            tags,
        } => {
            let note = service.create_note(&title, &content, &parse_tag_list(&tags))?;
            writeln!(out, "Note created!")?;
            writeln!(out, "ID: {}", note.id)?;
        }
        Command::List {
            search,
            tag,
            limit,
            json,
        } => {
            let listed = service.list_notes(search.as_deref(), tag.as_deref(), limit)?;
            if json {
                write_json(out, &listed.items)?;
            } else {
                write_note_list(out, &listed.items)?;
            }
        }
        Command::Search {
            text,
            tag,
            limit,
            json,
        } => {
            if text.trim().is_empty() {
                bail!("search text cannot be empty");
            }
            let listed = service.list_notes(Some(&text), tag.as_deref(), limit)?;
            if json {
                write_json(out, &listed.items)?;
            } else {
                write_note_list(out, &listed.items)?;
            }
        }
        Command::Show { id, json } => {
            let Some(note) = service.get_note(&id)? else {
                bail!("note not found: {id}");
            };
            if json {
                write_json(out, &note)?;
            } else {
                write_note_detail(out, &note)?;
            }
        }
        Command::Update {
            id,
            title,
            content,
            tags,
        } => {
            let Some(current) = service.get_note(&id)? else {
                bail!("note not found: {id}");
            };
            let title = title.unwrap_or(current.title);
            let content = content.unwrap_or(current.content);
            let tags = tags.map_or(current.tags, |raw| parse_tag_list(&raw));

            if service.update_note(&id, &title, &content, &tags)? {
                writeln!(out, "Note updated.")?;
            } else {
                writeln!(out, "No changes to save.")?;
            }
        }
        Command::Delete { id } => {
            if !service.delete_note(&id)? {
                bail!("delete failed: no note with id {id}");
            }
            writeln!(out, "Note deleted.")?;
        }
        Command::Tags => {
            let tags = service.list_tags()?;
            if tags.is_empty() {
                writeln!(out, "No tags in use.")?;
            } else {
                writeln!(out, "{}", tag_line(&tags))?;
            }
        }
        Command::Status { json } => {
            let status = service.store_status()?;
            if json {
                write_json(out, &status)?;
            } else {
                write_status(out, &status)?;
            }
        }
        Command::DropAll { yes } => {
            let removed = service.drop_all(yes)?;
            writeln!(out, "Removed {removed} note(s).")?;
        }
        Command::Menu => bail!("menu mode is interactive; run it from a terminal"),
    }

    Ok(())
}

fn write_json(out: &mut impl Write, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
