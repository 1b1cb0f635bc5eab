//! Interactive mode selector.
//!
//! Each mode is one request/response cycle against the note service. The
//! only state kept between prompts is the `editing` pointer, which lives
//! for the duration of a single Update cycle.

use crate::render::{short_title, tag_line, write_note_detail, write_note_list, write_status};
use quicknote_core::{parse_tag_list, NoteId, NoteRepository, NoteService, NoteServiceError};
use std::io::{self, BufRead, Write};

const DELETE_PICKER_LIMIT: u32 = 20;
const PICKER_TITLE_MAX_CHARS: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Create,
    ListSearch,
    Update,
    Delete,
    Search,
    Status,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Create,
        Mode::ListSearch,
        Mode::Update,
        Mode::Delete,
        Mode::Search,
        Mode::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Create => "Create note",
            Self::ListSearch => "List / search notes",
            Self::Update => "Update note",
            Self::Delete => "Delete note",
            Self::Search => "Search notes",
            Self::Status => "Status",
        }
    }

    /// Accepts the menu number or the mode keyword.
    pub fn parse(choice: &str) -> Option<Self> {
        match choice.trim().to_ascii_lowercase().as_str() {
            "1" | "create" => Some(Self::Create),
            "2" | "list" => Some(Self::ListSearch),
            "3" | "update" | "edit" => Some(Self::Update),
            "4" | "delete" => Some(Self::Delete),
            "5" | "search" => Some(Self::Search),
            "6" | "status" => Some(Self::Status),
            _ => None,
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

enum ModeError {
    Io(io::Error),
    Service(NoteServiceError),
}

impl From<io::Error> for ModeError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<NoteServiceError> for ModeError {
    fn from(value: NoteServiceError) -> Self {
        Self::Service(value)
    }
}

type ModeResult = Result<Flow, ModeError>;

/// Interactive session over any line reader and writer.
pub struct MenuSession<'svc, R: NoteRepository, I: BufRead, O: Write> {
    service: &'svc mut NoteService<R>,
    input: I,
    output: O,
    editing: Option<NoteId>,
}

impl<'svc, R: NoteRepository, I: BufRead, O: Write> MenuSession<'svc, R, I, O> {
    pub fn new(service: &'svc mut NoteService<R>, input: I, output: O) -> Self {
        Self {
            service,
            input,
            output,
            editing: None,
        }
    }

    /// Runs the menu until the user quits or input ends.
    ///
    /// Service failures are reported and the loop continues; only I/O
    /// failures on the terminal end the session with an error.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "QuickNote")?;
        loop {
            self.write_menu()?;
            let Some(choice) = self.prompt("Choose mode: ")? else {
                break;
            };
            let choice = choice.trim();
            if choice.is_empty() {
                continue;
            }
            if matches!(choice.to_ascii_lowercase().as_str(), "q" | "quit" | "exit") {
                break;
            }
            let Some(mode) = Mode::parse(choice) else {
                writeln!(self.output, "Unknown mode `{choice}`.")?;
                continue;
            };

            if let Flow::Quit = self.run_mode(mode)? {
                break;
            }
        }
        writeln!(self.output, "Bye.")?;
        Ok(())
    }

    fn run_mode(&mut self, mode: Mode) -> io::Result<Flow> {
        writeln!(self.output)?;
        writeln!(self.output, "== {} ==", mode.label())?;
        let result = match mode {
            Mode::Create => self.create_mode(),
            Mode::ListSearch => self.list_mode(),
            Mode::Update => self.update_mode(),
            Mode::Delete => self.delete_mode(),
            Mode::Search => self.search_mode(),
            Mode::Status => self.status_mode(),
        };
        self.editing = None;

        match result {
            Ok(flow) => Ok(flow),
            Err(ModeError::Io(err)) => Err(err),
            Err(ModeError::Service(err)) => {
                writeln!(self.output, "Error: {err}")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn create_mode(&mut self) -> ModeResult {
        let Some(title) = self.prompt("Title: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(content) = self.prompt_multiline("Content")? else {
            return Ok(Flow::Quit);
        };
        let Some(tags) = self.prompt("Tags (comma-separated, optional): ")? else {
            return Ok(Flow::Quit);
        };

        if title.trim().is_empty() {
            writeln!(self.output, "Title can't be empty.")?;
            return Ok(Flow::Continue);
        }

        let note = self
            .service
            .create_note(&title, &content, &parse_tag_list(&tags))?;
        writeln!(self.output, "Note created! ID: {}", note.id)?;
        Ok(Flow::Continue)
    }

    fn list_mode(&mut self) -> ModeResult {
        let Some(search) = self.prompt("Search (title, content, tags; Enter for all): ")? else {
            return Ok(Flow::Quit);
        };
        let Some(tag) = self.prompt("Filter by single tag (exact; Enter for none): ")? else {
            return Ok(Flow::Quit);
        };

        let listed = self.service.list_notes(Some(&search), Some(&tag), None)?;
        write_note_list(&mut self.output, &listed.items)?;
        Ok(Flow::Continue)
    }

    fn search_mode(&mut self) -> ModeResult {
        let Some(text) = self.prompt("Search text: ")? else {
            return Ok(Flow::Quit);
        };
        if text.trim().is_empty() {
            writeln!(self.output, "Enter some text to search.")?;
            return Ok(Flow::Continue);
        }
        let Some(tag) = self.prompt("Filter by single tag (exact; Enter for none): ")? else {
            return Ok(Flow::Quit);
        };

        let listed = self.service.list_notes(Some(&text), Some(&tag), None)?;
        write_note_list(&mut self.output, &listed.items)?;
        Ok(Flow::Continue)
    }

    fn update_mode(&mut self) -> ModeResult {
        let Some(raw_id) = self.prompt("Note ID to edit: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(current) = self.service.get_note(&raw_id)? else {
            writeln!(self.output, "Note not found.")?;
            return Ok(Flow::Continue);
        };
        let id = current.id;
        self.editing = Some(id);

        write_note_detail(&mut self.output, &current)?;
        writeln!(self.output, "Press Enter to keep the current value.")?;

        let Some(title) = self.prompt(&format!("Title [{}]: ", current.title))? else {
            return Ok(Flow::Quit);
        };
        let Some(content) =
            self.prompt_multiline("New content (empty keeps current, '-' clears)")?
        else {
            return Ok(Flow::Quit);
        };
        let Some(tags) =
            self.prompt(&format!("Tags [{}] ('-' clears): ", tag_line(&current.tags)))?
        else {
            return Ok(Flow::Quit);
        };

        let title = if title.trim().is_empty() {
            current.title
        } else {
            title
        };
        let content = if content.trim().is_empty() {
            current.content
        } else if content.trim() == "-" {
            String::new()
        } else {
            content
        };
        let tags = match tags.trim() {
            "" => current.tags,
            "-" => Vec::new(),
            raw => parse_tag_list(raw),
        };

        let updated = self
            .service
            .update_note(&id.to_string(), &title, &content, &tags)?;
        self.editing = None;
        if updated {
            writeln!(self.output, "Note updated.")?;
        } else {
            writeln!(self.output, "No changes to save.")?;
        }
        Ok(Flow::Continue)
    }

    fn delete_mode(&mut self) -> ModeResult {
        let recent = self
            .service
            .list_notes(None, None, Some(DELETE_PICKER_LIMIT))?;
        if !recent.items.is_empty() {
            writeln!(self.output, "Recent notes:")?;
            for note in &recent.items {
                writeln!(
                    self.output,
                    "  {}  {}",
                    note.id,
                    short_title(&note.title, PICKER_TITLE_MAX_CHARS)
                )?;
            }
        }

        let Some(raw_id) = self.prompt("Note ID to delete (Enter to cancel): ")? else {
            return Ok(Flow::Quit);
        };
        if raw_id.trim().is_empty() {
            writeln!(self.output, "Cancelled.")?;
            return Ok(Flow::Continue);
        }

        if self.service.delete_note(&raw_id)? {
            writeln!(self.output, "Note deleted.")?;
        } else {
            writeln!(self.output, "Delete failed: confirm the ID is correct.")?;
        }
        Ok(Flow::Continue)
    }

    fn status_mode(&mut self) -> ModeResult {
        let status = self.service.store_status()?;
        write_status(&mut self.output, &status)?;

        let Some(answer) =
            self.prompt("Type 'yes' to remove ALL notes permanently, or press Enter to go back: ")?
        else {
            return Ok(Flow::Quit);
        };
        if answer.trim() == "yes" {
            let removed = self.service.drop_all(true)?;
            writeln!(self.output, "Removed {removed} note(s).")?;
        }
        Ok(Flow::Continue)
    }

    fn write_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        for (index, mode) in Mode::ALL.iter().enumerate() {
            writeln!(self.output, "  {}) {}", index + 1, mode.label())?;
        }
        writeln!(self.output, "  q) Quit")
    }

    /// Reads one line. `None` means input ended.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Reads lines until a lone `.`. `None` means input ended before any line.
    fn prompt_multiline(&mut self, label: &str) -> io::Result<Option<String>> {
        writeln!(self.output, "{label} (finish with a line containing only '.'):")?;
        self.output.flush()?;

        let mut lines = Vec::new();
        loop {
            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                if lines.is_empty() {
                    return Ok(None);
                }
                break;
            }
            let line = line.trim_end_matches(['\n', '\r']);
            if line == "." {
                break;
            }
            lines.push(line.to_string());
        }
        Ok(Some(lines.join("\n")))
    }
}
