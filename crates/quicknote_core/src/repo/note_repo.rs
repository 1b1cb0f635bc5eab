//! Note repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Translate create/list/get/update/delete/drop-all into SQL against the
//!   `notes` collection and its `note_tags` links.
//! - Own tag-set replacement and change detection for full updates.
//!
//! # Invariants
//! - Every write runs inside one immediate transaction.
//! - `updated_at` strictly increases on every successful mutation.
//! - List results are ordered by `updated_at DESC, id ASC`.
//! - Tag filtering is an exact, case-sensitive match.
//! - Text search is a literal substring match under Unicode case folding.

use crate::db::{fold_case, register_functions, DbError};
use crate::db::migrations::current_version;
use crate::model::note::{now_epoch_ms, Note, NoteDraft, NoteId, NoteValidationError};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, TransactionBehavior};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Default list size when the caller gives no limit.
pub const NOTES_DEFAULT_LIMIT: u32 = 100;
/// Hard upper bound for one list call.
pub const NOTES_LIMIT_MAX: u32 = 500;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    created_at,
    updated_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "note store is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "note store table `{table}` is missing column `{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for note list/search use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteListQuery {
    /// Case-insensitive substring over title, content and tags (OR).
    pub search: Option<String>,
    /// Exact single-tag filter.
    pub tag: Option<String>,
    /// Maximum rows to return. See [`normalize_note_limit`].
    pub limit: Option<u32>,
}

/// Snapshot of store health and size, shown by the status mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatus {
    pub engine: &'static str,
    pub engine_version: &'static str,
    /// Database file path, or `:memory:`.
    pub location: String,
    pub schema_version: u32,
    pub note_count: u64,
    pub tag_count: u64,
    pub size_bytes: u64,
}

/// Repository interface for the notes collection.
pub trait NoteRepository {
    /// Persists a new note and returns its store-assigned id.
    fn create_note(&mut self, draft: &NoteDraft) -> RepoResult<NoteId>;
    /// Gets one note by id.
    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Lists notes matching the query, most recently updated first.
    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>>;
    /// Replaces title/content/tags. Returns `false` when the note is
    /// missing or the draft would change nothing.
    fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> RepoResult<bool>;
    /// Hard-deletes one note. Returns `false` when it did not exist.
    fn delete_note(&mut self, id: NoteId) -> RepoResult<bool>;
    /// Removes every note and tag. Returns the number of notes removed.
    fn drop_all(&mut self) -> RepoResult<u64>;
    /// Returns all tags in use, sorted.
    fn list_tags(&self) -> RepoResult<Vec<String>>;
    /// Returns store engine/size metadata.
    fn store_status(&self) -> RepoResult<StoreStatus>;
}

/// SQLite-backed notes repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// # Errors
    /// - `MissingRequiredTable`/`MissingRequiredColumn` when migrations were
    ///   not applied to `conn`.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_note_connection_ready(conn)?;
        register_functions(conn)?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn create_note(&mut self, draft: &NoteDraft) -> RepoResult<NoteId> {
        draft.validate()?;

        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let now = now_epoch_ms();

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO notes (id, title, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4);",
            params![id_text.as_str(), draft.title.as_str(), draft.content.as_str(), now],
        )?;
        insert_tags(&tx, id_text.as_str(), &draft.tags)?;
        tx.commit()?;

        Ok(id)
    }

    fn get_note(&self, id: NoteId) -> RepoResult<Option<Note>> {
        load_note(self.conn, id.to_string().as_str())
    }

    fn list_notes(&self, query: &NoteListQuery) -> RepoResult<Vec<Note>> {
        let limit = normalize_note_limit(query.limit);
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut sql = format!("{NOTE_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(search) = query.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                sql.push_str(
                    " AND (
                        instr(quicknote_fold(title), ?1) > 0
                        OR instr(quicknote_fold(content), ?1) > 0
                        OR EXISTS (
                            SELECT 1
                            FROM note_tags nt
                            WHERE nt.note_id = notes.id
                              AND instr(quicknote_fold(nt.tag), ?1) > 0
                        )
                    )",
                );
                bind_values.push(Value::Text(fold_case(search)));
            }
        }

        if let Some(tag) = query.tag.as_deref().map(str::trim) {
            if !tag.is_empty() {
                sql.push_str(&format!(
                    " AND EXISTS (
                        SELECT 1
                        FROM note_tags nt
                        WHERE nt.note_id = notes.id
                          AND nt.tag = ?{}
                    )",
                    bind_values.len() + 1
                ));
                bind_values.push(Value::Text(tag.to_string()));
            }
        }

        sql.push_str(&format!(
            " ORDER BY updated_at DESC, id ASC LIMIT ?{}",
            bind_values.len() + 1
        ));
        bind_values.push(Value::Integer(i64::from(limit)));

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(self.conn, row)?);
        }

        Ok(notes)
    }

    fn update_note(&mut self, id: NoteId, draft: &NoteDraft) -> RepoResult<bool> {
        draft.validate()?;

        let id_text = id.to_string();
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(existing) = load_note(&tx, id_text.as_str())? else {
            return Ok(false);
        };
        if draft.matches(&existing) {
            return Ok(false);
        }

        tx.execute(
            "UPDATE notes
             SET
                title = ?2,
                content = ?3,
                updated_at = MAX(?4, updated_at + 1)
             WHERE id = ?1;",
            params![
                id_text.as_str(),
                draft.title.as_str(),
                draft.content.as_str(),
                now_epoch_ms(),
            ],
        )?;
        tx.execute(
            "DELETE FROM note_tags WHERE note_id = ?1;",
            [id_text.as_str()],
        )?;
        insert_tags(&tx, id_text.as_str(), &draft.tags)?;
        tx.commit()?;

        Ok(true)
    }

    fn delete_note(&mut self, id: NoteId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn drop_all(&mut self) -> RepoResult<u64> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM note_tags;", [])?;
        let removed = tx.execute("DELETE FROM notes;", [])?;
        tx.commit()?;
        Ok(removed as u64)
    }

    fn list_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT tag FROM note_tags ORDER BY tag ASC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get("tag")?);
        }
        Ok(tags)
    }

    fn store_status(&self) -> RepoResult<StoreStatus> {
        let note_count = count_rows(self.conn, "SELECT COUNT(*) FROM notes;")?;
        let tag_count = count_rows(self.conn, "SELECT COUNT(DISTINCT tag) FROM note_tags;")?;
        let page_count = count_rows(self.conn, "PRAGMA page_count;")?;
        let page_size = count_rows(self.conn, "PRAGMA page_size;")?;
        let location = match self.conn.path() {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => ":memory:".to_string(),
        };

        Ok(StoreStatus {
            engine: "sqlite",
            engine_version: rusqlite::version(),
            location,
            schema_version: current_version(self.conn)?,
            note_count,
            tag_count,
            size_bytes: page_count.saturating_mul(page_size),
        })
    }
}

/// Normalizes list limit according to the notes contract.
///
/// - `None` -> `NOTES_DEFAULT_LIMIT`
/// - above `NOTES_LIMIT_MAX` -> `NOTES_LIMIT_MAX`
/// - `Some(0)` stays `0` and yields an empty list
pub fn normalize_note_limit(limit: Option<u32>) -> u32 {
    match limit {
        Some(value) if value > NOTES_LIMIT_MAX => NOTES_LIMIT_MAX,
        Some(value) => value,
        None => NOTES_DEFAULT_LIMIT,
    }
}

fn load_note(conn: &Connection, id_text: &str) -> RepoResult<Option<Note>> {
    let mut stmt = conn.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
    let mut rows = stmt.query([id_text])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_note_row(conn, row)?));
    }
    Ok(None)
}

fn parse_note_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| RepoError::InvalidData(format!("invalid id value `{id_text}` in notes.id")))?;

    let created_at: i64 = row.get("created_at")?;
    let updated_at: i64 = row.get("updated_at")?;
    if updated_at < created_at {
        return Err(RepoError::InvalidData(format!(
            "note {id_text} has updated_at {updated_at} earlier than created_at {created_at}"
        )));
    }

    Ok(Note {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        tags: load_tags_for_note(conn, &id_text)?,
        created_at,
        updated_at,
    })
}

fn load_tags_for_note(conn: &Connection, note_id: &str) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT tag
         FROM note_tags
         WHERE note_id = ?1
         ORDER BY tag ASC;",
    )?;
    let mut rows = stmt.query([note_id])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn insert_tags(conn: &Connection, note_id: &str, tags: &[String]) -> RepoResult<()> {
    let mut stmt =
        conn.prepare("INSERT OR IGNORE INTO note_tags (note_id, tag) VALUES (?1, ?2);")?;
    for tag in tags {
        stmt.execute(params![note_id, tag.as_str()])?;
    }
    Ok(())
}

fn count_rows(conn: &Connection, sql: &str) -> RepoResult<u64> {
    let value: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    u64::try_from(value).map_err(|_| RepoError::InvalidData(format!("negative count from `{sql}`")))
}

fn ensure_note_connection_ready(conn: &Connection) -> RepoResult<()> {
    const REQUIRED: &[(&str, &[&str])] = &[
        ("notes", &["id", "title", "content", "created_at", "updated_at"]),
        ("note_tags", &["note_id", "tag"]),
    ];

    for &(table, columns) in REQUIRED {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
