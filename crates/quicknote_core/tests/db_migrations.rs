use quicknote_core::db::migrations::{apply_migrations, latest_version};
use quicknote_core::db::{open_db, open_db_in_memory, open_store, DbError};
use quicknote_core::{NoteService, RepoError, SqliteNoteRepository, StoreConfig};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "notes");
    assert_table_exists(&conn, "note_tags");
}

#[test]
fn opening_same_database_twice_is_idempotent_and_keeps_notes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quicknote.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO notes (id, title, content, created_at, updated_at)
             VALUES ('67e55044-10b1-426f-9247-bb680e5fe0c8', 'kept', '', 1, 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn open_store_follows_connection_string() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("from-url.db");
    let config =
        StoreConfig::from_connection_string(&format!("sqlite://{}", path.display())).unwrap();

    let conn = open_store(&config).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
    assert!(path.exists());

    let memory = open_store(&StoreConfig::memory()).unwrap();
    assert_table_exists(&memory, "notes");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let mut conn = Connection::open_in_memory().unwrap();
    let err = SqliteNoteRepository::try_new(&mut conn)
        .err()
        .expect("bare connection must be rejected");
    assert!(matches!(err, RepoError::MissingRequiredTable("notes")));
}

#[test]
fn apply_migrations_reports_only_pending_versions() {
    let mut conn = Connection::open_in_memory().unwrap();

    let applied = apply_migrations(&mut conn).unwrap();
    assert_eq!(applied, (1..=latest_version()).collect::<Vec<_>>());
    assert_eq!(schema_version(&conn), latest_version());

    let again = apply_migrations(&mut conn).unwrap();
    assert!(again.is_empty());
}

#[test]
fn repository_over_externally_migrated_connection_supports_search() {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();

    let mut service = NoteService::new(SqliteNoteRepository::try_new(&mut conn).unwrap());
    let note = service.create_note("Über plan", "", &[]).unwrap();

    let found = service.list_notes(Some("über"), None, None).unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, note.id);
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
