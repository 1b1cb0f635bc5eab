//! Application-defined SQL functions.
//!
//! # Responsibility
//! - Provide Unicode-aware case folding to SQL text search.
//!
//! # Invariants
//! - `quicknote_fold(x)` in SQL and [`fold_case`] in Rust produce the same
//!   text, so a folded needle can be matched against folded columns.
//! - `quicknote_fold(NULL)` is `NULL`.

use super::DbResult;
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;

/// SQL name of the case-folding scalar function.
pub const FOLD_FUNCTION: &str = "quicknote_fold";

/// Lowercases `text` using full Unicode case mapping.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Registers the note store's scalar functions on `conn`.
///
/// Registration is per connection and replaces any earlier definition.
pub fn register_functions(conn: &Connection) -> DbResult<()> {
    conn.create_scalar_function(
        FOLD_FUNCTION,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text = ctx.get::<Option<String>>(0)?;
            Ok(text.as_deref().map(fold_case))
        },
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{fold_case, register_functions};
    use rusqlite::Connection;

    #[test]
    fn fold_case_lowers_non_ascii_letters() {
        assert_eq!(fold_case("CAFÉ"), "café");
        assert_eq!(fold_case("ÜBER Été"), "über été");
        assert_eq!(fold_case("already lower"), "already lower");
    }

    #[test]
    fn sql_function_matches_rust_folding() {
        let conn = Connection::open_in_memory().unwrap();
        register_functions(&conn).unwrap();

        let folded: String = conn
            .query_row("SELECT quicknote_fold('Ärger ÉTÉ')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, fold_case("Ärger ÉTÉ"));

        let null: Option<String> = conn
            .query_row("SELECT quicknote_fold(NULL)", [], |row| row.get(0))
            .unwrap();
        assert_eq!(null, None);
    }
}
