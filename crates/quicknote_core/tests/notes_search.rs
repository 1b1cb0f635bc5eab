use quicknote_core::db::open_db_in_memory;
use quicknote_core::repo::note_repo::{NOTES_DEFAULT_LIMIT, NOTES_LIMIT_MAX};
use quicknote_core::{NoteService, SqliteNoteRepository};
use rusqlite::{params, Connection};

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn service(conn: &mut Connection) -> NoteService<SqliteNoteRepository<'_>> {
    NoteService::new(SqliteNoteRepository::try_new(conn).unwrap())
}

#[test]
fn tag_filter_is_exact_match() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let tagged = service
        .create_note("plan", "", &tags(&["work", "ideas"]))
        .unwrap();
    service
        .create_note("other", "", &tags(&["workshop"]))
        .unwrap();

    let work = service.list_notes(None, Some("work"), None).unwrap();
    assert_eq!(work.items.len(), 1);
    assert_eq!(work.items[0].id, tagged.id);

    let other = service.list_notes(None, Some("other"), None).unwrap();
    assert!(other.items.is_empty());

    let wrong_case = service.list_notes(None, Some("Work"), None).unwrap();
    assert!(wrong_case.items.is_empty());
}

#[test]
fn search_is_case_insensitive_substring_over_content() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let greeting = service
        .create_note("greeting", "Hello World", &[])
        .unwrap();
    service.create_note("farewell", "Goodbye", &[]).unwrap();

    let found = service.list_notes(Some("hello"), None, None).unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, greeting.id);
}

#[test]
fn search_matches_title_content_or_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let by_title = service.create_note("Budget 2024", "", &[]).unwrap();
    let by_content = service
        .create_note("misc", "review the BUDGET", &[])
        .unwrap();
    let by_tag = service
        .create_note("misc", "", &tags(&["budgeting"]))
        .unwrap();
    service
        .create_note("unrelated", "nothing here", &tags(&["x"]))
        .unwrap();

    let found = service.list_notes(Some("budget"), None, None).unwrap();
    let mut ids = found.items.iter().map(|note| note.id).collect::<Vec<_>>();
    ids.sort();
    let mut expected = vec![by_title.id, by_content.id, by_tag.id];
    expected.sort();
    assert_eq!(ids, expected);
}

#[test]
fn search_treats_wildcards_literally() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let discount = service.create_note("sale", "50% off", &[]).unwrap();
    service.create_note("plain", "500 items", &[]).unwrap();

    let found = service.list_notes(Some("0%"), None, None).unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, discount.id);

    let underscore = service.list_notes(Some("_"), None, None).unwrap();
    assert!(underscore.items.is_empty());
}

#[test]
fn search_folds_case_beyond_ascii() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let accented = service
        .create_note("Café notes", "ÜBER wichtig", &tags(&["Été"]))
        .unwrap();
    service.create_note("plain", "cafe without accent", &[]).unwrap();

    for query in ["café", "CAFÉ", "über", "Über", "été", "ÉTÉ"] {
        let found = service.list_notes(Some(query), None, None).unwrap();
        assert_eq!(found.items.len(), 1, "query {query:?}");
        assert_eq!(found.items[0].id, accented.id, "query {query:?}");
    }
}

#[test]
fn search_and_tag_filter_combine() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    let both = service
        .create_note("meeting notes", "", &tags(&["work"]))
        .unwrap();
    service
        .create_note("meeting at home", "", &tags(&["home"]))
        .unwrap();
    service.create_note("timesheet", "", &tags(&["work"])).unwrap();

    let found = service
        .list_notes(Some("MEETING"), Some("work"), None)
        .unwrap();
    assert_eq!(found.items.len(), 1);
    assert_eq!(found.items[0].id, both.id);
}

#[test]
fn blank_filters_list_everything() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    service.create_note("a", "", &[]).unwrap();
    service.create_note("b", "", &tags(&["t"])).unwrap();

    let listed = service.list_notes(Some("   "), Some(""), None).unwrap();
    assert_eq!(listed.items.len(), 2);
}

#[test]
fn list_orders_by_most_recent_update_first() {
    let mut conn = open_db_in_memory().unwrap();
    let (first_id, second_id, third_id) = {
        let mut service = service(&mut conn);
        let first = service.create_note("first", "", &[]).unwrap();
        let second = service.create_note("second", "", &[]).unwrap();
        let third = service.create_note("third", "", &[]).unwrap();
        (first.id, second.id, third.id)
    };

    for (id, updated_at) in [(first_id, 3000_i64), (second_id, 1000), (third_id, 2000)] {
        conn.execute(
            "UPDATE notes SET created_at = 0, updated_at = ?2 WHERE id = ?1;",
            params![id.to_string(), updated_at],
        )
        .unwrap();
    }

    let service = service(&mut conn);
    let listed = service.list_notes(None, None, None).unwrap();
    let ids = listed.items.iter().map(|note| note.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![first_id, third_id, second_id]);
}

#[test]
fn updating_a_note_moves_it_to_the_front() {
    let mut conn = open_db_in_memory().unwrap();
    let (older_id, newer_id) = {
        let mut service = service(&mut conn);
        let older = service.create_note("older", "", &[]).unwrap();
        let newer = service.create_note("newer", "", &[]).unwrap();
        (older.id, newer.id)
    };
    for (id, updated_at) in [(older_id, 1000_i64), (newer_id, 2000)] {
        conn.execute(
            "UPDATE notes SET created_at = 0, updated_at = ?2 WHERE id = ?1;",
            params![id.to_string(), updated_at],
        )
        .unwrap();
    }

    let mut service = service(&mut conn);
    assert!(service
        .update_note(&older_id.to_string(), "older", "edited", &[])
        .unwrap());

    let listed = service.list_notes(None, None, Some(1)).unwrap();
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].id, older_id);
}

#[test]
fn limit_caps_results_and_keeps_recency_order() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    for idx in 0..12 {
        service
            .create_note(&format!("note {idx}"), "", &[])
            .unwrap();
    }

    let limited = service.list_notes(None, None, Some(5)).unwrap();
    assert_eq!(limited.applied_limit, 5);
    assert_eq!(limited.items.len(), 5);
    assert!(limited
        .items
        .windows(2)
        .all(|pair| pair[0].updated_at >= pair[1].updated_at));

    let zero = service.list_notes(None, None, Some(0)).unwrap();
    assert_eq!(zero.applied_limit, 0);
    assert!(zero.items.is_empty());
}

#[test]
fn limit_defaults_and_clamps() {
    let mut conn = open_db_in_memory().unwrap();
    let service = service(&mut conn);

    let defaulted = service.list_notes(None, None, None).unwrap();
    assert_eq!(defaulted.applied_limit, NOTES_DEFAULT_LIMIT);

    let clamped = service.list_notes(None, None, Some(100_000)).unwrap();
    assert_eq!(clamped.applied_limit, NOTES_LIMIT_MAX);
}

#[test]
fn list_tags_returns_distinct_sorted_tags() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = service(&mut conn);
    service
        .create_note("a", "", &tags(&["work", "ideas"]))
        .unwrap();
    service
        .create_note("b", "", &tags(&["work", "Later"]))
        .unwrap();

    assert_eq!(
        service.list_tags().unwrap(),
        tags(&["Later", "ideas", "work"])
    );
}
