
use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

#[test]
fn note_saved_then_listed_once_then_deleted() {
    let workspace = temp_dir("rollbookd-notes");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let saved = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "notes.save",
        json!({ "body": "call the lab assistant about sem-IV practicals" }),
    );
    let note_id = saved
        .get("noteId")
        .and_then(|v| v.as_str())
        .expect("noteId")
        .to_string();
    assert!(note_id.starts_with("note_"));

    let listed = request_ok(&mut stdin, &mut reader, "2", "notes.list", json!({}));
    let notes = listed.get("notes").and_then(|v| v.as_array()).expect("notes");
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].get("id").and_then(|v| v.as_str()), Some(note_id.as_str()));
    assert_eq!(
        notes[0].get("body").and_then(|v| v.as_str()),
        Some("call the lab assistant about sem-IV practicals")
    );
    assert!(notes[0].get("modifiedAt").and_then(|v| v.as_str()).is_some());

    request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "notes.delete",
        json!({ "noteId": note_id.clone() }),
    );
    let listed = request_ok(&mut stdin, &mut reader, "4", "notes.list", json!({}));
    assert!(listed
        .get("notes")
        .and_then(|v| v.as_array())
        .map(|n| n.is_empty())
        .unwrap_or(false));

    request_err(
        &mut stdin,
        &mut reader,
        "5",
        "notes.delete",
        json!({ "noteId": note_id }),
        "not_found",
    );
}

#[test]
fn rapid_saves_keep_distinct_notes_newest_first() {
    let workspace = temp_dir("rollbookd-notes-rapid");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    for (i, body) in ["first", "second", "third"].iter().enumerate() {
        request_ok(
            &mut stdin,
            &mut reader,
            &format!("{}", i),
            "notes.save",
            json!({ "body": body }),
        );
    }
    let listed = request_ok(&mut stdin, &mut reader, "9", "notes.list", json!({}));
    let notes = listed.get("notes").and_then(|v| v.as_array()).expect("notes");
    assert_eq!(notes.len(), 3);
    assert_eq!(notes[0].get("body").and_then(|v| v.as_str()), Some("third"));
    assert_eq!(notes[2].get("body").and_then(|v| v.as_str()), Some("first"));
}

#[test]
fn blank_note_bodies_are_rejected() {
    let workspace = temp_dir("rollbookd-notes-blank");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    request_err(
        &mut stdin,
        &mut reader,
        "1",
        "notes.save",
        json!({ "body": "   \n  " }),
        "bad_params",
    );
    request_err(&mut stdin, &mut reader, "2", "notes.save", json!({}), "bad_params");
}

#[test]
fn note_ids_that_escape_the_notes_dir_are_rejected() {
    let workspace = temp_dir("rollbookd-notes-escape");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    request_err(
        &mut stdin,
        &mut reader,
        "1",
        "notes.delete",
        json!({ "noteId": "../roster" }),
        "bad_params",
    );
}
