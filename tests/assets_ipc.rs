
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use test_support::{request_err, request_ok, select_workspace, spawn_sidecar, temp_dir};

fn write_asset(workspace: &std::path::Path, name: &str, payload: &[u8]) {
    std::fs::write(workspace.join(name), payload).expect("write asset");
}

#[test]
fn portraits_resolve_by_gender_with_a_default() {
    let workspace = temp_dir("rollbookd-assets");
    write_asset(&workspace, "male.jpg", b"male-bytes");
    write_asset(&workspace, "female.jpg", b"female-bytes");
    write_asset(&workspace, "default.jpg", b"default-bytes");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    for (i, (gender, file, payload)) in [
        ("M", "male.jpg", b"male-bytes".as_slice()),
        ("F", "female.jpg", b"female-bytes".as_slice()),
        ("other", "default.jpg", b"default-bytes".as_slice()),
        ("", "default.jpg", b"default-bytes".as_slice()),
    ]
    .iter()
    .enumerate()
    {
        let result = request_ok(
            &mut stdin,
            &mut reader,
            &format!("{}", i),
            "assets.portrait",
            json!({ "gender": gender }),
        );
        assert_eq!(result.get("fileName").and_then(|v| v.as_str()), Some(*file));
        let bytes = STANDARD
            .decode(result.get("bytesBase64").and_then(|v| v.as_str()).expect("bytes"))
            .expect("decode");
        assert_eq!(&bytes, payload);
    }
}

#[test]
fn timetable_round_trips_bytes() {
    let workspace = temp_dir("rollbookd-assets-timetable");
    write_asset(&workspace, "timetable.jpg", b"timetable-bytes");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let result = request_ok(&mut stdin, &mut reader, "1", "assets.timetable", json!({}));
    assert_eq!(
        result.get("fileName").and_then(|v| v.as_str()),
        Some("timetable.jpg")
    );
    let bytes = STANDARD
        .decode(result.get("bytesBase64").and_then(|v| v.as_str()).expect("bytes"))
        .expect("decode");
    assert_eq!(&bytes, b"timetable-bytes");
}

#[test]
fn missing_assets_are_not_found() {
    let workspace = temp_dir("rollbookd-assets-missing");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    request_err(
        &mut stdin,
        &mut reader,
        "1",
        "assets.timetable",
        json!({}),
        "not_found",
    );
    request_err(
        &mut stdin,
        &mut reader,
        "2",
        "assets.portrait",
        json!({ "gender": "M" }),
        "not_found",
    );
}
