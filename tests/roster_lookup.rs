
use serde_json::json;
use test_support::{
    request_err, request_ok, sample_workspace, select_workspace, spawn_sidecar, temp_dir,
    write_roster, SAMPLE_ROWS,
};

#[test]
fn roster_list_preserves_file_order_and_display_names() {
    let workspace = sample_workspace("rollbookd-roster-list");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let result = request_ok(&mut stdin, &mut reader, "1", "roster.list", json!({}));
    assert_eq!(result.get("count").and_then(|v| v.as_u64()), Some(7));
    let students = result
        .get("students")
        .and_then(|v| v.as_array())
        .expect("students");
    assert_eq!(
        students[0].get("displayName").and_then(|v| v.as_str()),
        Some("Aarav Sharma -- 1")
    );
    assert_eq!(
        students[4].get("rollNumber").and_then(|v| v.as_str()),
        Some("110")
    );
}

#[test]
fn roster_get_returns_typed_record() {
    let workspace = sample_workspace("rollbookd-roster-get");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "roster.get",
        json!({ "rollNumber": "3" }),
    );
    let student = result.get("student").expect("student");
    assert_eq!(student.get("name").and_then(|v| v.as_str()), Some("Vikram Iyer"));
    assert_eq!(student.get("gender").and_then(|v| v.as_str()), Some("M"));
    let scores = student.get("scores").and_then(|v| v.as_array()).expect("scores");
    assert_eq!(scores.len(), 5);
    // "NA" coerces to a missing value rather than failing the load.
    assert!(scores[2].is_null());
    assert_eq!(scores[0].as_f64(), Some(5.2));

    request_err(
        &mut stdin,
        &mut reader,
        "2",
        "roster.get",
        json!({ "rollNumber": "999" }),
        "not_found",
    );
}

#[test]
fn roster_find_surfaces_ambiguity_instead_of_first_match() {
    let workspace = sample_workspace("rollbookd-roster-find");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    // "10" is a substring of both 110 and 210 and an exact match of neither.
    let error = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "roster.find",
        json!({ "query": "10" }),
        "ambiguous",
    );
    let candidates = error
        .get("details")
        .and_then(|d| d.get("candidates"))
        .and_then(|v| v.as_array())
        .expect("candidates");
    let rolls: Vec<&str> = candidates.iter().filter_map(|v| v.as_str()).collect();
    assert_eq!(rolls, vec!["110", "210"]);

    // An exact roll wins even when it is a substring of another roll: "1"
    // is contained in 110 and 210 but names a real student.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "roster.find",
        json!({ "query": "1" }),
    );
    assert_eq!(
        result
            .get("student")
            .and_then(|s| s.get("rollNumber"))
            .and_then(|v| v.as_str()),
        Some("1")
    );

    // A substring with a single hit resolves without needing exactness.
    let result = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "roster.find",
        json!({ "query": "21" }),
    );
    assert_eq!(
        result
            .get("student")
            .and_then(|s| s.get("name"))
            .and_then(|v| v.as_str()),
        Some("Priya Nair")
    );

    request_err(
        &mut stdin,
        &mut reader,
        "4",
        "roster.find",
        json!({ "query": "999" }),
        "not_found",
    );
}

#[test]
fn missing_required_column_is_a_data_format_error() {
    let workspace = temp_dir("rollbookd-roster-badheader");
    // No "PRN NO" column.
    write_roster(
        &workspace,
        "Roll NO,Name of students,Gender,sem-I,sem-II,sem-III,sem-IV,sem-V",
        &["1,Aarav Sharma,M,7.1,7.4,8.0,8.2,8.6"],
    );
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let error = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "roster.list",
        json!({}),
        "data_format",
    );
    assert!(error
        .get("message")
        .and_then(|v| v.as_str())
        .map(|m| m.contains("PRN NO"))
        .unwrap_or(false));
}

#[test]
fn absent_optional_columns_load_as_missing_fields() {
    let workspace = temp_dir("rollbookd-roster-minimal");
    write_roster(
        &workspace,
        "Roll NO,Name of students,Gender,PRN NO,sem-I,sem-II,sem-III,sem-IV,sem-V",
        &["1,Aarav Sharma,M,PRN001,7.1,7.4,8.0,8.2,8.6"],
    );
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let result = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "roster.get",
        json!({ "rollNumber": "1" }),
    );
    let student = result.get("student").expect("student");
    assert!(student.get("studentMobile").map(|v| v.is_null()).unwrap_or(false));
    assert!(student.get("permanentAddress").map(|v| v.is_null()).unwrap_or(false));
}

#[test]
fn duplicate_rolls_are_tolerated_on_load_and_ambiguous_on_lookup() {
    let workspace = temp_dir("rollbookd-roster-dupes");
    let mut rows = SAMPLE_ROWS.to_vec();
    rows.push("110,Rohan Mehta Again,M,PRN111,,,,,,,6.0,6.0,6.0,6.0,6.0");
    write_roster(&workspace, test_support::ROSTER_HEADER, &rows);
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let result = request_ok(&mut stdin, &mut reader, "1", "roster.list", json!({}));
    assert_eq!(result.get("count").and_then(|v| v.as_u64()), Some(8));

    let error = request_err(
        &mut stdin,
        &mut reader,
        "2",
        "roster.find",
        json!({ "query": "110" }),
        "ambiguous",
    );
    let candidates = error
        .get("details")
        .and_then(|d| d.get("candidates"))
        .and_then(|v| v.as_array())
        .expect("candidates");
    assert_eq!(candidates.len(), 2);
}
