
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use test_support::{
    request_err, request_ok, sample_workspace, select_workspace, spawn_sidecar, temp_dir,
    write_roster, PNG_MAGIC, ROSTER_HEADER,
};

#[test]
fn class_open_returns_stats_and_chart() {
    let workspace = sample_workspace("rollbookd-class-open");
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let result = request_ok(&mut stdin, &mut reader, "1", "analytics.class.open", json!({}));
    let stats = result.get("stats").and_then(|v| v.as_array()).expect("stats");
    assert_eq!(stats.len(), 5);

    for s in stats {
        let mean = s.get("mean").and_then(|v| v.as_f64()).expect("mean");
        let max = s
            .get("max")
            .and_then(|m| m.get("value"))
            .and_then(|v| v.as_f64())
            .expect("max");
        let min = s
            .get("min")
            .and_then(|m| m.get("value"))
            .and_then(|v| v.as_f64())
            .expect("min");
        assert!(min <= mean && mean <= max, "mean outside [min, max]: {}", s);
    }

    // Roll 3 has no sem-III score: it drops out of that column only.
    assert_eq!(stats[2].get("scoredCount").and_then(|v| v.as_u64()), Some(6));
    assert_eq!(stats[2].get("missingCount").and_then(|v| v.as_u64()), Some(1));
    assert_eq!(stats[0].get("scoredCount").and_then(|v| v.as_u64()), Some(7));

    // Rolls 2 and 4 share the sem-I maximum; the first row in file order wins.
    let max_holder = stats[0]
        .get("max")
        .and_then(|m| m.get("rollNumber"))
        .and_then(|v| v.as_str());
    assert_eq!(max_holder, Some("2"));
    let min_holder = stats[0]
        .get("min")
        .and_then(|m| m.get("rollNumber"))
        .and_then(|v| v.as_str());
    assert_eq!(min_holder, Some("3"));

    let chart = result
        .get("chartPngBase64")
        .and_then(|v| v.as_str())
        .expect("chart");
    let png = STANDARD.decode(chart).expect("decode chart");
    assert_eq!(&png[..8], &PNG_MAGIC);
}

#[test]
fn class_open_with_no_rows_is_empty_dataset() {
    let workspace = temp_dir("rollbookd-class-empty");
    write_roster(&workspace, ROSTER_HEADER, &[]);
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    request_err(
        &mut stdin,
        &mut reader,
        "1",
        "analytics.class.open",
        json!({}),
        "empty_dataset",
    );
}

#[test]
fn class_open_with_an_all_missing_column_is_empty_dataset() {
    let workspace = temp_dir("rollbookd-class-gap-column");
    write_roster(
        &workspace,
        ROSTER_HEADER,
        &[
            "1,Aarav Sharma,M,PRN001,,,,,,,7.0,8.0,,,",
            "2,Asha Kulkarni,F,PRN002,,,,,,,9.0,,,,",
        ],
    );
    let (_child, mut stdin, mut reader) = spawn_sidecar();
    select_workspace(&mut stdin, &mut reader, &workspace);

    let error = request_err(
        &mut stdin,
        &mut reader,
        "1",
        "analytics.class.open",
        json!({}),
        "empty_dataset",
    );
    assert!(error
        .get("message")
        .and_then(|v| v.as_str())
        .map(|m| m.contains("sem-III"))
        .unwrap_or(false));
}
