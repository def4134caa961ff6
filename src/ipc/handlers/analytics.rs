use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::calc;
use crate::chart;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{load_roster, required_str};
use crate::ipc::types::{AppState, Request};
use crate::roster::{self, Semester, SEMESTER_LABELS};

fn stats_json(req: &Request, stats: &[calc::SemesterStats]) -> Result<serde_json::Value, serde_json::Value> {
    serde_json::to_value(stats)
        .map_err(|e| err(&req.id, "internal", format!("serialize stats: {}", e), None))
}

/// Class view: aggregate stats for every semester plus the rendered chart.
fn handle_class_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match load_roster(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let stats = match calc::aggregate(&roster, &Semester::ALL) {
        Ok(v) => v,
        Err(e) => return err(&req.id, &e.code, e.message, e.details),
    };
    let png = match chart::render_class_chart(&stats) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e.message, "class chart render failed");
            return err(&req.id, &e.code, e.message, None);
        }
    };
    let stats_value = match stats_json(req, &stats) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    ok(
        &req.id,
        json!({
            "semesters": SEMESTER_LABELS,
            "stats": stats_value,
            "chartPngBase64": STANDARD.encode(&png),
        }),
    )
}

/// Student view: the selected record, its score series, the class mean
/// series, and the rendered comparison chart.
fn handle_student_open(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roll_number = match required_str(req, "rollNumber") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let roster = match load_roster(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let Some(record) = roster::get_by_roll(&roster, &roll_number) else {
        return err(
            &req.id,
            "not_found",
            format!("no student with roll number {}", roll_number),
            None,
        );
    };
    let class_mean = calc::class_mean_series(&roster);
    let png = match chart::render_student_chart(&record.name, &record.scores, &class_mean) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%roll_number, error = %e.message, "student chart render failed");
            return err(&req.id, &e.code, e.message, None);
        }
    };
    let record_value = match serde_json::to_value(record) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "internal", format!("serialize record: {}", e), None),
    };
    ok(
        &req.id,
        json!({
            "semesters": SEMESTER_LABELS,
            "student": record_value,
            "series": record.scores,
            "classMean": class_mean,
            "chartPngBase64": STANDARD.encode(&png),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "analytics.class.open" => Some(handle_class_open(state, req)),
        "analytics.student.open" => Some(handle_student_open(state, req)),
        _ => None,
    }
}
