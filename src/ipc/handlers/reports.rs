use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;

use crate::calc;
use crate::chart;
use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{load_roster, required_str};
use crate::ipc::types::{AppState, Request};
use crate::report;
use crate::roster;

/// One-page PDF for one student: identity table plus the comparison chart.
/// The bytes go back to the shell, which offers them as a download.
fn handle_report_student(state: &mut AppState, req: &Request) -> serde_json::Value {
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
            tracing::warn!(%roll_number, error = %e.message, "report chart render failed");
            return err(&req.id, &e.code, e.message, None);
        }
    };
    let pdf = match report::build(record, &png) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%roll_number, error = %e.message, "report build failed");
            return err(&req.id, &e.code, e.message, None);
        }
    };
    ok(
        &req.id,
        json!({
            "fileName": report::file_name(record),
            "pdfBase64": STANDARD.encode(&pdf),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "report.student" => Some(handle_report_student(state, req)),
        _ => None,
    }
}
