use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{load_roster, required_str};
use crate::ipc::types::{AppState, Request};
use crate::roster::{self, Lookup, StudentRecord};
use serde_json::json;

fn record_json(req: &Request, record: &StudentRecord) -> Result<serde_json::Value, serde_json::Value> {
    serde_json::to_value(record)
        .map_err(|e| err(&req.id, "internal", format!("serialize record: {}", e), None))
}

fn handle_roster_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let roster = match load_roster(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let students: Vec<serde_json::Value> = roster
        .iter()
        .map(|r| {
            json!({
                "rollNumber": r.roll_number,
                "name": r.name,
                "displayName": r.display_name(),
            })
        })
        .collect();
    ok(&req.id, json!({ "count": students.len(), "students": students }))
}

fn handle_roster_get(state: &mut AppState, req: &Request) -> serde_json::Value {
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
    match record_json(req, record) {
        Ok(v) => ok(&req.id, json!({ "student": v })),
        Err(resp) => resp,
    }
}

fn handle_roster_find(state: &mut AppState, req: &Request) -> serde_json::Value {
    let query = match required_str(req, "query") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let roster = match load_roster(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match roster::find(&roster, &query) {
        Lookup::None => err(
            &req.id,
            "not_found",
            format!("no roll number matches {:?}", query.trim()),
            None,
        ),
        Lookup::Unique(idx) => match record_json(req, &roster[idx]) {
            Ok(v) => ok(&req.id, json!({ "student": v })),
            Err(resp) => resp,
        },
        Lookup::Ambiguous(indices) => {
            let candidates: Vec<&str> = indices
                .iter()
                .map(|&i| roster[i].roll_number.as_str())
                .collect();
            err(
                &req.id,
                "ambiguous",
                format!("{} roll numbers match {:?}", candidates.len(), query.trim()),
                Some(json!({ "candidates": candidates })),
            )
        }
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roster.list" => Some(handle_roster_list(state, req)),
        "roster.get" => Some(handle_roster_get(state, req)),
        "roster.find" => Some(handle_roster_find(state, req)),
        _ => None,
    }
}
