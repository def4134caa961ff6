use serde_json::json;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, workspace};
use crate::ipc::types::{AppState, Request};
use crate::notes;

fn handle_notes_save(state: &mut AppState, req: &Request) -> serde_json::Value {
    let body = match required_str(req, "body") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    if body.trim().is_empty() {
        return err(&req.id, "bad_params", "note body is empty", None);
    }
    let ws = match workspace(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match notes::save(&ws, &body) {
        Ok(id) => ok(&req.id, json!({ "noteId": id })),
        Err(e) => err(&req.id, &e.code, e.message, None),
    }
}

fn handle_notes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ws = match workspace(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match notes::list(&ws) {
        Ok(all) => match serde_json::to_value(&all) {
            Ok(v) => ok(&req.id, json!({ "notes": v })),
            Err(e) => err(&req.id, "internal", format!("serialize notes: {}", e), None),
        },
        Err(e) => err(&req.id, &e.code, e.message, None),
    }
}

fn handle_notes_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let note_id = match required_str(req, "noteId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let ws = match workspace(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match notes::delete(&ws, &note_id) {
        Ok(()) => ok(&req.id, json!({ "deleted": true })),
        Err(e) => err(&req.id, &e.code, e.message, None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "notes.save" => Some(handle_notes_save(state, req)),
        "notes.list" => Some(handle_notes_list(state, req)),
        "notes.delete" => Some(handle_notes_delete(state, req)),
        _ => None,
    }
}
