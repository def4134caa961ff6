use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::json;
use std::path::Path;

use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{required_str, workspace};
use crate::ipc::types::{AppState, Request};
use crate::roster::Gender;

const PORTRAIT_MALE: &str = "male.jpg";
const PORTRAIT_FEMALE: &str = "female.jpg";
const PORTRAIT_DEFAULT: &str = "default.jpg";
const TIMETABLE: &str = "timetable.jpg";

fn portrait_file(gender: Gender) -> &'static str {
    match gender {
        Gender::Male => PORTRAIT_MALE,
        Gender::Female => PORTRAIT_FEMALE,
        Gender::Other => PORTRAIT_DEFAULT,
    }
}

/// Static assets live in the workspace under fixed filenames; the bytes are
/// passed through untouched.
fn read_asset(req: &Request, workspace: &Path, file_name: &str) -> serde_json::Value {
    let path = workspace.join(file_name);
    if !path.is_file() {
        return err(
            &req.id,
            "not_found",
            format!("missing asset: {}", file_name),
            None,
        );
    }
    match std::fs::read(&path) {
        Ok(bytes) => ok(
            &req.id,
            json!({
                "fileName": file_name,
                "bytesBase64": STANDARD.encode(&bytes),
            }),
        ),
        Err(e) => err(&req.id, "io_failed", e.to_string(), None),
    }
}

fn handle_portrait(state: &mut AppState, req: &Request) -> serde_json::Value {
    let gender = match required_str(req, "gender") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let ws = match workspace(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    read_asset(req, &ws, portrait_file(Gender::parse(&gender)))
}

fn handle_timetable(state: &mut AppState, req: &Request) -> serde_json::Value {
    let ws = match workspace(state, req) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    read_asset(req, &ws, TIMETABLE)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assets.portrait" => Some(handle_portrait(state, req)),
        "assets.timetable" => Some(handle_timetable(state, req)),
        _ => None,
    }
}
