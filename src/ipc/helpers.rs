use std::path::PathBuf;

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::roster::{self, StudentRecord};

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn workspace(state: &AppState, req: &Request) -> Result<PathBuf, serde_json::Value> {
    state
        .workspace
        .clone()
        .ok_or_else(|| err(&req.id, "no_workspace", "select a workspace first", None))
}

/// Re-read the roster from disk. Every view renders from a fresh load; there
/// is no cache to invalidate.
pub fn load_roster(state: &AppState, req: &Request) -> Result<Vec<StudentRecord>, serde_json::Value> {
    let Some(path) = state.roster_path() else {
        return Err(err(&req.id, "no_workspace", "select a workspace first", None));
    };
    roster::load(&path).map_err(|e| err(&req.id, &e.code, e.message, None))
}
