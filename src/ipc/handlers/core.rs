use anyhow::Context;
use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request, DEFAULT_ROSTER_FILE};
use serde_json::json;
use std::path::{Path, PathBuf};

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

/// Select the data directory. The roster is not loaded eagerly here: every
/// view re-reads it, so a bad roster file surfaces on the first view instead
/// of blocking workspace selection.
fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let path = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = path else {
        return err(&req.id, "bad_params", "missing params.path", None);
    };
    if !path.is_dir() {
        return err(
            &req.id,
            "io_failed",
            format!("workspace is not a directory: {}", path.display()),
            None,
        );
    }
    let roster_file = match req.params.get("rosterFile") {
        None => DEFAULT_ROSTER_FILE.to_string(),
        Some(v) => match v.as_str() {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => return err(&req.id, "bad_params", "rosterFile must be a file name", None),
        },
    };

    // Best-effort probe. A missing roster must not prevent selection: the
    // notes and timetable views work without one.
    if let Err(e) = probe_roster(&path, &roster_file) {
        tracing::warn!(error = %e, "workspace selected without a readable roster");
    }

    tracing::info!(workspace = %path.display(), %roster_file, "workspace selected");
    state.workspace = Some(path.clone());
    state.roster_file = roster_file.clone();
    ok(
        &req.id,
        json!({
            "workspacePath": path.to_string_lossy(),
            "rosterFile": roster_file,
        }),
    )
}

fn probe_roster(workspace: &Path, roster_file: &str) -> anyhow::Result<()> {
    let path = workspace.join(roster_file);
    std::fs::metadata(&path)
        .with_context(|| format!("cannot stat roster file {}", path.display()))?;
    Ok(())
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        _ => None,
    }
}
