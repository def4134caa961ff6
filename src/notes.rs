use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const NOTES_DIR: &str = "Notes";

#[derive(Debug, Clone, Serialize)]
pub struct NotesError {
    pub code: String,
    pub message: String,
}

impl NotesError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

fn io_err(e: std::io::Error) -> NotesError {
    NotesError::new("io_failed", e.to_string())
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub body: String,
    pub modified_at: String,
}

fn note_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{}.txt", id))
}

/// `note_<14-digit timestamp>`, with an optional `_<n>` suffix minted when two
/// saves land in the same second. Anything else never touches the filesystem.
fn valid_id(id: &str) -> bool {
    let Some(rest) = id.strip_prefix("note_") else {
        return false;
    };
    let mut parts = rest.splitn(2, '_');
    let stamp = parts.next().unwrap_or("");
    let stamp_ok = stamp.len() == 14 && stamp.bytes().all(|b| b.is_ascii_digit());
    match parts.next() {
        None => stamp_ok,
        Some(n) => stamp_ok && !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()),
    }
}

/// A new note is a new file; there is no update-in-place.
pub fn save(workspace: &Path, body: &str) -> Result<String, NotesError> {
    let dir = workspace.join(NOTES_DIR);
    std::fs::create_dir_all(&dir).map_err(io_err)?;
    let stamp = Local::now().format("%Y%m%d%H%M%S");
    let mut id = format!("note_{}", stamp);
    let mut bump = 1;
    while note_path(&dir, &id).exists() {
        bump += 1;
        id = format!("note_{}_{}", stamp, bump);
    }
    std::fs::write(note_path(&dir, &id), body).map_err(io_err)?;
    Ok(id)
}

/// All notes, newest modification first. Files that are not well-formed notes
/// are ignored rather than failing the listing.
pub fn list(workspace: &Path) -> Result<Vec<Note>, NotesError> {
    let dir = workspace.join(NOTES_DIR);
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut entries: Vec<(SystemTime, Note)> = Vec::new();
    for ent in std::fs::read_dir(&dir).map_err(io_err)? {
        let ent = ent.map_err(io_err)?;
        let path = ent.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if !valid_id(id) {
            continue;
        }
        let body = std::fs::read_to_string(&path).map_err(io_err)?;
        let modified = ent
            .metadata()
            .and_then(|m| m.modified())
            .map_err(io_err)?;
        entries.push((
            modified,
            Note {
                id: id.to_string(),
                body,
                modified_at: DateTime::<Local>::from(modified).to_rfc3339(),
            },
        ));
    }
    entries.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| b.1.id.cmp(&a.1.id)));
    Ok(entries.into_iter().map(|(_, n)| n).collect())
}

pub fn delete(workspace: &Path, id: &str) -> Result<(), NotesError> {
    if !valid_id(id) {
        return Err(NotesError::new("bad_params", "malformed note id"));
    }
    let path = note_path(&workspace.join(NOTES_DIR), id);
    if !path.is_file() {
        return Err(NotesError::new("not_found", format!("no such note: {}", id)));
    }
    std::fs::remove_file(&path).map_err(io_err)
}
