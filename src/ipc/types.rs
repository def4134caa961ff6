use std::path::PathBuf;

use serde::Deserialize;

pub const DEFAULT_ROSTER_FILE: &str = "roster.csv";

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub workspace: Option<PathBuf>,
    pub roster_file: String,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            workspace: None,
            roster_file: DEFAULT_ROSTER_FILE.to_string(),
        }
    }

    pub fn roster_path(&self) -> Option<PathBuf> {
        self.workspace.as_ref().map(|w| w.join(&self.roster_file))
    }
}
