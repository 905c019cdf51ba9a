// Session persistence: stores the opaque authentication state Instagram
// hands back (cookies plus csrf token) so later runs can skip the full
// credential login. Only `api::IgClient` looks inside the blob; the rest
// of the tool passes it through.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Default session file, relative to the working directory.
pub const SESSION_FILE: &str = "session.json";

/// Opaque authentication state for one logged-in account.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub csrf_token: String,
    pub cookies: HashMap<String, String>,
}

impl Session {
    /// Value for the `Cookie` request header.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Loads and saves `Session` blobs at a fixed path.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored session, or `None` when the file is missing or
    /// unreadable. A corrupt file just means a fresh credential login.
    pub fn load(&self) -> Option<Session> {
        let data = std::fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&data).ok()
    }

    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        let data = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, data)
    }
}
