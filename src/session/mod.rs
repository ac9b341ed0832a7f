// src/session/mod.rs
//
// Session-token storage.
//
// The remote API hands out one bearer token per login; this module
// decides where that token lives. File-backed for real use, in-memory
// for tests and short-lived embedders.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{AppError, AppResult};

/// Session file name inside the storage directory
const SESSION_FILE: &str = "session.json";

/// Persisted session payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub token: String,

    /// When the token was obtained. Informational; the API does not
    /// publish an expiry.
    pub saved_at: DateTime<Utc>,
}

/// Where the session token lives between (and during) runs.
pub trait SessionStore: Send + Sync {
    /// Persist a freshly issued token, replacing any previous one.
    fn save_token(&self, token: &str) -> AppResult<()>;

    /// The stored token, if any. Unreadable storage reads as "logged
    /// out", never as an error.
    fn token(&self) -> Option<String>;

    /// Forget the stored token.
    fn clear(&self) -> AppResult<()>;
}

/// Token storage backed by a JSON file.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Store the session under the platform data directory
    /// ({APP_DATA}/herodex/session.json).
    pub fn in_data_dir() -> AppResult<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| AppError::Other("Could not determine app data directory".to_string()))?;

        Ok(Self::new(data_dir.join("herodex")))
    }

    fn session_path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

impl SessionStore for FileSessionStore {
    fn save_token(&self, token: &str) -> AppResult<()> {
        let data = SessionData {
            token: token.to_string(),
            saved_at: Utc::now(),
        };

        let contents = serde_json::to_string_pretty(&data)?;
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.session_path(), contents)?;
        Ok(())
    }

    fn token(&self) -> Option<String> {
        let path = self.session_path();
        if !path.exists() {
            return None;
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "session file unreadable; treating as logged out");
                return None;
            }
        };

        match serde_json::from_str::<SessionData>(&contents) {
            Ok(data) => Some(data.token),
            Err(e) => {
                warn!(error = %e, "session file corrupt; treating as logged out");
                None
            }
        }
    }

    fn clear(&self) -> AppResult<()> {
        let path = self.session_path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory token holder.
#[derive(Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that starts out logged in; handy for tests.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn save_token(&self, token: &str) -> AppResult<()> {
        *self.token.lock().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn clear(&self) -> AppResult<()> {
        *self.token.lock().unwrap() = None;
        Ok(())
    }
}
