//! Session lifecycle and persistence.

pub mod model;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{TaskSyncError, TaskSyncResult};
use model::Session;

/// Storage namespace for persisted client state.
pub const NAMESPACE: &str = "tasksync";

const SESSION_FILE: &str = "session.json";

/// File-backed store for the authenticated session.
///
/// The single source of truth for "who is signed in". Constructed once at
/// startup and handed to whatever needs the identity or token; nothing else
/// reads the backing file.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    session: Option<Session>,
}

impl SessionStore {
    /// Open the store rooted at `dir`, loading any persisted session.
    ///
    /// A missing file means signed out. An unreadable file is discarded with
    /// a warning instead of failing startup.
    pub fn open(dir: impl AsRef<Path>) -> TaskSyncResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(SESSION_FILE);
        let session = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Session>(&raw) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(error = %e, path = %path.display(), "discarding unreadable session file");
                    None
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), signed_in = session.is_some(), "session store opened");
        Ok(Self { path, session })
    }

    /// The active session, if any.
    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The bearer token of the active session, if any.
    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// The active session, or `NoSession` when signed out.
    pub fn require(&self) -> TaskSyncResult<&Session> {
        self.session.as_ref().ok_or(TaskSyncError::NoSession)
    }

    /// Persist a new session, replacing any previous one.
    pub fn set(&mut self, session: Session) -> TaskSyncResult<()> {
        fs::write(&self.path, serde_json::to_string_pretty(&session)?)?;
        debug!(user = %session.user.email, "session persisted");
        self.session = Some(session);
        Ok(())
    }

    /// Remove the persisted session in full. No-op when signed out.
    pub fn clear(&mut self) -> TaskSyncResult<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)?;
        }
        self.session = None;
        debug!("session cleared");
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
