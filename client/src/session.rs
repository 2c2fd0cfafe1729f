//! Persisted session state: the bearer token and display name.
//!
//! # Design
//! The store exclusively owns the persisted pair. It is read once at startup
//! and written on login/registration; logout clears both values together.
//! There is no expiry and no refresh: a stored token is trusted until the
//! backend rejects it.
//!
//! The durable backing is a small JSON file (the shell picks the path). Tests
//! and short-lived embedders can use the in-memory variant, which has the
//! same contract minus durability.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The authenticated identity: opaque token plus display name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

/// Durable key/value storage for the session pair.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    current: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Open a file-backed store, reading any previously persisted session.
    /// A missing, unreadable, or corrupt file simply means "no session".
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let current = fs::read_to_string(&path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok());
        Self {
            path: Some(path),
            current: Mutex::new(current),
        }
    }

    /// A store with no durable backing.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: Mutex::new(None),
        }
    }

    /// Persist both values. The in-memory copy is updated even if the write
    /// to disk fails, so the session still covers the current run.
    pub fn set(&self, token: &str, username: &str) -> io::Result<()> {
        let session = Session {
            token: token.to_string(),
            username: username.to_string(),
        };
        let mut current = self.current.lock().expect("session store lock poisoned");
        *current = Some(session.clone());
        if let Some(path) = &self.path {
            let raw = serde_json::to_string_pretty(&session)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            fs::write(path, raw)?;
        }
        Ok(())
    }

    /// Current session, if any.
    pub fn get(&self) -> Option<Session> {
        self.current
            .lock()
            .expect("session store lock poisoned")
            .clone()
    }

    /// Remove both values, in memory and on disk.
    pub fn clear(&self) -> io::Result<()> {
        let mut current = self.current.lock().expect("session store lock poisoned");
        *current = None;
        if let Some(path) = &self.path {
            match fs::remove_file(path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_set_get_clear() {
        let store = SessionStore::in_memory();
        assert!(store.get().is_none());

        store.set("tok", "alice").unwrap();
        let session = store.get().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.username, "alice");

        store.clear().unwrap();
        assert!(store.get().is_none());
    }

    #[test]
    fn file_backed_session_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.set("tok", "alice").unwrap();
        drop(store);

        let reopened = SessionStore::open(&path);
        let session = reopened.get().unwrap();
        assert_eq!(session.token, "tok");
        assert_eq!(session.username, "alice");
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = SessionStore::open(&path);
        store.set("tok", "alice").unwrap();
        store.clear().unwrap();
        assert!(!path.exists());

        // Clearing an already-clear store is fine.
        store.clear().unwrap();
        assert!(SessionStore::open(&path).get().is_none());
    }

    #[test]
    fn corrupt_file_means_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(SessionStore::open(&path).get().is_none());
    }
}
