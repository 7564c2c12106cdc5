use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("session file {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default)]
    token: Option<String>,
}

/// Shared handle to the signed-in user's access token.
///
/// Cloning is cheap and every clone sees the same token. When backed by a
/// file, writes go through to disk immediately.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<StoredSession>>,
    path: Option<PathBuf>,
}

impl Session {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the session file at `path`. A missing file is an empty session.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let stored = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).map_err(|source| SessionError::Json {
                path: path.clone(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoredSession::default(),
            Err(source) => return Err(SessionError::Io { path, source }),
        };

        debug!(path = %path.display(), signed_in = stored.token.is_some(), "Loaded session");
        Ok(Self {
            inner: Arc::new(RwLock::new(stored)),
            path: Some(path),
        })
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Writes the token to disk, then makes it visible to every clone. On a
    /// failed write the previous token is kept.
    pub fn store_token(&self, token: impl Into<String>) -> Result<(), SessionError> {
        self.commit(StoredSession {
            token: Some(token.into()),
        })?;
        info!("Stored access token");
        Ok(())
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.commit(StoredSession::default())?;
        info!("Cleared access token");
        Ok(())
    }

    // The write lock is held across the disk write so concurrent commits
    // land on disk in the same order as in memory.
    fn commit(&self, next: StoredSession) -> Result<(), SessionError> {
        let mut stored = self.write();
        self.persist(&next)?;
        *stored = next;
        Ok(())
    }

    fn persist(&self, stored: &StoredSession) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| SessionError::Io {
            path: path.clone(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(stored).map_err(|source| SessionError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(path, content).map_err(io_err)
    }

    // A poisoned lock still holds a usable token.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoredSession> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoredSession> {
        self.inner.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.json")).unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn token_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = Session::load(&path).unwrap();
        session.store_token("abc.def.ghi").unwrap();

        let reloaded = Session::load(&path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("abc.def.ghi"));

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"token\""));
    }

    #[test]
    fn clear_removes_token_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let session = Session::load(&path).unwrap();
        session.store_token("abc").unwrap();
        session.clear().unwrap();

        assert!(!Session::load(&path).unwrap().is_authenticated());
    }

    #[test]
    fn clones_share_token() {
        let session = Session::in_memory();
        let other = session.clone();
        session.store_token("shared").unwrap();
        assert_eq!(other.token().as_deref(), Some("shared"));
    }

    fn unwritable_session(token: Option<&str>) -> (tempfile::TempDir, Session) {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "").unwrap();

        let session = Session {
            inner: Arc::new(RwLock::new(StoredSession {
                token: token.map(str::to_string),
            })),
            path: Some(blocker.join("session.json")),
        };
        (dir, session)
    }

    #[test]
    fn failed_store_keeps_previous_token() {
        let (_dir, session) = unwritable_session(None);

        let err = session.store_token("abc").unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn failed_clear_keeps_token() {
        let (_dir, session) = unwritable_session(Some("abc"));

        assert!(session.clear().is_err());
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            Session::load(&path),
            Err(SessionError::Json { .. })
        ));
    }
}
