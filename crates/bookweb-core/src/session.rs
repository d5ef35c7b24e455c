//! Authentication token storage and the guard for protected views
//!
//! The token lives behind a [`TokenStore`]; a [`Session`] wraps the store and
//! is handed to the API client at construction, so tests can swap in a
//! [`MemoryTokenStore`].

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Durable home of the authentication token
pub trait TokenStore: Send + Sync {
    fn load(&self) -> CoreResult<Option<String>>;
    fn save(&self, token: &str) -> CoreResult<()>;
    fn clear(&self) -> CoreResult<()>;
}

/// Token kept in a single file, survives restarts.
///
/// The file is read once; after that the cached copy is served and every
/// change is written through to disk.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    /// `None` until the file has been read
    cached: RwLock<Option<Option<String>>>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn read_file(&self) -> CoreResult<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &self.path, e)),
        }
    }

    fn remember(&self, token: Option<String>) -> CoreResult<()> {
        *self.cached.write().map_err(|_| poisoned())? = Some(token);
        Ok(())
    }
}

fn io_error(action: &str, path: &PathBuf, error: std::io::Error) -> CoreError {
    CoreError::Session {
        message: format!("failed to {} {}: {}", action, path.display(), error),
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> CoreResult<Option<String>> {
        if let Some(token) = self.cached.read().map_err(|_| poisoned())?.as_ref() {
            return Ok(token.clone());
        }
        let token = self.read_file()?;
        self.remember(token.clone())?;
        Ok(token)
    }

    fn save(&self, token: &str) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| io_error("create", &parent.to_path_buf(), e))?;
        }
        std::fs::write(&self.path, token).map_err(|e| io_error("write", &self.path, e))?;
        self.remember(Some(token.to_string()))
    }

    fn clear(&self) -> CoreResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error("remove", &self.path, e)),
        }
        self.remember(None)
    }
}

/// Process-local token, used by tests
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

fn poisoned() -> CoreError {
    CoreError::Session {
        message: "token lock poisoned".to_string(),
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> CoreResult<Option<String>> {
        Ok(self.token.read().map_err(|_| poisoned())?.clone())
    }

    fn save(&self, token: &str) -> CoreResult<()> {
        *self.token.write().map_err(|_| poisoned())? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        *self.token.write().map_err(|_| poisoned())? = None;
        Ok(())
    }
}

/// Handle on the signed-in state, cheap to clone
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(Arc::new(FileTokenStore::new(path)))
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStore::default()))
    }

    /// Current token; an unreadable store counts as signed out
    pub fn token(&self) -> Option<String> {
        match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                log::warn!(target: "bookweb::session", "Cannot read token: {}", e);
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn sign_in(&self, token: &str) -> CoreResult<()> {
        self.store.save(token)?;
        log::info!(target: "bookweb::session", "Signed in");
        Ok(())
    }

    pub fn sign_out(&self) -> CoreResult<()> {
        self.store.clear()?;
        log::info!(target: "bookweb::session", "Signed out");
        Ok(())
    }
}

/// What to do with a request for a protected view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
}

/// Token-presence gate. No validity or expiry check is made.
pub struct SessionGuard;

impl SessionGuard {
    pub const LOGIN_PATH: &'static str = "/login";

    pub fn check(session: &Session) -> GuardDecision {
        if session.is_authenticated() {
            GuardDecision::Render
        } else {
            GuardDecision::Redirect(Self::LOGIN_PATH)
        }
    }
}
