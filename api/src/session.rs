//! Session stores: where the bearer token and devotee id come from
//!
//! The client does not manage sign-in; it reads whatever session the host
//! application established. [`FileSession`] mirrors the original device
//! key-value store as a JSON file; [`InMemorySession`] backs tests and the
//! demo.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors reading the persisted session
#[derive(Debug, Error)]
pub enum SessionError {
    /// Backing store could not be read
    #[error("Session read failed: {0}")]
    ReadFailed(String),

    /// Backing store held data that did not parse
    #[error("Session data malformed: {0}")]
    Malformed(String),
}

/// Source of the signed-in devotee's credentials
///
/// `Ok(None)` means "not signed in" and is not an error: requests proceed
/// without an `Authorization` header and the server answers 401.
pub trait SessionStore: Send + Sync {
    /// Current bearer token, if signed in
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the backing store cannot be read or
    /// holds malformed data.
    fn token(&self) -> Result<Option<String>, SessionError>;

    /// Current devotee id, if signed in
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the backing store cannot be read or
    /// holds malformed data.
    fn devotee_id(&self) -> Result<Option<String>, SessionError>;
}

/// Fixed in-memory session for tests and demos
#[derive(Clone, Debug, Default)]
pub struct InMemorySession {
    token: Option<String>,
    devotee_id: Option<String>,
}

impl InMemorySession {
    /// Session for a signed-in devotee
    #[must_use]
    pub fn signed_in(token: impl Into<String>, devotee_id: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            devotee_id: Some(devotee_id.into()),
        }
    }

    /// Session with no credentials
    #[must_use]
    pub const fn signed_out() -> Self {
        Self {
            token: None,
            devotee_id: None,
        }
    }
}

impl SessionStore for InMemorySession {
    fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.token.clone())
    }

    fn devotee_id(&self) -> Result<Option<String>, SessionError> {
        Ok(self.devotee_id.clone())
    }
}

/// On-disk JSON layout: `{ "token": ..., "devoteeId": ... }`
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionFile {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    devotee_id: Option<String>,
}

/// Session persisted as a JSON file
///
/// The file is read on every call so an external sign-in/sign-out is picked
/// up without restarting. A missing file is simply "not signed in".
#[derive(Clone, Debug)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    /// Session backed by the given file
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Session path from `BOOKING_SESSION_PATH`, default `.booking-session.json`
    #[must_use]
    pub fn from_env() -> Self {
        let path = std::env::var("BOOKING_SESSION_PATH")
            .unwrap_or_else(|_| ".booking-session.json".to_string());
        Self::new(path)
    }

    fn read(&self) -> Result<Option<SessionFile>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map(Some)
                .map_err(|e| SessionError::Malformed(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SessionError::ReadFailed(e.to_string())),
        }
    }
}

impl SessionStore for FileSession {
    fn token(&self) -> Result<Option<String>, SessionError> {
        Ok(self.read()?.and_then(|file| file.token))
    }

    fn devotee_id(&self) -> Result<Option<String>, SessionError> {
        Ok(self.read()?.and_then(|file| file.devotee_id))
    }
}
