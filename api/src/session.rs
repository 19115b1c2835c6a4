//! Session context and its on-disk store.
//!
//! DESIGN
//! ======
//! The server address, bearer token, and role live in one plain value,
//! [`SessionContext`], passed explicitly to [`crate::ApiClient::new`]. The
//! [`SessionStore`] persists that value as a small JSON file so it survives
//! restarts; it is the only place that touches the disk.
//!
//! Signing out drops the token and role but keeps the server address, so a
//! user never has to re-enter it between accounts.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::types::UserRole;

/// Everything a request needs to reach and authenticate with the backend.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionContext {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn user_role(&self) -> Option<UserRole> {
        self.role.as_deref().map(UserRole::from_name)
    }

    /// Replace the stored server address with `base_url` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidServerUrl`] for addresses that are not
    /// absolute http(s) URLs.
    pub fn with_server_override(mut self, base_url: Option<&str>) -> Result<Self, SessionError> {
        if let Some(raw) = base_url {
            self.base_url = Some(normalize_base_url(raw)?);
        }
        Ok(self)
    }
}

/// Validate a user-entered server address and strip trailing slashes.
///
/// # Errors
///
/// Returns [`SessionError::InvalidServerUrl`] unless the address starts with
/// `http://` or `https://` and parses as a URL with a host.
pub fn normalize_base_url(raw: &str) -> Result<String, SessionError> {
    let trimmed = raw.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(SessionError::InvalidServerUrl(trimmed.to_owned()));
    }
    let parsed = reqwest::Url::parse(trimmed).map_err(|_| SessionError::InvalidServerUrl(trimmed.to_owned()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(SessionError::InvalidServerUrl(trimmed.to_owned()));
    }
    Ok(trimmed.trim_end_matches('/').to_owned())
}

/// JSON-file persistence for a [`SessionContext`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store under the platform configuration directory.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoConfigDir`] when no home directory is known.
    pub fn at_default_location() -> Result<Self, SessionError> {
        let dirs = directories::ProjectDirs::from("", "", "fieldvisit").ok_or(SessionError::NoConfigDir)?;
        Ok(Self::new(dirs.config_dir().join("session.json")))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file yields an empty context.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<SessionContext, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(SessionContext::default()),
            Err(error) => Err(error.into()),
        }
    }

    /// Write `session` to disk, creating parent directories as needed.
    ///
    /// The file is written to a sibling temporary file readable only by the
    /// owner and then renamed over the target, so readers never observe a
    /// partial write.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, session: &SessionContext) -> Result<(), SessionError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        let mut file = tempfile::NamedTempFile::new_in(parent)?;
        serde_json::to_writer_pretty(&mut file, session)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|error| error.error)?;
        Ok(())
    }

    /// Load for a read-modify-write. An unparseable file is replaced rather
    /// than blocking the commands that would repair it.
    fn load_for_update(&self) -> Result<SessionContext, SessionError> {
        match self.load() {
            Err(SessionError::Json(error)) => {
                tracing::warn!(path = %self.path.display(), %error, "session file unreadable; starting fresh");
                Ok(SessionContext::default())
            }
            other => other,
        }
    }

    /// Validate and persist a new server address.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidServerUrl`] or an I/O error.
    pub fn set_server(&self, raw: &str) -> Result<SessionContext, SessionError> {
        let base_url = normalize_base_url(raw)?;
        let mut session = self.load_for_update()?;
        session.base_url = Some(base_url);
        self.save(&session)?;
        tracing::info!(base_url = session.base_url.as_deref().unwrap_or_default(), "server address saved");
        Ok(session)
    }

    /// Persist a fresh token and role.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or written.
    pub fn sign_in(&self, token: &str, role: Option<&str>) -> Result<SessionContext, SessionError> {
        let mut session = self.load_for_update()?;
        session.token = Some(token.to_owned());
        session.role = role.map(ToOwned::to_owned);
        self.save(&session)?;
        tracing::info!(role = role.unwrap_or("unknown"), "signed in");
        Ok(session)
    }

    /// Forget the token and role, keeping the server address.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or written.
    pub fn sign_out(&self) -> Result<SessionContext, SessionError> {
        let mut session = self.load_for_update()?;
        session.token = None;
        session.role = None;
        self.save(&session)?;
        tracing::info!("signed out");
        Ok(session)
    }
}
