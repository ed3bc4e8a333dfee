//! Session lifecycle for one platform account
//!
//! Credentials live in a JSON artifact produced by an external login helper.
//! The manager loads it (running the helper first when it is missing) and
//! allows exactly one forced re-login per process.

pub mod artifact;
pub mod login;

use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

pub use artifact::{ArtifactCookie, CredentialArtifact, Session, SessionSource};
pub use login::{CommandLoginHelper, LoginHelper};

use crate::config::ScrapeConfig;
use crate::utils::PRIMARY_SESSION_COOKIE;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("Authentication exhausted: the single login retry did not produce a usable session")]
    AuthenticationExhausted,

    #[error("Login failed: {0}")]
    LoginFailed(String),

    #[error("Session IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct SessionManager {
    username: String,
    password: String,
    session_file: PathBuf,
    helper: Arc<dyn LoginHelper>,
    login_retried: AtomicBool,
}

impl SessionManager {
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        session_file: impl Into<PathBuf>,
        helper: Arc<dyn LoginHelper>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            session_file: session_file.into(),
            helper,
            login_retried: AtomicBool::new(false),
        }
    }

    /// Manager for the configured account, using the configured helper command
    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(
            config.username(),
            config.password(),
            config.session_file(),
            Arc::new(CommandLoginHelper::new(config.login_helper().clone())),
        )
    }

    #[must_use]
    pub fn session_file(&self) -> &Path {
        &self.session_file
    }

    /// Whether the single re-login has been spent
    #[must_use]
    pub fn login_retried(&self) -> bool {
        self.login_retried.load(Ordering::SeqCst)
    }

    /// Load the stored session, logging in first if there is none
    pub async fn ensure_session(&self) -> Result<Session, SessionError> {
        if tokio::fs::try_exists(&self.session_file).await? {
            info!("Reloading stored session from {}", self.session_file.display());
            return self.load(SessionSource::Reloaded).await;
        }

        info!("No stored session for {}, logging in", self.username);
        self.helper
            .login(&self.username, &self.password, &self.session_file)
            .await
            .map_err(|e| SessionError::SessionUnavailable(format!("initial login failed: {e}")))?;
        self.load(SessionSource::FreshLogin).await
    }

    /// Parse the credential artifact as it is on disk now
    pub async fn reload(&self) -> Result<Session, SessionError> {
        self.load(SessionSource::Reloaded).await
    }

    /// Discard the current artifact and log in again, at most once per process
    ///
    /// Any failure of the retry itself is `AuthenticationExhausted`.
    pub async fn retry_login_once(&self) -> Result<Session, SessionError> {
        if self.login_retried.swap(true, Ordering::SeqCst) {
            return Err(SessionError::AuthenticationExhausted);
        }

        warn!("Invalid credentials for {}, retrying login", self.username);
        match tokio::fs::remove_file(&self.session_file).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(SessionError::Io(e)),
        }

        if let Err(e) = self
            .helper
            .login(&self.username, &self.password, &self.session_file)
            .await
        {
            error!("Login retry for {} failed: {e}", self.username);
            return Err(SessionError::AuthenticationExhausted);
        }
        self.load(SessionSource::FreshLogin).await.map_err(|e| {
            error!("Session after login retry for {} is unusable: {e}", self.username);
            SessionError::AuthenticationExhausted
        })
    }

    async fn load(&self, source: SessionSource) -> Result<Session, SessionError> {
        let raw = tokio::fs::read_to_string(&self.session_file).await.map_err(|e| {
            SessionError::SessionUnavailable(format!(
                "cannot read {}: {e}",
                self.session_file.display()
            ))
        })?;
        let artifact: CredentialArtifact = serde_json::from_str(&raw).map_err(|e| {
            SessionError::SessionUnavailable(format!(
                "cannot parse {}: {e}",
                self.session_file.display()
            ))
        })?;

        let session = Session::from_artifact(artifact, source);
        if !session.has_primary_cookie() {
            warn!(
                "'{PRIMARY_SESSION_COOKIE}' cookie not found in {}",
                self.session_file.display()
            );
        }
        Ok(session)
    }
}
