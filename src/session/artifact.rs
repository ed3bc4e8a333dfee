//! Credential artifact format and the in-memory session built from it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::PRIMARY_SESSION_COOKIE;

/// A cookie as recorded by the login helper; extra browser fields are ignored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactCookie {
    pub name: String,
    pub value: String,
}

/// On-disk credential artifact written by the login helper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialArtifact {
    #[serde(default)]
    pub cookies: Vec<ArtifactCookie>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

/// Where the current credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSource {
    /// The login helper ran during this process
    FreshLogin,
    /// Loaded from an artifact left by an earlier run
    Reloaded,
}

/// Cookie and header state attached to every platform request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub cookies: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub source: SessionSource,
}

impl Session {
    /// Keep only the primary session cookie; every header is carried over
    #[must_use]
    pub fn from_artifact(artifact: CredentialArtifact, source: SessionSource) -> Self {
        let cookies = artifact
            .cookies
            .into_iter()
            .filter(|cookie| cookie.name == PRIMARY_SESSION_COOKIE)
            .map(|cookie| (cookie.name, cookie.value))
            .collect();

        Self {
            cookies,
            headers: artifact.headers,
            source,
        }
    }

    #[must_use]
    pub fn has_primary_cookie(&self) -> bool {
        self.cookies.contains_key(PRIMARY_SESSION_COOKIE)
    }

    /// `Cookie` header value, if there is anything to send
    #[must_use]
    pub fn cookie_header(&self) -> Option<String> {
        if self.cookies.is_empty() {
            return None;
        }
        Some(
            self.cookies
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}
