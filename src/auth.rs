//! Sign-in through an external identity provider, and the persisted session.
//!
//! Nothing here verifies tokens: whatever the provider hands back is trusted,
//! and the resulting assertion is carried to the signup forms and dashboards
//! through the session file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::AuthError;
use crate::models::Role;

const POPUP_CLOSED: &str = "auth/popup-closed-by-user";
const POPUP_BLOCKED: &str = "auth/popup-blocked";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    GitHub,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ProviderKind::Google => "google",
            ProviderKind::GitHub => "github",
        })
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "google" => Ok(ProviderKind::Google),
            "github" => Ok(ProviderKind::GitHub),
            other => Err(format!("unknown provider '{}' (google, github)", other)),
        }
    }
}

/// What a provider returns for a signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub photo_url: Option<String>,
}

/// A provider-reported failure, identified by its error code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderFailure {
    pub code: String,
    #[serde(default)]
    pub message: String,
}

pub trait IdentityProvider {
    fn kind(&self) -> ProviderKind;
    fn sign_in(&self) -> Result<ProviderUser, ProviderFailure>;
}

/// Provider backed by a claims file exported from the provider's sign-in flow.
///
/// The file is either a user record or `{"error": {"code": .., "message": ..}}`.
pub struct ClaimsFileProvider {
    kind: ProviderKind,
    contents: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ClaimsFile {
    Failure { error: ProviderFailure },
    User(ProviderUser),
}

impl ClaimsFileProvider {
    pub fn from_path(kind: ProviderKind, path: &Path) -> std::io::Result<Self> {
        Ok(Self::from_json(kind, std::fs::read_to_string(path)?))
    }

    pub fn from_json(kind: ProviderKind, contents: impl Into<String>) -> Self {
        Self {
            kind,
            contents: contents.into(),
        }
    }
}

impl IdentityProvider for ClaimsFileProvider {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn sign_in(&self) -> Result<ProviderUser, ProviderFailure> {
        match serde_json::from_str::<ClaimsFile>(&self.contents) {
            Ok(ClaimsFile::User(user)) => Ok(user),
            Ok(ClaimsFile::Failure { error }) => Err(error),
            Err(e) => Err(ProviderFailure {
                code: "auth/invalid-claims".to_string(),
                message: format!("Failed to sign in: {}", e),
            }),
        }
    }
}

/// Identity claims consumed by the signup forms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityAssertion {
    pub uid: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    /// Set only for GitHub sign-ins.
    pub github: String,
}

pub fn classify_failure(failure: ProviderFailure) -> AuthError {
    match failure.code.as_str() {
        POPUP_CLOSED => AuthError::Cancelled,
        POPUP_BLOCKED => AuthError::PopupBlocked,
        _ => AuthError::Provider {
            message: if failure.message.is_empty() {
                "Failed to sign in. Please try again.".to_string()
            } else {
                failure.message
            },
            code: failure.code,
        },
    }
}

pub fn authenticate(provider: &dyn IdentityProvider) -> Result<IdentityAssertion, AuthError> {
    let user = provider.sign_in().map_err(|failure| {
        warn!(provider = %provider.kind(), code = %failure.code, "sign-in failed");
        classify_failure(failure)
    })?;

    if user.uid.trim().is_empty() {
        return Err(AuthError::MissingIdentity);
    }
    let email = user
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or(AuthError::MissingEmail)?;
    let name = user.display_name.unwrap_or_default();
    let github = match provider.kind() {
        ProviderKind::GitHub => name.clone(),
        ProviderKind::Google => String::new(),
    };

    info!(provider = %provider.kind(), uid = %user.uid, "signed in");
    Ok(IdentityAssertion {
        uid: user.uid,
        name,
        email,
        photo_url: user.photo_url.unwrap_or_default(),
        github,
    })
}

/// The signed-in identity and chosen role, persisted between commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub role: Role,
    pub identity: IdentityAssertion,
    /// Ideas bookmarked in this session.
    #[serde(default)]
    pub saved_ideas: BTreeSet<String>,
}

impl Session {
    pub fn new(role: Role, identity: IdentityAssertion) -> Self {
        Self {
            role,
            identity,
            saved_ideas: BTreeSet::new(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.identity.uid
    }

    pub fn load(path: &Path) -> Result<Option<Self>, AuthError> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path).map_err(|e| AuthError::Session(e.to_string()))?;
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| AuthError::Session(e.to_string()))
    }

    /// Loads the session or fails with a missing-identity error.
    pub fn require(path: &Path) -> Result<Self, AuthError> {
        match Self::load(path)? {
            Some(session) if !session.identity.uid.is_empty() => Ok(session),
            _ => Err(AuthError::MissingIdentity),
        }
    }

    pub fn require_role(&self, role: Role) -> Result<(), AuthError> {
        if self.role == role {
            Ok(())
        } else {
            Err(AuthError::WrongRole {
                expected: role.to_string(),
                actual: self.role.to_string(),
            })
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), AuthError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AuthError::Session(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(self).map_err(|e| AuthError::Session(e.to_string()))?;
        std::fs::write(path, raw).map_err(|e| AuthError::Session(e.to_string()))
    }

    pub fn clear(path: &Path) -> std::io::Result<bool> {
        if path.exists() {
            std::fs::remove_file(path)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Toggles a bookmark, returning whether the idea is now saved.
    pub fn toggle_saved(&mut self, idea_id: &str) -> bool {
        if self.saved_ideas.remove(idea_id) {
            false
        } else {
            self.saved_ideas.insert(idea_id.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn provider(kind: ProviderKind, json: &str) -> ClaimsFileProvider {
        ClaimsFileProvider::from_json(kind, json)
    }

    #[test]
    fn test_github_sign_in_copies_handle() {
        let p = provider(
            ProviderKind::GitHub,
            r#"{"uid": "gh-1", "display_name": "octocat", "email": "o@example.com"}"#,
        );
        let assertion = authenticate(&p).unwrap();
        assert_eq!(assertion.uid, "gh-1");
        assert_eq!(assertion.github, "octocat");
        assert_eq!(assertion.photo_url, "");
    }

    #[test]
    fn test_google_sign_in_has_no_handle() {
        let p = provider(
            ProviderKind::Google,
            r#"{"uid": "g-1", "display_name": "Ada L", "email": "ada@example.com"}"#,
        );
        assert_eq!(authenticate(&p).unwrap().github, "");
    }

    #[test]
    fn test_missing_email_is_rejected() {
        let p = provider(ProviderKind::Google, r#"{"uid": "g-1", "display_name": "Ada"}"#);
        assert!(matches!(authenticate(&p), Err(AuthError::MissingEmail)));
    }

    #[test]
    fn test_missing_uid_is_rejected() {
        let p = provider(ProviderKind::Google, r#"{"email": "a@b.c"}"#);
        assert!(matches!(authenticate(&p), Err(AuthError::MissingIdentity)));

        let blank = provider(ProviderKind::GitHub, r#"{"uid": "  ", "email": "a@b.c"}"#);
        assert!(matches!(authenticate(&blank), Err(AuthError::MissingIdentity)));
    }

    #[test]
    fn test_error_codes_are_classified() {
        let cancelled = provider(
            ProviderKind::Google,
            r#"{"error": {"code": "auth/popup-closed-by-user"}}"#,
        );
        assert!(matches!(authenticate(&cancelled), Err(AuthError::Cancelled)));

        let blocked = provider(
            ProviderKind::GitHub,
            r#"{"error": {"code": "auth/popup-blocked", "message": "blocked"}}"#,
        );
        assert!(matches!(authenticate(&blocked), Err(AuthError::PopupBlocked)));

        let other = provider(
            ProviderKind::GitHub,
            r#"{"error": {"code": "auth/network-request-failed", "message": "offline"}}"#,
        );
        match authenticate(&other) {
            Err(AuthError::Provider { code, message }) => {
                assert_eq!(code, "auth/network-request-failed");
                assert_eq!(message, "offline");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_claims_are_a_generic_failure() {
        let p = provider(ProviderKind::Google, "not json");
        assert!(matches!(authenticate(&p), Err(AuthError::Provider { .. })));
    }

    #[test]
    fn test_session_round_trip_and_require() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state/session.json");

        assert!(matches!(Session::require(&path), Err(AuthError::MissingIdentity)));

        let mut session = Session::new(
            Role::Developer,
            IdentityAssertion {
                uid: "u1".into(),
                ..Default::default()
            },
        );
        assert!(session.toggle_saved("idea1"));
        session.save(&path).unwrap();

        let loaded = Session::require(&path).unwrap();
        assert_eq!(loaded, session);
        assert!(loaded.require_role(Role::Developer).is_ok());
        assert!(matches!(
            loaded.require_role(Role::Recruiter),
            Err(AuthError::WrongRole { .. })
        ));

        assert!(Session::clear(&path).unwrap());
        assert!(!Session::clear(&path).unwrap());
    }

    #[test]
    fn test_toggle_saved_flips() {
        let mut session = Session::new(Role::Investor, IdentityAssertion::default());
        assert!(session.toggle_saved("a"));
        assert!(!session.toggle_saved("a"));
        assert!(session.saved_ideas.is_empty());
    }
}
