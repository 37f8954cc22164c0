//! User-facing notices, the terminal counterpart of toast messages.

use std::fmt;

use crate::error::{AuthError, FormError, ReviewError, StoreError};
use crate::models::ApplicationStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn reviewed(status: ApplicationStatus) -> Self {
        Self::info("Success", format!("Application {} successfully", status))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)
    }
}

impl From<&AuthError> for Notice {
    fn from(err: &AuthError) -> Self {
        match err {
            // a closed window is the user's choice, not a failure
            AuthError::Cancelled => Notice::info("Authentication Cancelled", err.to_string()),
            AuthError::PopupBlocked => Notice::error("Popup Blocked", err.to_string()),
            AuthError::MissingIdentity => Notice::error("Error", err.to_string()),
            _ => Notice::error("Authentication Error", err.to_string()),
        }
    }
}

impl From<&FormError> for Notice {
    fn from(err: &FormError) -> Self {
        Notice::error("Validation Error", err.to_string())
    }
}

impl From<&StoreError> for Notice {
    fn from(err: &StoreError) -> Self {
        Notice::error("Error", err.to_string())
    }
}

impl From<&ReviewError> for Notice {
    fn from(err: &ReviewError) -> Self {
        match err {
            ReviewError::Store(_) => Notice::error("Error", "Failed to update application status"),
            other => Notice::error("Error", other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_auth_notices_are_tailored() {
        let cancelled = Notice::from(&AuthError::Cancelled);
        assert_eq!(cancelled.level, Level::Info);
        assert_eq!(cancelled.title, "Authentication Cancelled");

        let blocked = Notice::from(&AuthError::PopupBlocked);
        assert_eq!(blocked.title, "Popup Blocked");
        assert_eq!(blocked.level, Level::Error);

        let other = Notice::from(&AuthError::Provider {
            code: "auth/x".into(),
            message: "boom".into(),
        });
        assert_eq!(other.to_string(), "Authentication Error: boom");
    }

    #[test]
    fn test_store_failure_during_review_is_generic() {
        let err = ReviewError::Store(StoreError::NotAnObject);
        assert_eq!(
            Notice::from(&err).message,
            "Failed to update application status"
        );
    }

    #[test]
    fn test_reviewed_message() {
        assert_eq!(
            Notice::reviewed(ApplicationStatus::Accepted).message,
            "Application accepted successfully"
        );
    }
}
