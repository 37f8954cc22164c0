//! Typed errors for the store, identity, form and review seams.

use thiserror::Error;

use crate::models::{ApplicationStatus, Decision};
use crate::store::Collection;

/// Failure talking to the document store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{collection} document '{id}' not found")]
    NotFound { collection: Collection, id: String },

    #[error("malformed {collection} document '{id}': {source}")]
    Malformed {
        collection: Collection,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Failure establishing or reading the signed-in identity.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("You closed the authentication window. Please try again.")]
    Cancelled,

    #[error("Please allow popups for this site and try again.")]
    PopupBlocked,

    #[error("{message}")]
    Provider { code: String, message: String },

    #[error("No email provided from authentication provider")]
    MissingEmail,

    #[error("User ID not found. Please try logging in again.")]
    MissingIdentity,

    #[error("signed in as {actual}, but this action needs a {expected} account")]
    WrongRole { expected: String, actual: String },

    #[error("session file unreadable: {0}")]
    Session(String),
}

/// A form submission that does not carry the fields it needs.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all required fields (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),
}

/// Failure deciding an application.
#[derive(Error, Debug)]
pub enum ReviewError {
    #[error("cannot {decision} an application that is already {from}")]
    InvalidTransition {
        from: ApplicationStatus,
        decision: Decision,
    },

    #[error("application '{0}' is not on this dashboard")]
    UnknownApplication(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
