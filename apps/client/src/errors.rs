use thiserror::Error;

use crate::profile::ProfileField;

/// Rejection of a single raw field value before it reaches the profile.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("'{value}' is not a valid {kind} (expected one of: {})", .allowed.join(", "))]
    NotAChoice {
        kind: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    #[error("{value} is outside {min}..={max}")]
    OutOfRange { value: String, min: f64, max: f64 },

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a valid date (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("'{0}' is not an http(s) URL")]
    InvalidUrl(String),
}

/// Errors raised by the profile store while editing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("Unknown profile field: {0}")]
    UnknownField(String),

    #[error("Invalid value for {field}: {source}")]
    InvalidValue {
        field: ProfileField,
        #[source]
        source: ValueError,
    },

    #[error("Profile is read-only outside an edit session")]
    NotEditing,
}

/// Errors raised while talking to the profile/autofill backend.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Expected a JSON object for the profile payload")]
    NotAnObject,

    #[error("Not signed in")]
    NotSignedIn,
}

impl ClientError {
    /// True when the backend answered 404, i.e. the user has no stored profile yet.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }
}
