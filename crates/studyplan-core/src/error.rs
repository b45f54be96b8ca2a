//! Core error types for studyplan-core.
//!
//! The planner separates malformed input ([`FormatError`]) from input that is
//! well-formed but cannot produce a plan ([`ValidationError`]), so callers can
//! map each to its own response without inspecting messages.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studyplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Planning run rejected
    #[error(transparent)]
    Plan(#[from] PlanError),

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Calendar export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// OAuth-related errors
    #[error("OAuth error: {0}")]
    OAuth(#[from] OAuthError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Malformed wall-clock time string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Invalid time '{value}': expected HH:MM")]
    Malformed { value: String },

    #[error("Invalid time '{value}': hour and minute must be numeric")]
    NonNumeric { value: String },

    #[error("Invalid hour {hour}: must be between 0 and 23")]
    HourOutOfRange { hour: u32 },

    #[error("Invalid minute {minute}: must be between 0 and 59")]
    MinuteOutOfRange { minute: u32 },
}

/// Well-formed input that cannot produce a plan.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("At least one subject is required")]
    NoSubjects,

    #[error("Invalid start date '{value}': expected YYYY-MM-DD within the supported calendar range")]
    InvalidStartDate { value: String },

    #[error("Daily window is {minutes} minutes long; at least {min} minutes are required")]
    WindowTooShort { minutes: i64, min: i64 },

    #[error("No study session fits in the requested window; widen the daily window or the horizon")]
    NoStudySessions,

    #[error("Plan would contain {count} items, more than the limit of {max}")]
    TooManyItems { count: usize, max: usize },
}

/// Reason a planning run was rejected. No partial plan accompanies either kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Stored row could not be decoded
    #[error("Corrupt row: {0}")]
    Corrupt(String),

    /// Owner has never saved a plan
    #[error("No plan found for '{owner}'")]
    NoPlan { owner: String },

    /// Item is not part of the owner's current plan
    #[error("Item {item_id} is not part of the current plan")]
    ItemNotFound { item_id: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be created
    #[error("Failed to prepare data directory: {0}")]
    DataDir(#[from] std::io::Error),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Calendar export errors.
///
/// `InvalidDates`, `Rejected` and `Transport` are per-event failures that the
/// batch collects; `Credential` and `BatchFailed` end the batch.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid dates for '{title}': end must be after start")]
    InvalidDates { title: String },

    #[error("Calendar API rejected the event ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Access token was rejected")]
    Unauthorized,

    #[error("Credential error: {0}")]
    Credential(#[from] OAuthError),

    #[error("No events were created ({} errors), first: {}", .errors.len(), first_error(.errors))]
    BatchFailed { total: usize, errors: Vec<String> },
}

impl From<reqwest::Error> for ExportError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status == reqwest::StatusCode::UNAUTHORIZED => ExportError::Unauthorized,
            Some(status) => ExportError::Rejected {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => ExportError::Transport(err.to_string()),
        }
    }
}

fn first_error(errors: &[String]) -> &str {
    errors.first().map(String::as_str).unwrap_or("unknown")
}

/// OAuth-specific errors.
#[derive(Error, Debug)]
pub enum OAuthError {
    /// Authorization failed
    #[error("Authorization failed: {0}")]
    AuthorizationFailed(String),

    /// Token exchange failed
    #[error("Token exchange failed: {0}")]
    TokenExchangeFailed(String),

    /// Token refresh failed
    #[error("Token refresh failed: {0}")]
    TokenRefreshFailed(String),

    /// Invalid callback
    #[error("Invalid OAuth callback: {0}")]
    InvalidCallback(String),

    /// Access token expired
    #[error("Access token expired and no refresh token available")]
    TokenExpired,

    /// Not authenticated
    #[error("Not authenticated with {service}")]
    NotAuthenticated { service: String },

    /// Credentials not configured
    #[error("OAuth credentials not configured for {service}")]
    CredentialsNotConfigured { service: String },

    /// OS keyring failure
    #[error("Keyring error: {0}")]
    Keyring(String),
}

impl From<keyring::Error> for OAuthError {
    fn from(err: keyring::Error) -> Self {
        OAuthError::Keyring(err.to_string())
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
