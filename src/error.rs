//! Error types for the SEO auditor.
//!
//! This module provides structured error handling with:
//! - `FetchError`: Transport failures raised while retrieving a page
//! - `AppError`: Domain-specific errors for application operations
//! - `CommandError`: Serializable wrapper returned at the command boundary
//! - `Result<T>`: Type alias for Results using AppError

use serde::ser::SerializeStruct;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

// ============================================================================
// FETCH ERROR TYPE
// ============================================================================

/// Failures raised by the fetcher and its transports.
#[derive(Debug, Error)]
pub enum FetchError {
    /// DNS failure, refused connection, or any other way of not reaching the host.
    #[error("Could not reach {host}. The site may be down or the address may be misspelled.")]
    HostUnreachable { host: String },

    /// Secure transport negotiation failed
    #[error("Secure connection failed: {0}")]
    Tls(String),

    /// The bounded wait elapsed
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Any other transport failure, carrying the original message
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    pub fn unreachable(host: impl Into<String>) -> Self {
        Self::HostUnreachable { host: host.into() }
    }

    pub fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }
}

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for application operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// URL rejected before any network access
    #[error("Please enter a valid URL starting with http or https.")]
    InvalidUrl(String),

    /// Page retrieval failed
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// History store operation failed
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Writing or reading a corrected document failed
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Report could not be rendered
    #[error("Report error: {0}")]
    ReportError(String),

    /// Requested item does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic error with context
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::DatabaseError(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::StorageError(msg.into())
    }

    /// Create a report error
    pub fn report(msg: impl Into<String>) -> Self {
        Self::ReportError(msg.into())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

// ============================================================================
// COMMAND ERROR (FOR THE PRESENTATION LAYER)
// ============================================================================

/// User-visible error object returned from commands.
/// Serializes as `{ "error": "<message>" }`.
#[derive(Debug)]
pub struct CommandError(pub AppError);

impl CommandError {
    pub fn message(&self) -> String {
        self.0.to_string()
    }
}

impl std::error::Error for CommandError {}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for CommandError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CommandError", 1)?;
        state.serialize_field("error", &self.message())?;
        state.end()
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        Self(error)
    }
}

impl From<FetchError> for CommandError {
    fn from(error: FetchError) -> Self {
        Self(error.into())
    }
}
