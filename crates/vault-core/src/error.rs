//! Unified application error types for the vault.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
///
/// This is a closed set: every failure an operation can surface maps to
/// exactly one of these kinds, and callers (an HTTP layer, a CLI) dispatch
/// on the kind rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested file, version, or owner was not found (or is not
    /// owned by the caller).
    NotFound,
    /// Input validation failed (non-positive size or credits, empty
    /// filename, disallowed content type).
    Validation,
    /// The uploaded file exceeds the configured maximum size.
    FileTooLarge,
    /// The upload would push the owner past their byte quota.
    QuotaExceeded,
    /// The owner does not hold enough credits for the purchase.
    InsufficientCredits,
    /// A storage backend read or write failed.
    Storage,
    /// A concurrent write invalidated the expected record state; the
    /// caller should retry the whole operation.
    StateConflict,
    /// A metadata store (database) error occurred.
    Database,
    /// A configuration error occurred.
    Configuration,
}

impl ErrorKind {
    /// Whether an operation failing with this kind is worth retrying
    /// as-is. Storage and conflict failures are transient; the rest are
    /// terminal until the caller changes its input or state.
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Storage | Self::StateConflict | Self::Database)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::FileTooLarge => write!(f, "FILE_TOO_LARGE"),
            Self::QuotaExceeded => write!(f, "QUOTA_EXCEEDED"),
            Self::InsufficientCredits => write!(f, "INSUFFICIENT_CREDITS"),
            Self::Storage => write!(f, "STORAGE_IO"),
            Self::StateConflict => write!(f, "STATE_CONFLICT"),
            Self::Database => write!(f, "DATABASE"),
            Self::Configuration => write!(f, "CONFIGURATION"),
        }
    }
}

/// The unified application error used throughout the vault.
///
/// All crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls. This provides a single error type for
/// the entire application boundary.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a file-too-large error.
    pub fn file_too_large(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::FileTooLarge, message)
    }

    /// Create a quota-exceeded error.
    pub fn quota_exceeded(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::QuotaExceeded, message)
    }

    /// Create an insufficient-credits error.
    pub fn insufficient_credits(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InsufficientCredits, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a state-conflict error.
    pub fn state_conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::StateConflict, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Whether the caller may meaningfully retry the failed operation.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
