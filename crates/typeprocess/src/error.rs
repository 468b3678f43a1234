//! Error types for typeprocess.
//!
//! Two layers live here: [`SubmitError`], the tagged outcome of a single
//! create-item call, and [`Error`], the crate-wide error covering
//! configuration, I/O and serialization failures around it.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Classification of a failed submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The server answered 403 for the target web.
    AccessDenied,
    /// The server answered 404 for the target web.
    NotFound,
    /// Any other non-success status or a failure below HTTP.
    Transport,
    /// A success status whose body lacked the expected result envelope.
    Malformed,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AccessDenied => write!(f, "access_denied"),
            Self::NotFound => write!(f, "not_found"),
            Self::Transport => write!(f, "transport"),
            Self::Malformed => write!(f, "malformed"),
        }
    }
}

/// A failed create-item call.
///
/// The `Display` output is exactly `message`, so callers that only want the
/// human-readable string can use `to_string()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmitError {
    /// What went wrong.
    pub kind: ErrorKind,
    /// HTTP status code, when one was received.
    pub status: Option<u16>,
    /// Human-readable (possibly localized) message.
    pub message: String,
}

impl SubmitError {
    /// Create a new submission error.
    #[must_use]
    pub fn new(kind: ErrorKind, status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            message: message.into(),
        }
    }

    /// Create a malformed-response error.
    #[must_use]
    pub fn malformed(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Malformed, Some(status), message)
    }

    /// Check if the server refused access to the web.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        self.kind == ErrorKind::AccessDenied
    }

    /// Check if the web or list could not be found.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// The main error type for typeprocess operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Submission Errors ===
    /// A create-item call failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// A required setting was supplied neither on the command line nor in config.
    #[error("missing setting '{name}': pass it as an argument or set it in the config file")]
    MissingSetting {
        /// Name of the missing setting.
        name: &'static str,
    },

    // === Localization Errors ===
    /// Failed to load a string table resource.
    #[error("failed to load string table from {path}: {message}")]
    StringTableLoad {
        /// Path to the resource file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === HTTP Errors ===
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to read an input file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path that couldn't be read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for typeprocess operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new HTTP client construction error.
    #[must_use]
    pub fn http_client(message: impl Into<String>) -> Self {
        Self::HttpClient(message.into())
    }

    /// Create a configuration validation error.
    #[must_use]
    pub fn config_validation(message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            message: message.into(),
        }
    }

    /// The submission error kind, if this error came from a create-item call.
    #[must_use]
    pub fn submit_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Submit(err) => Some(err.kind),
            _ => None,
        }
    }
}
