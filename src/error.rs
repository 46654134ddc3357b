//! Application error type shared by clients and services.
//!
//! Every variant carries a human-readable message plus structured JSON details
//! that end up in the run's error log, so a failed record can be traced back
//! to the input row and the remote path involved.

use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input or configuration that can never succeed as given.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// A resource, field, or input source that should exist does not.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// A resource already occupies the requested path.
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Local I/O failure (input file, log files, local client storage).
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }
    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Stable identifier used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::Conflict { .. } => "conflict",
            AppError::Io { .. } => "io_error",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn details(&self) -> Value {
        match self {
            AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::Conflict { details, .. }
            | AppError::Internal { details, .. } => details.clone(),
            AppError::Io { source, .. } => json!({ "kind": source.kind().to_string() }),
        }
    }

    /// One-line rendering for the error log: `code: message {details}`.
    pub fn log_detail(&self) -> String {
        let details = self.details();
        let is_empty = details.is_null() || details.as_object().is_some_and(|o| o.is_empty());
        if is_empty {
            format!("{}: {}", self.code(), self)
        } else {
            format!("{}: {} {}", self.code(), self, details)
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::io("I/O error", e)
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        let position = e.position().map(|p| p.line());
        AppError::bad_request(
            "Malformed record set",
            json!({ "reason": e.to_string(), "line": position }),
        )
    }
}
