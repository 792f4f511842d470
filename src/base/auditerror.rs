use crate::cookies::browser::Dialect;
use crate::cookies::timecodec::TimeEncoding;
use std::io;
use thiserror::Error;

/// Errors raised while extracting or classifying a cookie store.
///
/// Per-store failures (`Unreadable`, `SchemaUnsupported`, `InvalidBrowser`) abort
/// that store's pipeline only. `ConversionSkipped` and `CopyFailed` never abort
/// anything; they are logged and, for `CopyFailed`, reported as warnings.
#[derive(Debug, Error)]
pub enum AuditError {
    // Store errors
    #[error("Cookie store {path} is unreadable: {reason}")]
    Unreadable { path: String, reason: String },
    #[error("Cookie store {path} matches no known {dialect} schema: {reason}")]
    SchemaUnsupported {
        path: String,
        dialect: Dialect,
        reason: String,
    },
    #[error("Unrecognized browser '{0}'")]
    InvalidBrowser(String),
    #[error("No cookie store location known for {browser}")]
    StoreNotFound { browser: String },

    // Non-fatal conditions
    #[error("Timestamp {raw} could not be converted from {encoding}")]
    ConversionSkipped { raw: i64, encoding: TimeEncoding },
    #[error("Could not snapshot {path}, reading it in place: {reason}")]
    CopyFailed { path: String, reason: String },

    // Configuration and output
    #[error("Invalid rule table: {0}")]
    InvalidRules(String),
    #[error("I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Audit task for {label} did not complete: {reason}")]
    TaskFailed { label: String, reason: String },
}

impl AuditError {
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AuditError::Unreadable {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn schema_unsupported(
        path: impl Into<String>,
        dialect: Dialect,
        reason: impl Into<String>,
    ) -> Self {
        AuditError::SchemaUnsupported {
            path: path.into(),
            dialect,
            reason: reason.into(),
        }
    }

    pub fn copy_failed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        AuditError::CopyFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_rules(reason: impl Into<String>) -> Self {
        AuditError::InvalidRules(reason.into())
    }

    /// Whether this error ends the pipeline for the store it was raised on.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AuditError::ConversionSkipped { .. } | AuditError::CopyFailed { .. }
        )
    }

    /// Stable, machine-readable name for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            AuditError::Unreadable { .. } => "unreadable",
            AuditError::SchemaUnsupported { .. } => "schema_unsupported",
            AuditError::InvalidBrowser(_) => "invalid_browser",
            AuditError::StoreNotFound { .. } => "store_not_found",
            AuditError::ConversionSkipped { .. } => "conversion_skipped",
            AuditError::CopyFailed { .. } => "copy_failed",
            AuditError::InvalidRules(_) => "invalid_rules",
            AuditError::Io { .. } => "io",
            AuditError::Json(_) => "json",
            AuditError::TaskFailed { .. } => "task_failed",
        }
    }
}
