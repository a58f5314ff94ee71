//! Domain error type returned by repositories, reports and lookups.
//!
//! Command handlers work in `anyhow::Result` and pick this up through `?`;
//! the HTTP layer maps each variant to a status code.

use crate::libs::messages::Message;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(Message),

    #[error("{0}")]
    NotFound(Message),

    #[error("{0}")]
    Conflict(Message),

    /// The record is in a state that forbids the change.
    #[error("{0}")]
    Locked(Message),

    #[error("{0}")]
    Lookup(Message),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("export error: {0}")]
    Export(String),
}

impl AppError {
    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Conflict(_) => "conflict",
            AppError::Locked(_) => "locked",
            AppError::Lookup(_) => "lookup",
            AppError::Database(_) => "database",
            AppError::Io(_) => "io",
            AppError::Pdf(_) => "pdf",
            AppError::Export(_) => "export",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(e.to_string())
    }
}
