//! Error types for the PX expansion pipeline.
//!
//! - [`PxError`] - statement splitting and record expansion errors
//! - [`SourceError`] - reading and decoding input text
//! - [`ExportError`] - writing records out
//! - [`PipelineError`] - top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Core Errors
// =============================================================================

/// Errors raised while splitting statements or expanding records.
#[derive(Debug, Error)]
pub enum PxError {
    /// A statement has no `=` separator.
    #[error("Malformed statement (no '=' separator): {0}")]
    MalformedStatement(String),

    /// No `DATA` statement was collated.
    #[error("No DATA statement found")]
    MissingData,

    /// The data sequence ran out before the dimension product did.
    #[error("DATA exhausted at record {record}: fewer values than dimension combinations")]
    ExhaustedData {
        /// 0-based index of the record that could not be completed.
        record: usize,
    },

    /// The csv reader failed on a statement value.
    #[error("Invalid statement value: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Source Errors
// =============================================================================

/// Errors while acquiring the PX text.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// The requested encoding label is not known.
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors while writing records.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writer failed.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level errors returned by [`crate::pipeline::convert_file`] and friends.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Parsing or expansion error.
    #[error("PX error: {0}")]
    Px(#[from] PxError),

    /// Input error.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Output error.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for parsing and expansion.
pub type PxResult<T> = Result<T, PxError>;

/// Result type for text acquisition.
pub type SourceResult<T> = Result<T, SourceError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
