//! # Pixy - PX file expansion
//!
//! Pixy reads PX statistical files (`KEY=VALUE;` statements) and re-expands
//! the flat `DATA` sequence into one labeled record per combination of
//! `VALUES("…")` labels.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   PX File   │────▶│   Parser    │────▶│   Expand    │────▶│   Export    │
//! │  (ANSI/UTF8)│     │ (KEY=VALUE) │     │ (odometer)  │     │ (json/csv)  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! Every stage is lazy: statements, statement values, combinations and the
//! data sequence are pulled one at a time.
//!
//! ## Quick Start
//!
//! ```rust
//! use pixy::PxParser;
//!
//! let parser = PxParser::new(
//!     r#"VALUES("year")="1988","1989";VALUES("month")="Jan","Feb";DATA=1,2,3,4;"#,
//! );
//! for record in parser.records().unwrap() {
//!     let record = record.unwrap();
//!     let (year, month) = (record.get("year").unwrap(), record.get("month").unwrap());
//!     println!("{} {} -> {}", year, month, record.data().unwrap());
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Dimensions and records
//! - [`parser`] - Statement splitting
//! - [`expand`] - Collation and record expansion
//! - [`source`] - File reading with encoding detection
//! - [`export`] - JSON, NDJSON and CSV output
//! - [`pipeline`] - End-to-end conversion
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Expansion
pub mod expand;

// Input / output
pub mod export;
pub mod source;

// Orchestration
pub mod logs;
pub mod pipeline;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    ExportError, PipelineError, PipelineResult, PxError, PxResult, SourceError, SourceResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{Dimension, Record, DATA_KEY};

// =============================================================================
// Re-exports - Parser
// =============================================================================

pub use parser::{
    parse, parse_statement, split_statements, PxParser, Statement, Statements, Values,
};

// =============================================================================
// Re-exports - Expansion
// =============================================================================

pub use expand::{collate, expand, DataStream, IntoRecords, Odometer, PxModel, Records};

// =============================================================================
// Re-exports - Source and Export
// =============================================================================

pub use export::{export_records, ExportFormat};
pub use source::{decode_content, detect_encoding, read_bytes, read_file, Decoded};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use pipeline::{
    convert_bytes, convert_file, convert_file_to, inspect_bytes, inspect_file, ConvertOptions,
    ConvertSummary, PxInfo,
};
