//! Error types for seqpipe operations.
//!
//! This module defines [`SeqpipeError`], the primary error type used
//! throughout the pipeline driver, and a [`Result`] type alias.
//!
//! # Error Handling Strategy
//!
//! - Argument and file-existence problems are detected eagerly, before any
//!   step runs, so a failed invocation creates no partial state
//! - `StepExecutionFailure` aborts only the current stage instance; already
//!   produced intermediates from prior successful steps are left in place
//! - Use `anyhow::Error` (via `SeqpipeError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for seqpipe operations.
#[derive(Debug, Error)]
pub enum SeqpipeError {
    /// Pipeline configuration file not found.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the pipeline configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A referenced input file (work table, read file, BAM, list) is absent.
    #[error("Input file not found: {path}")]
    MissingInputFile { path: PathBuf },

    /// Work table has an unexpected column count.
    #[error("Malformed work table {path}: expected 2 or 3 tab-separated columns, found {columns}")]
    MalformedWorkTable { path: PathBuf, columns: usize },

    /// Array task index does not select a row of the work table.
    #[error("Task index {index} out of range for table with {rows} rows (indices are 1-based)")]
    IndexOutOfRange { index: usize, rows: usize },

    /// An external tool invoked by a step exited non-zero.
    #[error("Step '{step}' failed with exit code {code:?}: {command}")]
    StepExecutionFailure {
        step: String,
        command: String,
        code: Option<i32>,
    },

    /// A downstream stage could not be enqueued.
    ///
    /// Distinct from downstream *execution* failure, which this process
    /// cannot observe once the stage is launched.
    #[error("Failed to enqueue downstream stage '{stage}': {message}")]
    SpawnFailure { stage: String, message: String },

    /// A scatter-gather group is missing completion markers.
    #[error(
        "Scatter group '{prefix}' incomplete: {found} of {expected} markers present \
         (missing task indices: {missing})"
    )]
    IncompleteScatterGroup {
        prefix: String,
        expected: usize,
        found: usize,
        missing: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for seqpipe operations.
pub type Result<T> = std::result::Result<T, SeqpipeError>;
