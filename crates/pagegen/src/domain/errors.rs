//! Domain-specific errors.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::model::IndexRange;

/// Failures raised while planning or writing a batch of pages.
///
/// Every variant aborts the whole batch; nothing is retried or skipped.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("invalid index range: start {start} is greater than end {end}")]
    InvalidRange { start: i64, end: i64 },

    #[error("index range {range} holds more than {limit} pages")]
    RangeTooLarge { range: IndexRange, limit: u64 },

    #[error("index {index} is outside the configured range {range}")]
    IndexOutOfRange { index: i64, range: IndexRange },

    #[error("failed to render {kind} pattern for index {index}")]
    Pattern {
        index: i64,
        kind: PatternKind,
        #[source]
        source: PatternError,
    },

    #[error("filename '{file_name}' for index {index} is not a single path component")]
    InvalidFilename { index: i64, file_name: String },

    #[error("filename '{file_name}' is produced by both index {first} and index {second}")]
    FilenameCollision {
        file_name: String,
        first: i64,
        second: i64,
    },

    #[error("failed to create output directory {}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to {stage} page for index {index} at {}", path.display())]
    FileWrite {
        index: i64,
        path: PathBuf,
        stage: WriteStage,
        #[source]
        source: io::Error,
    },
}

impl GenerateError {
    /// The index the failure is attributed to, if any.
    pub fn index(&self) -> Option<i64> {
        match self {
            GenerateError::IndexOutOfRange { index, .. }
            | GenerateError::Pattern { index, .. }
            | GenerateError::InvalidFilename { index, .. }
            | GenerateError::FileWrite { index, .. } => Some(*index),
            GenerateError::FilenameCollision { second, .. } => Some(*second),
            GenerateError::InvalidRange { .. }
            | GenerateError::RangeTooLarge { .. }
            | GenerateError::DirectoryCreation { .. } => None,
        }
    }
}

/// Which of the two per-index patterns failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    Filename,
    Content,
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PatternKind::Filename => "filename",
            PatternKind::Content => "content",
        })
    }
}

/// Step of a single file write that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStage {
    Open,
    Write,
    Sync,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WriteStage::Open => "open",
            WriteStage::Write => "write",
            WriteStage::Sync => "sync",
        })
    }
}

/// Errors produced while compiling or rendering an index pattern.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("invalid pattern '{source_text}': {message}")]
    Syntax {
        source_text: String,
        message: String,
    },

    #[error("pattern failed for index {index}: {message}")]
    Render { index: i64, message: String },
}
