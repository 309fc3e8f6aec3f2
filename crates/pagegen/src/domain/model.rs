//! Domain models for index ranges, planned pages, and generation reports.

use std::fmt;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::domain::errors::GenerateError;

/// Inclusive, non-empty range of page indices, iterated in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexRange {
    start: i64,
    end: i64,
}

impl IndexRange {
    /// Build a range, rejecting `start > end`.
    pub fn new(start: i64, end: i64) -> Result<Self, GenerateError> {
        if start > end {
            return Err(GenerateError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Range covering exactly one index.
    pub fn single(index: i64) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    pub fn end(&self) -> i64 {
        self.end
    }

    /// Number of indices in the range, saturating at `u64::MAX`.
    pub fn page_count(&self) -> u64 {
        let span = i128::from(self.end) - i128::from(self.start) + 1;
        u64::try_from(span).unwrap_or(u64::MAX)
    }

    pub fn contains(&self, index: i64) -> bool {
        (self.start..=self.end).contains(&index)
    }

    pub fn iter(&self) -> RangeInclusive<i64> {
        self.start..=self.end
    }
}

impl IntoIterator for IndexRange {
    type Item = i64;
    type IntoIter = RangeInclusive<i64>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// One output artifact: where it goes and what it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub index: i64,
    pub path: PathBuf,
    pub content: String,
}

/// A page whose filename has been rendered and checked but not yet written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedPage {
    pub index: i64,
    pub file_name: String,
    pub path: PathBuf,
}

/// Ordered, collision-free list of pages for one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationPlan {
    pub output_directory: PathBuf,
    pub pages: Vec<PlannedPage>,
}

impl GenerationPlan {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// File names in index order, one per line.
    pub fn listing(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.file_name.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of a completed batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    pub output_directory: PathBuf,
    pub written: Vec<PathBuf>,
}

impl GenerationReport {
    pub(crate) fn new(output_directory: &Path) -> Self {
        Self {
            output_directory: output_directory.to_path_buf(),
            written: Vec::new(),
        }
    }

    /// Number of files written.
    pub fn count(&self) -> usize {
        self.written.len()
    }
}
