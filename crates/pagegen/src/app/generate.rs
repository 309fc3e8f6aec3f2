//! Batch page generation.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

use crate::app::pattern::IndexPattern;
use crate::domain::errors::{GenerateError, PatternKind};
use crate::domain::model::{
    GeneratedPage, GenerationPlan, GenerationReport, IndexRange, PlannedPage,
};
use crate::infra::fs;

/// Largest batch [`PageGenerator::plan`] accepts. Every filename is held in memory while planning.
pub const MAX_PAGES: u64 = 100_000;

/// Immutable description of one batch: where pages go, which indices to
/// produce, and how each page's name and body are derived from its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    output_directory: PathBuf,
    range: IndexRange,
    filename_pattern: IndexPattern,
    content_pattern: IndexPattern,
    template_prefix: String,
    template_suffix: String,
}

impl GeneratorConfig {
    /// Configuration with an empty prefix and suffix.
    pub fn new(
        output_directory: impl Into<PathBuf>,
        range: IndexRange,
        filename_pattern: IndexPattern,
        content_pattern: IndexPattern,
    ) -> Self {
        Self {
            output_directory: output_directory.into(),
            range,
            filename_pattern,
            content_pattern,
            template_prefix: String::new(),
            template_suffix: String::new(),
        }
    }

    /// Surround every page body with `prefix` and `suffix`.
    pub fn with_template(mut self, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        self.template_prefix = prefix.into();
        self.template_suffix = suffix.into();
        self
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn range(&self) -> IndexRange {
        self.range
    }

    pub fn filename_pattern(&self) -> &IndexPattern {
        &self.filename_pattern
    }

    pub fn content_pattern(&self) -> &IndexPattern {
        &self.content_pattern
    }

    pub fn template_prefix(&self) -> &str {
        &self.template_prefix
    }

    pub fn template_suffix(&self) -> &str {
        &self.template_suffix
    }
}

/// Plans and writes one page per index of a [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct PageGenerator {
    config: GeneratorConfig,
}

impl PageGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Render and check every page of the batch without touching the filesystem.
    ///
    /// Fails if the range holds more than [`MAX_PAGES`] indices, if a filename
    /// is not a single path component, if two indices share a filename, or if
    /// either pattern cannot be rendered for any index. Rendered bodies are
    /// discarded.
    pub fn plan(&self) -> Result<GenerationPlan, GenerateError> {
        let range = self.config.range;
        if range.page_count() > MAX_PAGES {
            return Err(GenerateError::RangeTooLarge {
                range,
                limit: MAX_PAGES,
            });
        }

        let mut seen: HashMap<String, i64> = HashMap::new();
        let mut pages = Vec::new();

        for index in range {
            let file_name = self.file_name(index)?;
            self.body(index)?;
            if let Some(&first) = seen.get(&file_name) {
                return Err(GenerateError::FilenameCollision {
                    file_name,
                    first,
                    second: index,
                });
            }
            seen.insert(file_name.clone(), index);
            pages.push(PlannedPage {
                index,
                path: self.config.output_directory.join(&file_name),
                file_name,
            });
        }

        Ok(GenerationPlan {
            output_directory: self.config.output_directory.clone(),
            pages,
        })
    }

    /// Build the full page for a single index of the configured range.
    pub fn render_page(&self, index: i64) -> Result<GeneratedPage, GenerateError> {
        if !self.config.range.contains(index) {
            return Err(GenerateError::IndexOutOfRange {
                index,
                range: self.config.range,
            });
        }
        let file_name = self.file_name(index)?;
        Ok(GeneratedPage {
            index,
            path: self.config.output_directory.join(file_name),
            content: self.page_content(index)?,
        })
    }

    /// Write every page of the batch, stopping at the first failure.
    pub fn generate(&self) -> Result<GenerationReport, GenerateError> {
        let plan = self.plan()?;
        let dir = &self.config.output_directory;

        tracing::info!(
            directory = %dir.display(),
            range = %self.config.range,
            pages = plan.len(),
            "generating pages"
        );

        fs::ensure_directory(dir).map_err(|source| {
            tracing::warn!(directory = %dir.display(), error = %source, "cannot create output directory");
            GenerateError::DirectoryCreation {
                path: dir.clone(),
                source,
            }
        })?;

        let mut report = GenerationReport::new(dir);
        for page in plan.pages {
            let content = self.page_content(page.index)?;
            fs::write_truncate(&page.path, &content).map_err(|(stage, source)| {
                tracing::warn!(
                    index = page.index,
                    path = %page.path.display(),
                    written = report.count(),
                    error = %source,
                    "aborting batch"
                );
                GenerateError::FileWrite {
                    index: page.index,
                    path: page.path.clone(),
                    stage,
                    source,
                }
            })?;
            tracing::debug!(index = page.index, path = %page.path.display(), bytes = content.len(), "wrote page");
            report.written.push(page.path);
        }

        tracing::info!(written = report.count(), "generation complete");
        Ok(report)
    }

    fn file_name(&self, index: i64) -> Result<String, GenerateError> {
        let file_name = self
            .config
            .filename_pattern
            .render(index)
            .map_err(|source| GenerateError::Pattern {
                index,
                kind: PatternKind::Filename,
                source,
            })?;
        if !is_single_component(&file_name) {
            return Err(GenerateError::InvalidFilename { index, file_name });
        }
        Ok(file_name)
    }

    fn body(&self, index: i64) -> Result<String, GenerateError> {
        self.config
            .content_pattern
            .render(index)
            .map_err(|source| GenerateError::Pattern {
                index,
                kind: PatternKind::Content,
                source,
            })
    }

    fn page_content(&self, index: i64) -> Result<String, GenerateError> {
        let body = self.body(index)?;
        let mut content = String::with_capacity(
            self.config.template_prefix.len() + body.len() + self.config.template_suffix.len(),
        );
        content.push_str(&self.config.template_prefix);
        content.push_str(&body);
        content.push_str(&self.config.template_suffix);
        Ok(content)
    }
}

/// Generate every page described by `config`.
pub fn generate(config: &GeneratorConfig) -> Result<GenerationReport, GenerateError> {
    PageGenerator::new(config.clone()).generate()
}

fn is_single_component(file_name: &str) -> bool {
    if file_name.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(file_name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
