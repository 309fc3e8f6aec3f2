//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::app::generate::GeneratorConfig;
use crate::app::pattern::IndexPattern;
use crate::domain::model::IndexRange;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static DEFAULT_WORKSPACE_CONFIG_PATH: &str = ".pagegen/config.toml";

pub const OUTPUT_DIR_ENV: &str = "PAGEGEN_OUTPUT_DIR";

/// Layered configuration loaded from defaults, user, workspace, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub output: Output,
    #[serde(default)]
    pub range: Range,
    #[serde(default)]
    pub patterns: Patterns,
    #[serde(default)]
    pub template: Template,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Output {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    end: Option<i64>,
}

impl Range {
    fn default_start() -> i64 {
        5
    }

    fn default_end() -> i64 {
        30
    }

    pub fn start(&self) -> i64 {
        self.start.unwrap_or_else(Self::default_start)
    }

    pub fn end(&self) -> i64 {
        self.end.unwrap_or_else(Self::default_end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Patterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

impl Patterns {
    fn default_filename() -> &'static str {
        "model-{{ index }}.html"
    }

    fn default_content() -> &'static str {
        "<h2 align=\"center\">Model Question - {{ index }}</h2>\n"
    }

    pub fn filename(&self) -> String {
        self.filename
            .clone()
            .unwrap_or_else(|| Self::default_filename().to_owned())
    }

    pub fn content(&self) -> String {
        self.content
            .clone()
            .unwrap_or_else(|| Self::default_content().to_owned())
    }
}

/// Fixed text placed before and after every page body.
///
/// `prefix_file`/`suffix_file` take precedence over the inline text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    suffix_file: Option<PathBuf>,
}

impl Template {
    pub fn prefix(&self) -> Result<String> {
        resolve_text(self.prefix.as_deref(), self.prefix_file.as_deref(), "prefix")
    }

    pub fn suffix(&self) -> Result<String> {
        resolve_text(self.suffix.as_deref(), self.suffix_file.as_deref(), "suffix")
    }
}

fn resolve_text(inline: Option<&str>, file: Option<&Path>, what: &str) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read template {what} from {}", path.display())),
        None => Ok(inline.unwrap_or_default().to_owned()),
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    output_directory: Option<PathBuf>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            output_directory: env::var_os(OUTPUT_DIR_ENV)
                .filter(|value| !value.is_empty())
                .map(PathBuf::from),
        }
    }

    #[cfg(test)]
    fn for_tests(output_directory: &str) -> Self {
        Self {
            output_directory: Some(PathBuf::from(output_directory)),
        }
    }
}

/// Values supplied on the command line; they win over every other layer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CliOverrides {
    pub output_directory: Option<PathBuf>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, an optional
    /// explicit file, and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, explicit, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        explicit: Option<&Path>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<Config> = Vec::new();

        layers.push(Self::from_str(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(Self::from_file(&global_path)?);
        }

        if let Some(workspace_path) = workspace.filter(|path| path.exists()) {
            layers.push(Self::from_file(&workspace_path)?);
        }

        if let Some(path) = explicit {
            if !path.is_file() {
                bail!("config file not found: {}", path.display());
            }
            layers.push(Self::from_file(path)?);
        }

        let merged = layers.into_iter().reduce(Config::merge).unwrap_or_default();
        Ok(apply_env_overrides(merged, env_overrides))
    }

    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config = Self::from_str(&data)
            .with_context(|| format!("invalid config file: {}", path.display()))?;
        Ok(match path.parent() {
            Some(base) if !base.as_os_str().is_empty() => config.rebase(base),
            _ => config,
        })
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    /// Resolve relative paths against the directory of the file they came from.
    fn rebase(mut self, base: &Path) -> Self {
        let rebase = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };
        self.output.directory = self.output.directory.map(rebase);
        self.template.prefix_file = self.template.prefix_file.map(rebase);
        self.template.suffix_file = self.template.suffix_file.map(rebase);
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            output: Output {
                directory: other.output.directory.or(self.output.directory),
            },
            range: Range {
                start: other.range.start.or(self.range.start),
                end: other.range.end.or(self.range.end),
            },
            patterns: Patterns {
                filename: other.patterns.filename.or(self.patterns.filename),
                content: other.patterns.content.or(self.patterns.content),
            },
            template: merge_template(self.template, other.template),
        }
    }

    /// Apply command-line values on top of the loaded layers.
    pub fn with_overrides(mut self, overrides: &CliOverrides) -> Self {
        if let Some(dir) = &overrides.output_directory {
            self.output.directory = Some(dir.clone());
        }
        if let Some(start) = overrides.start {
            self.range.start = Some(start);
        }
        if let Some(end) = overrides.end {
            self.range.end = Some(end);
        }
        self
    }

    /// Resolve the layered values into an immutable generator configuration.
    pub fn to_generator_config(&self) -> Result<GeneratorConfig> {
        let Some(output_directory) = self.output.directory.clone() else {
            bail!(
                "no output directory configured; pass --output-dir, set {OUTPUT_DIR_ENV}, \
                 or add `[output] directory` to a config file"
            );
        };
        let range = IndexRange::new(self.range.start(), self.range.end())?;
        let filename_pattern =
            IndexPattern::new(self.patterns.filename()).context("invalid filename pattern")?;
        let content_pattern =
            IndexPattern::new(self.patterns.content()).context("invalid content pattern")?;

        Ok(
            GeneratorConfig::new(output_directory, range, filename_pattern, content_pattern)
                .with_template(self.template.prefix()?, self.template.suffix()?),
        )
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        let resolved = Config {
            output: self.output.clone(),
            range: Range {
                start: Some(self.range.start()),
                end: Some(self.range.end()),
            },
            patterns: Patterns {
                filename: Some(self.patterns.filename()),
                content: Some(self.patterns.content()),
            },
            template: self.template.clone(),
        };
        toml::to_string_pretty(&resolved).context("failed to serialize config")
    }
}

/// A file reference in a later layer replaces inline text from an earlier one and vice versa.
fn merge_template(base: Template, overlay: Template) -> Template {
    let (prefix, prefix_file) = pick_text(
        (base.prefix, base.prefix_file),
        (overlay.prefix, overlay.prefix_file),
    );
    let (suffix, suffix_file) = pick_text(
        (base.suffix, base.suffix_file),
        (overlay.suffix, overlay.suffix_file),
    );
    Template {
        prefix,
        suffix,
        prefix_file,
        suffix_file,
    }
}

fn pick_text(
    base: (Option<String>, Option<PathBuf>),
    overlay: (Option<String>, Option<PathBuf>),
) -> (Option<String>, Option<PathBuf>) {
    if overlay.0.is_none() && overlay.1.is_none() {
        base
    } else {
        overlay
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("pagegen/config.toml"))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_repo_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(DEFAULT_WORKSPACE_CONFIG_PATH)))
}

fn find_repo_root(start: &Path) -> Option<PathBuf> {
    let mut current = start;
    loop {
        if current.join(".git").exists() {
            return Some(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return None,
        }
    }
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(dir) = env.output_directory {
        config.output.directory = Some(dir);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(explicit: Option<&Path>, env: EnvOverrides) -> Result<Config> {
        Config::load_with_layers(None, None, explicit, env)
    }

    #[test]
    fn load_uses_defaults_when_no_files() -> Result<()> {
        let config = load(None, EnvOverrides::default())?;
        assert_eq!(config.range.start(), 5);
        assert_eq!(config.range.end(), 30);
        assert_eq!(config.patterns.filename(), "model-{{ index }}.html");
        assert!(config.output.directory.is_none());
        assert!(config.template.prefix()?.starts_with("<!DOCTYPE html>"));
        assert!(config.template.suffix()?.contains("js/protection.js"));
        Ok(())
    }

    #[test]
    fn embedded_defaults_match_fallbacks() -> Result<()> {
        let config = load(None, EnvOverrides::default())?;
        assert_eq!(config.patterns.content(), Patterns::default_content());
        assert_eq!(config.patterns.filename(), Patterns::default_filename());
        Ok(())
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[range]
start = 1
end = 3
[patterns]
filename = "q{{ index }}.html"
"#,
        )?;

        let workspace_dir = temp.path().join("repo");
        fs::create_dir_all(workspace_dir.join(".pagegen"))?;
        fs::write(
            workspace_dir.join(".pagegen/config.toml"),
            r#"
[range]
end = 9
[template]
prefix = "<main>"
"#,
        )?;

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".pagegen/config.toml")),
            None,
            EnvOverrides::default(),
        )?;

        assert_eq!(config.range.start(), 1);
        assert_eq!(config.range.end(), 9);
        assert_eq!(config.patterns.filename(), "q{{ index }}.html");
        assert_eq!(config.template.prefix()?, "<main>");
        assert!(config.template.suffix()?.contains("</html>"));
        Ok(())
    }

    #[test]
    fn explicit_file_resolves_relative_paths() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::write(temp.path().join("head.html"), "<head/>")?;
        let file = temp.path().join("pages.toml");
        fs::write(
            &file,
            r#"
[output]
directory = "site"
[template]
prefix_file = "head.html"
"#,
        )?;

        let config = load(Some(&file), EnvOverrides::default())?;
        assert_eq!(config.output.directory, Some(temp.path().join("site")));
        assert_eq!(config.template.prefix()?, "<head/>");
        Ok(())
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = load(Some(Path::new("/nonexistent/pagegen.toml")), EnvOverrides::default());
        assert!(result.is_err());
    }

    #[test]
    fn env_and_cli_overrides_take_precedence() -> Result<()> {
        let config = load(None, EnvOverrides::for_tests("from-env"))?;
        assert_eq!(config.output.directory, Some(PathBuf::from("from-env")));

        let config = config.with_overrides(&CliOverrides {
            output_directory: Some(PathBuf::from("from-cli")),
            start: Some(2),
            end: None,
        });
        assert_eq!(config.output.directory, Some(PathBuf::from("from-cli")));
        assert_eq!(config.range.start(), 2);
        assert_eq!(config.range.end(), 30);
        Ok(())
    }

    #[test]
    fn generator_config_requires_output_directory() -> Result<()> {
        let config = load(None, EnvOverrides::default())?;
        let err = config.to_generator_config().unwrap_err();
        assert!(err.to_string().contains("no output directory configured"));
        Ok(())
    }

    #[test]
    fn generator_config_rejects_reversed_range() -> Result<()> {
        let config = load(None, EnvOverrides::for_tests("out"))?.with_overrides(&CliOverrides {
            start: Some(10),
            end: Some(1),
            ..CliOverrides::default()
        });
        assert!(config.to_generator_config().is_err());
        Ok(())
    }

    #[test]
    fn generator_config_carries_resolved_values() -> Result<()> {
        let config = load(None, EnvOverrides::for_tests("out"))?;
        let generator = config.to_generator_config()?;
        assert_eq!(generator.output_directory(), Path::new("out"));
        assert_eq!(generator.range(), IndexRange::new(5, 30)?);
        assert!(generator.template_suffix().contains('©'));
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = Config::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn to_toml_round_trips_through_loader() -> Result<()> {
        let config = load(None, EnvOverrides::for_tests("out"))?;
        let rendered = config.to_toml()?;
        let reparsed = Config::from_str(&rendered)?;
        assert_eq!(reparsed.range.end(), 30);
        assert_eq!(reparsed.output.directory, Some(PathBuf::from("out")));
        Ok(())
    }
}
