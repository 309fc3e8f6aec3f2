//! Index patterns: tiny templates turning a page index into a string.

use std::fmt;

use minijinja::{Environment, UndefinedBehavior, context};

use crate::domain::errors::PatternError;

/// A compiled `index -> String` function backed by a template source such as
/// `model-{{ index }}.html`.
///
/// Rendering is pure: the only input is the index, so the same index always
/// yields the same string.
#[derive(Clone)]
pub struct IndexPattern {
    env: Environment<'static>,
    source: String,
}

impl IndexPattern {
    /// Compile `source`, failing on template syntax errors.
    pub fn new(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();
        let env = pattern_environment();
        env.template_from_str(&source)
            .map_err(|err| PatternError::Syntax {
                source_text: source.clone(),
                message: err.to_string(),
            })?;
        Ok(Self { env, source })
    }

    /// Render the pattern for `index`.
    pub fn render(&self, index: i64) -> Result<String, PatternError> {
        self.env
            .render_str(&self.source, context! { index })
            .map_err(|err| PatternError::Render {
                index,
                message: err.to_string(),
            })
    }

    /// The template text this pattern was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for IndexPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IndexPattern").field(&self.source).finish()
    }
}

impl PartialEq for IndexPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for IndexPattern {}

fn pattern_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}
