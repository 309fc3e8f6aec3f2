pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

pub use app::generate::{GeneratorConfig, PageGenerator, generate};
pub use app::pattern::IndexPattern;
pub use domain::errors::{GenerateError, PatternError};
pub use domain::model::{GenerationPlan, GenerationReport, IndexRange};

pub fn init(verbosity: u8) {
    infra::logging::init(verbosity);
}
