//! Infrastructure adapters for config, filesystem writes, and logging.

pub mod config;
pub mod fs;
pub mod logging;
