//! Application layer orchestrating domain logic and infrastructure.

pub mod generate;
pub mod pattern;
