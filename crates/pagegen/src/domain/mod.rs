//! Plain data types and the error taxonomy shared by the generator.

pub mod errors;
pub mod model;
