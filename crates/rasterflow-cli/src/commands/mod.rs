//! CLI command implementations.

pub mod kernel;
pub mod operators;
pub mod process;
