//! CLI command implementations.

pub mod orders;
pub mod sync;
