//! CLI command implementations.

pub mod classify;
pub mod columns;
pub mod screen;
