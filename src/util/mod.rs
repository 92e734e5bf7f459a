//! Shared utilities

pub mod diagnostic;
pub mod fs;
pub mod process;
