//! Command implementations.

pub mod configure;
pub mod info;
pub mod package;
pub mod version;
