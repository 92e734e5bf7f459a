//! Core data structures for slipway.
//!
//! This module contains the foundational types used throughout slipway:
//! - Recipe manifests and resolved metadata
//! - Version resolution from the build descriptor
//! - Build environment settings
//! - Folder layout selection

pub mod layout;
pub mod recipe;
pub mod settings;
pub mod version;

pub use layout::{BuildKind, PackageLayout};
pub use recipe::{RecipeManifest, RecipeMetadata, RecipeVersion};
pub use settings::{BuildEnvironmentSettings, BuildType};
