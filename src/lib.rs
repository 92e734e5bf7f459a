//! Slipway - a recipe build orchestrator for header-only C/C++ libraries
//!
//! This crate provides the core library functionality for slipway:
//! resolving recipe metadata from a build descriptor, driving an external
//! CMake configure step through a safe swap/restore cycle, and assembling
//! a flattened package output tree.

pub mod builder;
pub mod core;
pub mod ops;
pub mod package;
pub mod util;

pub use crate::core::{
    layout::{BuildKind, PackageLayout},
    recipe::{RecipeManifest, RecipeMetadata, RecipeVersion},
    settings::{BuildEnvironmentSettings, BuildType},
};

pub use builder::BuildOrchestrator;
pub use package::{ArtifactSet, PackageInfo, Packager};
