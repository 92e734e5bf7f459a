//! Consumable package metadata for downstream consumers.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::recipe::RecipeMetadata;

/// The package's consumable shape, as declared to downstream consumers.
///
/// Pure metadata; building one touches no filesystem.
#[derive(Debug, Clone, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
    pub license: String,
    pub url: String,
    pub topics: BTreeSet<String>,
    /// Include directories, relative to the package root.
    pub includedirs: Vec<String>,
    /// Always empty: a header-only package ships no binaries.
    pub bindirs: Vec<String>,
    /// Always empty: a header-only package ships no libraries.
    pub libdirs: Vec<String>,
}

impl PackageInfo {
    /// Declare a header-only package: a single include directory at the
    /// package root, no binary or library directories.
    pub fn header_only(metadata: &RecipeMetadata) -> PackageInfo {
        PackageInfo {
            name: metadata.name.clone(),
            version: metadata.version.to_string(),
            license: metadata.license.clone(),
            url: metadata.url.clone(),
            topics: metadata.topics.clone(),
            includedirs: vec![".".to_string()],
            bindirs: Vec::new(),
            libdirs: Vec::new(),
        }
    }
}
