//! Recipe.toml manifest parsing and resolved recipe metadata.
//!
//! The manifest declares what the recipe packages; `RecipeMetadata` is the
//! resolved, immutable value threaded read-only through every later phase.
//! Nothing downstream re-derives or mutates it.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::version::resolve_version;
use crate::util::fs::read_to_string;

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Recipe.toml";

/// What kind of artifact the package exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackageType {
    #[default]
    HeaderLibrary,
}

/// Raw `Recipe.toml` schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecipeManifest {
    /// Package name.
    pub name: String,

    /// Declared version. Usually the `X.X.X` placeholder; the real triple
    /// is resolved from the build descriptor.
    #[serde(default = "default_version_placeholder")]
    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub homepage: String,

    #[serde(default)]
    pub license: String,

    #[serde(default)]
    pub topics: BTreeSet<String>,

    /// Files to export into the package, relative to the source folder.
    /// This list is exhaustive: nothing outside it is ever copied.
    #[serde(default)]
    pub exports: Vec<String>,

    #[serde(default, rename = "package-type")]
    pub package_type: PackageType,

    /// Test/tool dependencies the external build system should be able to
    /// locate during configure.
    #[serde(default, rename = "tool-requires")]
    pub tool_requires: Vec<String>,
}

fn default_version_placeholder() -> String {
    "X.X.X".to_string()
}

impl RecipeManifest {
    /// Load and parse a manifest from `<dir>/Recipe.toml`.
    pub fn load(dir: &Path) -> Result<RecipeManifest> {
        let path = dir.join(MANIFEST_NAME);
        let text = read_to_string(&path)?;
        Self::parse(&text).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Parse manifest text.
    pub fn parse(text: &str) -> Result<RecipeManifest> {
        let manifest: RecipeManifest = toml::from_str(text)?;
        Ok(manifest)
    }
}

/// A recipe version: either resolved from the descriptor or the manifest's
/// placeholder, retained on purpose when no `VERSION` line matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecipeVersion {
    Resolved(Version),
    Placeholder(String),
}

impl RecipeVersion {
    /// The resolved semver triple, if any.
    pub fn as_resolved(&self) -> Option<&Version> {
        match self {
            RecipeVersion::Resolved(v) => Some(v),
            RecipeVersion::Placeholder(_) => None,
        }
    }
}

impl fmt::Display for RecipeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecipeVersion::Resolved(v) => write!(f, "{}", v),
            RecipeVersion::Placeholder(s) => f.write_str(s),
        }
    }
}

/// Resolved recipe metadata. Constructed once per invocation, immutable
/// thereafter.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeMetadata {
    pub name: String,
    pub version: RecipeVersion,
    pub description: String,
    pub url: String,
    pub homepage: String,
    pub license: String,
    pub topics: BTreeSet<String>,
    pub exports: Vec<String>,
    pub package_type: PackageType,
    pub tool_requires: Vec<String>,
}

impl RecipeMetadata {
    /// Resolve metadata from a manifest plus the descriptor text.
    ///
    /// When the descriptor carries no `VERSION x.y.z` line the manifest's
    /// placeholder is kept as-is. That fallback is deliberate: a recipe for
    /// an unversioned snapshot still packages, it just reports the
    /// placeholder.
    pub fn resolve(manifest: &RecipeManifest, descriptor_text: &str) -> RecipeMetadata {
        let version = match resolve_version(descriptor_text) {
            Some(v) => RecipeVersion::Resolved(v),
            None => {
                tracing::debug!(
                    "no VERSION line in descriptor, keeping placeholder `{}`",
                    manifest.version
                );
                RecipeVersion::Placeholder(manifest.version.clone())
            }
        };

        RecipeMetadata {
            name: manifest.name.clone(),
            version,
            description: manifest.description.clone(),
            url: manifest.url.clone(),
            homepage: manifest.homepage.clone(),
            license: manifest.license.clone(),
            topics: manifest.topics.clone(),
            exports: manifest.exports.clone(),
            package_type: manifest.package_type,
            tool_requires: manifest.tool_requires.clone(),
        }
    }
}
