//! Package assembly: declared artifacts copied flat into the package folder.

pub mod info;

pub use info::PackageInfo;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::layout::PackageLayout;
use crate::core::recipe::RecipeMetadata;
use crate::util::diagnostic::ArtifactCopy;
use crate::util::fs::ensure_dir;

/// One declared artifact: a name for diagnostics, a resolved source path,
/// and its flattened destination in the package folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub name: String,
    pub source: PathBuf,
    pub dest: PathBuf,
}

/// The ordered, exhaustive list of artifacts a package run may copy.
///
/// Nothing outside this set is ever copied, however similarly named the
/// neighbors in the source folder are.
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        ArtifactSet::default()
    }

    /// Declare one artifact. `source` is resolved by the caller; `dest_dir`
    /// receives the file under its final name only.
    pub fn declare(&mut self, name: impl Into<String>, source: PathBuf, dest_dir: &Path) {
        let name = name.into();
        let file_name = source.file_name().map(PathBuf::from).unwrap_or_default();
        self.artifacts.push(Artifact {
            name,
            dest: dest_dir.join(file_name),
            source,
        });
    }

    /// The declared set for a recipe: its exports out of the source folder
    /// plus the generated configuration header out of the build folder.
    pub fn for_recipe(metadata: &RecipeMetadata, layout: &PackageLayout) -> ArtifactSet {
        let mut set = ArtifactSet::new();
        for export in &metadata.exports {
            set.declare(
                export.clone(),
                layout.source_folder.join(export),
                &layout.package_folder,
            );
        }
        set.declare(
            "generated configuration header",
            layout.generated_header(),
            &layout.package_folder,
        );
        set
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Copies a declared [`ArtifactSet`] into the package folder.
pub struct Packager<'a> {
    layout: &'a PackageLayout,
}

impl<'a> Packager<'a> {
    pub fn new(layout: &'a PackageLayout) -> Self {
        Packager { layout }
    }

    /// Copy every declared artifact, in declaration order.
    ///
    /// A missing source is fatal and surfaced immediately; a partially
    /// written package folder is never reported as success.
    pub fn run(&self, artifacts: &ArtifactSet) -> Result<Vec<PathBuf>> {
        let mut copied = Vec::with_capacity(artifacts.len());

        ensure_dir(&self.layout.package_folder)?;

        for artifact in artifacts.iter() {
            if !artifact.source.exists() {
                return Err(ArtifactCopy {
                    artifact: artifact.name.clone(),
                    source_path: artifact.source.clone(),
                }
                .into());
            }
            std::fs::copy(&artifact.source, &artifact.dest).with_context(|| {
                format!(
                    "failed to copy {} to {}",
                    artifact.source.display(),
                    artifact.dest.display()
                )
            })?;
            tracing::debug!(
                "packaged {} -> {}",
                artifact.source.display(),
                artifact.dest.display()
            );
            copied.push(artifact.dest.clone());
        }

        tracing::info!(
            "packaged {} artifacts into {}",
            copied.len(),
            self.layout.package_folder.display()
        );
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::BuildKind;
    use crate::core::recipe::RecipeManifest;
    use crate::core::settings::BuildEnvironmentSettings;
    use std::fs;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, RecipeMetadata, PackageLayout) {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Foo.hpp"), "#pragma once").unwrap();
        fs::write(tmp.path().join("LICENSE"), "MIT").unwrap();
        fs::write(tmp.path().join("README.md"), "# Foo").unwrap();

        let manifest = RecipeManifest::parse(
            "name = \"foo\"\nexports = [\"Foo.hpp\", \"LICENSE\", \"README.md\"]\n",
        )
        .unwrap();
        let metadata = RecipeMetadata::resolve(&manifest, "project(Foo VERSION 1.0.0)");

        let settings = BuildEnvironmentSettings::host();
        let layout = PackageLayout::select(
            BuildKind::Development,
            tmp.path(),
            &tmp.path().join("build"),
            &tmp.path().join("pkg"),
            &settings,
        );

        let header = layout.generated_header();
        fs::create_dir_all(header.parent().unwrap()).unwrap();
        fs::write(&header, "#define FOO_VERSION \"1.0.0\"").unwrap();

        (tmp, metadata, layout)
    }

    #[test]
    fn test_packages_exactly_the_declared_set() {
        let (tmp, metadata, layout) = fixture();

        // An undeclared header sitting right next to the declared one.
        fs::write(tmp.path().join("Stray.hpp"), "#pragma once").unwrap();

        let set = ArtifactSet::for_recipe(&metadata, &layout);
        assert_eq!(set.len(), 4);

        let copied = Packager::new(&layout).run(&set).unwrap();
        assert_eq!(copied.len(), 4);

        let pkg = &layout.package_folder;
        assert!(pkg.join("Foo.hpp").exists());
        assert!(pkg.join("LICENSE").exists());
        assert!(pkg.join("README.md").exists());
        assert!(pkg.join("config.h").exists());
        assert!(!pkg.join("Stray.hpp").exists());
    }

    #[test]
    fn test_flattening_discards_directories() {
        let (tmp, _, layout) = fixture();
        let nested = tmp.path().join("docs");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("NOTICE"), "notice").unwrap();

        let mut set = ArtifactSet::new();
        set.declare("NOTICE", nested.join("NOTICE"), &layout.package_folder);

        Packager::new(&layout).run(&set).unwrap();
        assert!(layout.package_folder.join("NOTICE").exists());
        assert!(!layout.package_folder.join("docs").exists());
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let (_tmp, mut metadata, layout) = fixture();
        metadata.exports.push("CHANGELOG.md".to_string());

        let set = ArtifactSet::for_recipe(&metadata, &layout);
        let err = Packager::new(&layout).run(&set).unwrap_err();

        let copy = err.downcast_ref::<ArtifactCopy>().unwrap();
        assert_eq!(copy.artifact, "CHANGELOG.md");
    }

    #[test]
    fn test_declaration_order_is_kept() {
        let (_tmp, metadata, layout) = fixture();
        let set = ArtifactSet::for_recipe(&metadata, &layout);

        let names: Vec<_> = set.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "Foo.hpp",
                "LICENSE",
                "README.md",
                "generated configuration header"
            ]
        );
    }
}
