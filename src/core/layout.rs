//! Folder layout selection for development and cache builds.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::settings::BuildEnvironmentSettings;

/// Path segment that marks a build running inside the shared artifact cache.
pub const CACHE_MARKER: &str = "slipway-cache";

/// File name of the build-configuration descriptor.
pub const DESCRIPTOR_NAME: &str = "CMakeLists.txt";

/// Where the configure step materializes the configuration header,
/// relative to the build folder.
pub const GENERATED_HEADER_REL: &str = "configured_files/include/config.h";

/// Whether this invocation is a local development build or a
/// package-manager-cache build.
///
/// Callers should say which explicitly; [`BuildKind::detect`] exists for
/// those that only know the build folder path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildKind {
    Development,
    Cache,
}

impl BuildKind {
    /// Infer the build kind from the build folder path: cache iff the path
    /// contains [`CACHE_MARKER`].
    pub fn detect(build_root: &Path) -> BuildKind {
        if build_root.to_string_lossy().contains(CACHE_MARKER) {
            BuildKind::Cache
        } else {
            BuildKind::Development
        }
    }
}

/// The per-user cache root for cache-layout builds.
pub fn default_cache_root() -> Option<PathBuf> {
    ProjectDirs::from("", "", "slipway").map(|dirs| dirs.cache_dir().join(CACHE_MARKER))
}

/// The three filesystem roots a recipe run works with.
///
/// `source_folder` must hold the original descriptor before orchestration
/// begins and holds a byte-identical copy after it ends, success or failure.
#[derive(Debug, Clone)]
pub struct PackageLayout {
    pub source_folder: PathBuf,
    pub build_folder: PathBuf,
    pub package_folder: PathBuf,
}

impl PackageLayout {
    /// Compute the layout for the given build kind.
    ///
    /// Cache builds follow the nested convention `build/<BuildType>` under
    /// the build root; development builds use the build root as-is.
    pub fn select(
        kind: BuildKind,
        source_root: &Path,
        build_root: &Path,
        package_root: &Path,
        settings: &BuildEnvironmentSettings,
    ) -> PackageLayout {
        let build_folder = match kind {
            BuildKind::Cache => build_root
                .join("build")
                .join(settings.build_type.as_cmake()),
            BuildKind::Development => build_root.to_path_buf(),
        };

        PackageLayout {
            source_folder: source_root.to_path_buf(),
            build_folder,
            package_folder: package_root.to_path_buf(),
        }
    }

    /// Path of the build-configuration descriptor.
    pub fn descriptor(&self) -> PathBuf {
        self.source_folder.join(DESCRIPTOR_NAME)
    }

    /// Deterministic path of the generated configuration header.
    pub fn generated_header(&self) -> PathBuf {
        self.build_folder.join(GENERATED_HEADER_REL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::BuildType;

    fn settings() -> BuildEnvironmentSettings {
        BuildEnvironmentSettings::host().with_build_type(BuildType::Release)
    }

    #[test]
    fn test_detect_cache_marker() {
        assert_eq!(
            BuildKind::detect(Path::new("/home/u/.cache/slipway/slipway-cache/ab12/b")),
            BuildKind::Cache
        );
        assert_eq!(
            BuildKind::detect(Path::new("/home/u/work/mylib/build")),
            BuildKind::Development
        );
    }

    #[test]
    fn test_cache_layout_nests_build_type() {
        let layout = PackageLayout::select(
            BuildKind::Cache,
            Path::new("/src"),
            Path::new("/cache/b"),
            Path::new("/cache/p"),
            &settings(),
        );
        assert_eq!(layout.build_folder, Path::new("/cache/b/build/Release"));
    }

    #[test]
    fn test_development_layout_is_flat() {
        let layout = PackageLayout::select(
            BuildKind::Development,
            Path::new("/src"),
            Path::new("/src/build"),
            Path::new("/src/pkg"),
            &settings(),
        );
        assert_eq!(layout.build_folder, Path::new("/src/build"));
    }

    #[test]
    fn test_generated_header_path() {
        let layout = PackageLayout::select(
            BuildKind::Development,
            Path::new("/src"),
            Path::new("/b"),
            Path::new("/p"),
            &settings(),
        );
        assert_eq!(
            layout.generated_header(),
            Path::new("/b/configured_files/include/config.h")
        );
        assert_eq!(layout.descriptor(), Path::new("/src/CMakeLists.txt"));
    }
}
