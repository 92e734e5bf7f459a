//! Build orchestration: swap, configure, restore.
//!
//! The orchestrator synthesizes a minimal build descriptor that references
//! only the configuration-generation subdirectory, swaps it in place of the
//! project's real `CMakeLists.txt`, runs the external build system's
//! configure phase (never its build phase), and restores the original
//! descriptor on every exit path. Restoration failures outrank configure
//! failures.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::builder::swap::{DescriptorSwap, SourceTreeLock};
use crate::builder::toolchain::TOOLCHAIN_FILE;
use crate::core::layout::PackageLayout;
use crate::core::recipe::RecipeMetadata;
use crate::core::settings::BuildEnvironmentSettings;
use crate::util::diagnostic::{ConfigureFailed, RestoreFailure};
use crate::util::fs::{digest_file, ensure_dir};
use crate::util::process::{find_cmake, ProcessBuilder};

/// Name of the configuration-generation subdirectory the minimal
/// descriptor points the build system at.
pub const CONFIG_SUBDIR: &str = "config";

/// Drives the swap/configure/restore cycle for one recipe run.
pub struct BuildOrchestrator<'a> {
    metadata: &'a RecipeMetadata,
    settings: &'a BuildEnvironmentSettings,
    layout: &'a PackageLayout,
    cmake: PathBuf,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create an orchestrator, locating cmake on PATH.
    pub fn new(
        metadata: &'a RecipeMetadata,
        settings: &'a BuildEnvironmentSettings,
        layout: &'a PackageLayout,
    ) -> Result<Self> {
        let Some(cmake) = find_cmake() else {
            bail!(
                "CMake not found\n\
                 \n\
                 CMake is required to generate the configuration header.\n\
                 Install CMake and ensure it's in your PATH."
            );
        };

        Ok(BuildOrchestrator {
            metadata,
            settings,
            layout,
            cmake,
        })
    }

    /// Use a specific cmake executable instead of the one on PATH.
    pub fn with_cmake(
        metadata: &'a RecipeMetadata,
        settings: &'a BuildEnvironmentSettings,
        layout: &'a PackageLayout,
        cmake: PathBuf,
    ) -> Self {
        BuildOrchestrator {
            metadata,
            settings,
            layout,
            cmake,
        }
    }

    /// The synthesized minimal descriptor.
    ///
    /// References only [`CONFIG_SUBDIR`]; pointing configure at the full
    /// build graph would drag unrelated targets into the cache build.
    pub fn minimal_descriptor(&self) -> String {
        let project = match self.metadata.version.as_resolved() {
            Some(v) => format!(
                "project({} VERSION {} LANGUAGES CXX)",
                self.metadata.name, v
            ),
            None => format!("project({} LANGUAGES CXX)", self.metadata.name),
        };
        format!(
            "cmake_minimum_required(VERSION 3.15)\n{}\nadd_subdirectory({})\n",
            project, CONFIG_SUBDIR
        )
    }

    /// Run the full cycle and return the generated header path.
    ///
    /// The source tree's descriptor is byte-identical before and after this
    /// call, whatever the configure step does.
    pub fn run(&self) -> Result<PathBuf> {
        ensure_dir(&self.layout.build_folder)?;

        let _lock = SourceTreeLock::acquire(&self.layout.source_folder)?;

        let descriptor = self.layout.descriptor();
        let before = digest_file(&descriptor)
            .with_context(|| format!("cannot read descriptor {}", descriptor.display()))?;

        let swap = DescriptorSwap::engage(&self.layout.source_folder, &self.minimal_descriptor())?;
        let configure_result = self.configure();
        // Restoration runs before any configure failure is surfaced, and
        // its own failure takes precedence.
        swap.restore()?;

        let after = digest_file(&descriptor)?;
        if after != before {
            return Err(RestoreFailure {
                expected: format!("descriptor digest {}", before),
                found: format!("descriptor digest {}", after),
            }
            .into());
        }

        configure_result?;

        let header = self.layout.generated_header();
        if !header.exists() {
            bail!(
                "configure succeeded but produced no header at {}",
                header.display()
            );
        }
        Ok(header)
    }

    /// Invoke the configure phase only. Blocking; no internal timeout.
    fn configure(&self) -> Result<()> {
        let cmd = ProcessBuilder::new(&self.cmake)
            .arg("-S")
            .arg(&self.layout.source_folder)
            .arg("-B")
            .arg(&self.layout.build_folder)
            .arg(format!(
                "-DCMAKE_BUILD_TYPE={}",
                self.settings.build_type.as_cmake()
            ))
            .arg(format!(
                "-DCMAKE_TOOLCHAIN_FILE={}",
                self.layout.build_folder.join(TOOLCHAIN_FILE).display()
            ))
            .arg("-DENABLE_TESTING=OFF")
            .arg("-DCODE_COVERAGE=OFF");

        tracing::info!("configuring: {}", cmd.display_command());
        let output = cmd.exec()?;

        if !output.status.success() {
            return Err(ConfigureFailed {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::layout::{BuildKind, DESCRIPTOR_NAME};
    use crate::core::recipe::RecipeManifest;
    use std::fs;
    use tempfile::TempDir;

    const DESCRIPTOR: &str = "cmake_minimum_required(VERSION 3.15)\n\
                              project(Foo VERSION 3.4.5 LANGUAGES CXX)\n\
                              add_subdirectory(src)\n\
                              add_subdirectory(config)\n";

    fn fixture() -> (TempDir, RecipeMetadata, BuildEnvironmentSettings) {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(DESCRIPTOR_NAME), DESCRIPTOR).unwrap();
        let manifest = RecipeManifest::parse("name = \"foo\"\n").unwrap();
        let metadata = RecipeMetadata::resolve(&manifest, DESCRIPTOR);
        (tmp, metadata, BuildEnvironmentSettings::host())
    }

    fn layout(tmp: &TempDir, settings: &BuildEnvironmentSettings) -> PackageLayout {
        PackageLayout::select(
            BuildKind::Development,
            tmp.path(),
            &tmp.path().join("build"),
            &tmp.path().join("pkg"),
            settings,
        )
    }

    /// A stand-in cmake: materializes the header on success, or exits 1.
    #[cfg(unix)]
    fn stub_cmake(dir: &std::path::Path, succeed: bool) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let script = dir.join("cmake-stub");
        let body = if succeed {
            "#!/bin/sh\n\
             build=\"\"\n\
             prev=\"\"\n\
             for a in \"$@\"; do\n\
               [ \"$prev\" = \"-B\" ] && build=\"$a\"\n\
               prev=\"$a\"\n\
             done\n\
             mkdir -p \"$build/configured_files/include\"\n\
             echo '#define FOO_VERSION \"3.4.5\"' > \"$build/configured_files/include/config.h\"\n"
        } else {
            "#!/bin/sh\necho 'CMake Error: broken' >&2\nexit 1\n"
        };
        fs::write(&script, body).unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[test]
    fn test_minimal_descriptor_targets_config_only() {
        let (_tmp, metadata, settings) = fixture();
        let tmp = TempDir::new().unwrap();
        let layout = layout(&tmp, &settings);
        let orch = BuildOrchestrator::with_cmake(
            &metadata,
            &settings,
            &layout,
            PathBuf::from("cmake"),
        );

        let minimal = orch.minimal_descriptor();
        assert!(minimal.contains("project(foo VERSION 3.4.5 LANGUAGES CXX)"));
        assert!(minimal.contains("add_subdirectory(config)"));
        assert!(!minimal.contains("add_subdirectory(src)"));
    }

    #[test]
    fn test_minimal_descriptor_placeholder_omits_version() {
        let manifest = RecipeManifest::parse("name = \"foo\"\n").unwrap();
        let metadata = RecipeMetadata::resolve(&manifest, "add_library(foo INTERFACE)");
        let settings = BuildEnvironmentSettings::host();
        let tmp = TempDir::new().unwrap();
        let layout = layout(&tmp, &settings);
        let orch = BuildOrchestrator::with_cmake(
            &metadata,
            &settings,
            &layout,
            PathBuf::from("cmake"),
        );

        assert!(orch
            .minimal_descriptor()
            .contains("project(foo LANGUAGES CXX)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_produces_header_and_restores_descriptor() {
        let (tmp, metadata, settings) = fixture();
        let layout = layout(&tmp, &settings);
        let cmake = stub_cmake(tmp.path(), true);

        let orch = BuildOrchestrator::with_cmake(&metadata, &settings, &layout, cmake);
        let header = orch.run().unwrap();

        assert!(header.exists());
        assert_eq!(
            fs::read_to_string(tmp.path().join(DESCRIPTOR_NAME)).unwrap(),
            DESCRIPTOR
        );
        assert!(!tmp.path().join(crate::builder::swap::BACKUP_NAME).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_configure_restores_and_reports() {
        let (tmp, metadata, settings) = fixture();
        let layout = layout(&tmp, &settings);
        let cmake = stub_cmake(tmp.path(), false);

        let orch = BuildOrchestrator::with_cmake(&metadata, &settings, &layout, cmake);
        let err = orch.run().unwrap_err();

        let configure = err.downcast_ref::<ConfigureFailed>().unwrap();
        assert!(configure.stderr.contains("CMake Error"));

        // Restored despite the failure.
        assert_eq!(
            fs::read_to_string(tmp.path().join(DESCRIPTOR_NAME)).unwrap(),
            DESCRIPTOR
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_missing_header_after_success_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let (tmp, metadata, settings) = fixture();
        let layout = layout(&tmp, &settings);

        // Succeeds but writes nothing.
        let script = tmp.path().join("cmake-noop");
        fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

        let orch = BuildOrchestrator::with_cmake(&metadata, &settings, &layout, script);
        let err = orch.run().unwrap_err();
        assert!(err.to_string().contains("produced no header"));
    }
}
