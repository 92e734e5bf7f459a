//! Toolchain and dependency descriptor generation.
//!
//! Emits the two CMake include files the external configure step consumes.
//! Generation only writes files; it never invokes the build system.

use std::path::PathBuf;

use anyhow::Result;

use crate::core::layout::PackageLayout;
use crate::core::recipe::RecipeMetadata;
use crate::core::settings::BuildEnvironmentSettings;
use crate::util::fs::write_string;

/// File name of the toolchain descriptor.
pub const TOOLCHAIN_FILE: &str = "slipway_toolchain.cmake";

/// File name of the dependency-resolution descriptor.
pub const DEPS_FILE: &str = "slipway_deps.cmake";

/// Paths of the generated descriptor files.
#[derive(Debug, Clone)]
pub struct ToolchainFiles {
    pub toolchain: PathBuf,
    pub deps: PathBuf,
}

/// Generates toolchain and dependency descriptors into the build folder.
pub struct ToolchainGenerator<'a> {
    metadata: &'a RecipeMetadata,
    settings: &'a BuildEnvironmentSettings,
    layout: &'a PackageLayout,
}

impl<'a> ToolchainGenerator<'a> {
    pub fn new(
        metadata: &'a RecipeMetadata,
        settings: &'a BuildEnvironmentSettings,
        layout: &'a PackageLayout,
    ) -> Self {
        ToolchainGenerator {
            metadata,
            settings,
            layout,
        }
    }

    /// Write both descriptor files, returning their paths.
    pub fn generate(&self) -> Result<ToolchainFiles> {
        let toolchain = self.layout.build_folder.join(TOOLCHAIN_FILE);
        let deps = self.layout.build_folder.join(DEPS_FILE);

        write_string(&toolchain, &self.toolchain_contents())?;
        write_string(&deps, &self.deps_contents())?;

        tracing::info!("wrote toolchain descriptors to {}", self.layout.build_folder.display());
        Ok(ToolchainFiles { toolchain, deps })
    }

    fn toolchain_contents(&self) -> String {
        let mut out = String::new();
        out.push_str("# Generated by slipway. Do not edit.\n");
        out.push_str(&format!(
            "set(CMAKE_BUILD_TYPE \"{}\" CACHE STRING \"\" FORCE)\n",
            self.settings.build_type.as_cmake()
        ));
        if let Some(ref compiler) = self.settings.compiler {
            out.push_str(&format!(
                "set(CMAKE_CXX_COMPILER \"{}\" CACHE FILEPATH \"\" FORCE)\n",
                compiler
            ));
        }
        out.push_str(&format!(
            "set(CMAKE_SYSTEM_NAME \"{}\")\n",
            cmake_system_name(&self.settings.os)
        ));
        out.push_str(&format!(
            "set(CMAKE_SYSTEM_PROCESSOR \"{}\")\n",
            self.settings.arch
        ));
        out.push_str(&format!(
            "include(\"${{CMAKE_CURRENT_LIST_DIR}}/{}\")\n",
            DEPS_FILE
        ));
        out
    }

    fn deps_contents(&self) -> String {
        let mut out = String::new();
        out.push_str("# Generated by slipway. Do not edit.\n");
        if self.metadata.tool_requires.is_empty() {
            out.push_str("# No tool requirements declared.\n");
            return out;
        }
        out.push_str(&format!(
            "list(PREPEND CMAKE_PREFIX_PATH \"{}\")\n",
            self.layout.build_folder.join("deps").display()
        ));
        for dep in &self.metadata.tool_requires {
            out.push_str(&format!("# tool-requires: {}\n", dep));
            out.push_str(&format!("find_package({} QUIET)\n", dep));
        }
        out
    }
}

/// CMake's spelling of an operating-system identifier.
fn cmake_system_name(os: &str) -> &str {
    match os {
        "linux" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows",
        "freebsd" => "FreeBSD",
        other => other,
    }
}
