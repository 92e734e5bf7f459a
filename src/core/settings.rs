//! Build environment settings supplied by the caller.
//!
//! These are read-only inputs to toolchain generation and orchestration;
//! nothing in the pipeline mutates them.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum BuildType {
    #[value(name = "Debug")]
    Debug,
    #[default]
    #[value(name = "Release")]
    Release,
    #[value(name = "RelWithDebInfo")]
    RelWithDebInfo,
    #[value(name = "MinSizeRel")]
    MinSizeRel,
}

impl BuildType {
    /// The CMake spelling of this build type.
    pub fn as_cmake(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_cmake())
    }
}

/// Externally supplied build environment: build type, compiler, target
/// architecture and operating system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildEnvironmentSettings {
    pub build_type: BuildType,

    /// C++ compiler the configure step should use. `None` lets the build
    /// system pick its own default.
    pub compiler: Option<String>,

    /// Target architecture identifier (e.g. `x86_64`, `aarch64`).
    pub arch: String,

    /// Target operating system identifier (e.g. `linux`, `macos`).
    pub os: String,
}

impl BuildEnvironmentSettings {
    /// Settings describing the host machine with the default build type.
    pub fn host() -> Self {
        BuildEnvironmentSettings {
            build_type: BuildType::default(),
            compiler: None,
            arch: std::env::consts::ARCH.to_string(),
            os: std::env::consts::OS.to_string(),
        }
    }

    /// Replace the build type.
    pub fn with_build_type(mut self, build_type: BuildType) -> Self {
        self.build_type = build_type;
        self
    }

    /// Replace the compiler.
    pub fn with_compiler(mut self, compiler: impl Into<String>) -> Self {
        self.compiler = Some(compiler.into());
        self
    }
}
