//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use slipway::core::layout::{default_cache_root, BuildKind};
use slipway::core::settings::{BuildEnvironmentSettings, BuildType};
use slipway::ops::PipelineOptions;

/// Slipway - a recipe build orchestrator for header-only C/C++ libraries
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the recipe version resolved from the build descriptor
    Version(VersionArgs),

    /// Generate toolchain files and run the configure cycle
    Configure(PipelineArgs),

    /// Run the full pipeline and assemble the package folder
    Package(PipelineArgs),

    /// Print the package's consumable metadata as JSON
    Info(VersionArgs),
}

#[derive(Args)]
pub struct VersionArgs {
    /// Recipe source directory
    #[arg(long, default_value = ".")]
    pub source: PathBuf,
}

#[derive(Args)]
pub struct PipelineArgs {
    /// Recipe source directory
    #[arg(long, default_value = ".")]
    pub source: PathBuf,

    /// Build directory (defaults to <source>/build)
    #[arg(long)]
    pub build_dir: Option<PathBuf>,

    /// Package output directory (defaults to <source>/package)
    #[arg(long)]
    pub package_dir: Option<PathBuf>,

    /// CMake build type
    #[arg(long, value_enum, ignore_case = true, default_value_t = BuildType::Release)]
    pub build_type: BuildType,

    /// C++ compiler for the configure step
    #[arg(long)]
    pub compiler: Option<String>,

    /// Target architecture identifier
    #[arg(long)]
    pub arch: Option<String>,

    /// Treat this as a package-manager cache build
    #[arg(long, conflicts_with = "development")]
    pub cache: bool,

    /// Treat this as a local development build
    #[arg(long)]
    pub development: bool,

    /// cmake executable to use instead of the one on PATH
    #[arg(long, env = "SLIPWAY_CMAKE")]
    pub cmake: Option<PathBuf>,
}

impl PipelineArgs {
    /// Lower the CLI arguments into pipeline options.
    pub fn to_options(&self) -> PipelineOptions {
        let mut settings = BuildEnvironmentSettings::host().with_build_type(self.build_type);
        if let Some(ref compiler) = self.compiler {
            settings = settings.with_compiler(compiler.clone());
        }
        if let Some(ref arch) = self.arch {
            settings.arch = arch.clone();
        }

        let build_kind = if self.cache {
            Some(BuildKind::Cache)
        } else if self.development {
            Some(BuildKind::Development)
        } else {
            None
        };

        // Cache builds without an explicit build dir land in the shared
        // per-user cache root.
        let build_root = match (self.build_dir.clone(), self.cache) {
            (Some(dir), _) => dir,
            (None, true) => default_cache_root()
                .map(|root| root.join("b"))
                .unwrap_or_else(|| self.source.join("build")),
            (None, false) => self.source.join("build"),
        };

        PipelineOptions {
            source_root: self.source.clone(),
            build_root,
            package_root: self
                .package_dir
                .clone()
                .unwrap_or_else(|| self.source.join("package")),
            build_kind,
            settings,
            cmake: self.cmake.clone(),
        }
    }
}
