//! Implementation of the recipe pipeline.
//!
//! Strictly sequential: metadata resolution, layout selection, toolchain
//! generation, the configure cycle, packaging, and finally the package-info
//! declaration. Each phase consumes the immutable outputs of the previous
//! ones.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::{BuildOrchestrator, ToolchainGenerator};
use crate::core::layout::{BuildKind, PackageLayout};
use crate::core::recipe::{RecipeManifest, RecipeMetadata};
use crate::core::settings::BuildEnvironmentSettings;
use crate::package::{ArtifactSet, PackageInfo, Packager};
use crate::util::fs::read_to_string;

/// Options for a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Source tree root; must contain `Recipe.toml` and `CMakeLists.txt`.
    pub source_root: PathBuf,

    /// Build root. Cache builds nest further folders under it.
    pub build_root: PathBuf,

    /// Package output root.
    pub package_root: PathBuf,

    /// Explicit build kind. `None` falls back to path detection.
    pub build_kind: Option<BuildKind>,

    pub settings: BuildEnvironmentSettings,

    /// Override the cmake executable (tests, hermetic environments).
    pub cmake: Option<PathBuf>,
}

/// Everything a completed pipeline run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    pub metadata: RecipeMetadata,
    pub layout: PackageLayout,
    pub generated_header: PathBuf,
    pub package_files: Vec<PathBuf>,
    pub info: PackageInfo,
}

/// Load the manifest and resolve the recipe metadata from the descriptor.
pub fn resolve_metadata(source_root: &Path) -> Result<RecipeMetadata> {
    let manifest = RecipeManifest::load(source_root)?;
    let descriptor_text = read_to_string(&source_root.join(crate::core::layout::DESCRIPTOR_NAME))
        .context("recipe source tree has no build descriptor")?;
    let metadata = RecipeMetadata::resolve(&manifest, &descriptor_text);
    tracing::info!("resolved {} {}", metadata.name, metadata.version);
    Ok(metadata)
}

fn select_layout(opts: &PipelineOptions) -> PackageLayout {
    let kind = opts
        .build_kind
        .unwrap_or_else(|| BuildKind::detect(&opts.build_root));
    tracing::debug!("layout: {:?}", kind);
    PackageLayout::select(
        kind,
        &opts.source_root,
        &opts.build_root,
        &opts.package_root,
        &opts.settings,
    )
}

/// Run the pipeline through the configure cycle: toolchain files plus the
/// generated header, no packaging.
pub fn configure(opts: &PipelineOptions) -> Result<(RecipeMetadata, PackageLayout, PathBuf)> {
    let metadata = resolve_metadata(&opts.source_root)?;
    let layout = select_layout(opts);

    ToolchainGenerator::new(&metadata, &opts.settings, &layout).generate()?;

    let header = match opts.cmake {
        Some(ref cmake) => {
            BuildOrchestrator::with_cmake(&metadata, &opts.settings, &layout, cmake.clone()).run()?
        }
        None => BuildOrchestrator::new(&metadata, &opts.settings, &layout)?.run()?,
    };

    Ok((metadata, layout, header))
}

/// Run the full pipeline: configure, package, and declare the package info.
pub fn run(opts: &PipelineOptions) -> Result<PipelineOutcome> {
    let (metadata, layout, generated_header) = configure(opts)?;

    let artifacts = ArtifactSet::for_recipe(&metadata, &layout);
    let package_files = Packager::new(&layout).run(&artifacts)?;

    let info = PackageInfo::header_only(&metadata);

    Ok(PipelineOutcome {
        metadata,
        layout,
        generated_header,
        package_files,
        info,
    })
}
