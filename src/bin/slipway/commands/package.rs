//! Implementation of `slipway package`.

use anyhow::Result;

use slipway::ops::pipeline;

use crate::cli::PipelineArgs;

pub fn execute(args: PipelineArgs) -> Result<()> {
    let opts = args.to_options();
    let outcome = pipeline::run(&opts)?;

    println!(
        "packaged {} {} ({} files) into {}",
        outcome.metadata.name,
        outcome.metadata.version,
        outcome.package_files.len(),
        outcome.layout.package_folder.display()
    );
    Ok(())
}
