//! Implementation of `slipway configure`.

use anyhow::Result;

use slipway::ops::pipeline;

use crate::cli::PipelineArgs;

pub fn execute(args: PipelineArgs) -> Result<()> {
    let opts = args.to_options();
    let (metadata, _layout, header) = pipeline::configure(&opts)?;

    println!(
        "configured {} {}: {}",
        metadata.name,
        metadata.version,
        header.display()
    );
    Ok(())
}
