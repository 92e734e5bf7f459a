//! Implementation of `slipway version`.

use anyhow::Result;

use slipway::ops::pipeline::resolve_metadata;

use crate::cli::VersionArgs;

pub fn execute(args: VersionArgs) -> Result<()> {
    let metadata = resolve_metadata(&args.source)?;
    println!("{} {}", metadata.name, metadata.version);
    Ok(())
}
