//! Implementation of `slipway info`.

use anyhow::Result;

use slipway::ops::pipeline::resolve_metadata;
use slipway::package::PackageInfo;

use crate::cli::VersionArgs;

pub fn execute(args: VersionArgs) -> Result<()> {
    let metadata = resolve_metadata(&args.source)?;
    let info = PackageInfo::header_only(&metadata);
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}
