//! cli::commands::patch
//!
//! Apply a partial update.

use std::path::Path;

use anyhow::{Context as _, Result};

use super::{read_json, to_pretty_json};
use crate::cli::args::ResourceKind;
use crate::client::MetaxApi;

/// Patch a resource with the partial document in `filepath`.
pub async fn patch(
    metax: &dyn MetaxApi,
    resource: ResourceKind,
    identifier: &str,
    filepath: &Path,
) -> Result<()> {
    let data = read_json(filepath)?;
    let response = match resource {
        ResourceKind::Dataset => metax.patch_dataset(identifier, &data).await,
        ResourceKind::File => metax.patch_file(identifier, &data).await,
        ResourceKind::Contract => metax.patch_contract(identifier, &data).await,
    }
    .with_context(|| format!("failed to patch {} {}", resource, identifier))?;

    println!("{}", to_pretty_json(&response)?);
    Ok(())
}
