//! cli::commands::post
//!
//! Post new metadata to Metax.

use std::path::Path;

use anyhow::{Context as _, Result};
use serde_json::Value;

use super::{read_json, to_pretty_json};
use crate::cli::args::ResourceKind;
use crate::client::MetaxApi;

/// Post the metadata in `filepath` and print the response.
///
/// A JSON list posts several files in one request.
pub async fn post(metax: &dyn MetaxApi, resource: ResourceKind, filepath: &Path) -> Result<()> {
    let data = read_json(filepath)?;

    let response = match (resource, &data) {
        (ResourceKind::File, Value::Array(files)) => metax.post_files(files).await,
        (ResourceKind::File, file) => metax.post_file(file).await,
        (ResourceKind::Dataset, dataset) => metax.post_dataset(dataset).await,
        (ResourceKind::Contract, contract) => metax.post_contract(contract).await,
    }
    .with_context(|| format!("failed to post {}", resource))?;

    println!("{}", to_pretty_json(&response)?);
    Ok(())
}
