//! cli::commands::get
//!
//! Print normalized metadata.
//!
//! # Example
//!
//! ```bash
//! # Print a dataset
//! metax_access get dataset urn:nbn:fi:att:1234
//!
//! # Save a file's metadata
//! metax_access get file 5f1c... --output file.json
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde_json::Value;

use super::to_pretty_json;
use crate::cli::args::ResourceKind;
use crate::client::MetaxApi;

/// Fetch a resource and print it, or write it to `output`.
pub async fn get(
    metax: &dyn MetaxApi,
    resource: ResourceKind,
    identifier: &str,
    output: Option<&Path>,
) -> Result<()> {
    let value: Value = match resource {
        ResourceKind::Dataset => serde_json::to_value(metax.get_dataset(identifier).await?)?,
        ResourceKind::File => serde_json::to_value(metax.get_file(identifier).await?)?,
        ResourceKind::Contract => serde_json::to_value(metax.get_contract(identifier).await?)?,
    };
    let rendered = to_pretty_json(&value)?;

    match output {
        Some(path) => {
            fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("failed to write '{}'", path.display()))?;
            tracing::info!(path = %path.display(), "wrote {} {}", resource, identifier);
        }
        None => println!("{}", rendered),
    }
    Ok(())
}
