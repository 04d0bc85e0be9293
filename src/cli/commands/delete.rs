//! cli::commands::delete
//!
//! Delete metadata from Metax.

use anyhow::Result;

use super::to_pretty_json;
use crate::cli::args::ResourceKind;
use crate::client::MetaxApi;

/// Delete a resource. File deletion prints the response from Metax.
pub async fn delete(metax: &dyn MetaxApi, resource: ResourceKind, identifier: &str) -> Result<()> {
    match resource {
        ResourceKind::File => {
            let response = metax.delete_file(identifier).await?;
            if !response.is_null() {
                println!("{}", to_pretty_json(&response)?);
            }
        }
        ResourceKind::Dataset => metax.delete_dataset(identifier).await?,
        ResourceKind::Contract => metax.delete_contract(identifier).await?,
    }
    println!("Deleted {} {}", resource, identifier);
    Ok(())
}
