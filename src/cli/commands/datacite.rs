//! cli::commands::datacite
//!
//! Print the DataCite XML of a dataset.

use anyhow::Result;

use crate::client::MetaxApi;

pub async fn datacite(metax: &dyn MetaxApi, dataset: &str, dummy_doi: bool) -> Result<()> {
    let xml = metax.get_datacite(dataset, dummy_doi).await?;
    println!("{}", xml.trim_end());
    Ok(())
}
