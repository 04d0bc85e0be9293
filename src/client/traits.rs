//! client::traits
//!
//! The `MetaxApi` trait: every operation the preservation services perform
//! against Metax.
//!
//! # Design
//!
//! The trait is async because every operation involves network I/O. Inputs
//! and outputs use the V3 layout regardless of the server version; backends
//! convert on the way in and out.
//!
//! Operations that only exist on one API version have a default body that
//! returns [`MetaxError::NotSupported`]. A backend overrides the ones it can
//! serve.
//!
//! # Example
//!
//! ```ignore
//! use metax_access::client::{MetaxApi, DatasetQuery};
//! use metax_access::state::PreservationState;
//!
//! async fn confirm(metax: &dyn MetaxApi, id: &str) -> Result<(), MetaxError> {
//!     let dataset = metax.get_dataset(id).await?;
//!     if dataset.contract().is_some() {
//!         metax
//!             .set_preservation_state(id, PreservationState::MetadataConfirmed, "Confirmed")
//!             .await?;
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use super::factory::ApiVersion;
use crate::error::MetaxError;
use crate::model::{
    Contract, Dataset, DirectoryFiles, File, FileFormatVersion, FileRef, Paginated,
};
use crate::state::PreservationState;

/// Default page size for dataset and contract listings.
pub const DEFAULT_LIMIT: u64 = 1_000_000;

/// Filters for [`MetaxApi::get_datasets`].
#[derive(Debug, Clone)]
pub struct DatasetQuery {
    /// Only datasets in one of these states. `None` means no filter on V3
    /// and every known state on V2.
    pub states: Option<Vec<PreservationState>>,
    /// Max number of datasets to return
    pub limit: u64,
    /// Offset for paging
    pub offset: u64,
    /// Free text search over title, curator and contract title
    pub search: Option<String>,
    /// Owning organization
    pub metadata_owner_org: Option<String>,
    /// Owning user
    pub metadata_owner_user: Option<String>,
    /// Field to sort by, e.g. `preservation_state`
    pub ordering: Option<String>,
}

impl Default for DatasetQuery {
    fn default() -> Self {
        Self {
            states: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
            search: None,
            metadata_owner_org: None,
            metadata_owner_user: None,
            ordering: None,
        }
    }
}

fn not_supported<T>(version: ApiVersion, operation: &str) -> Result<T, MetaxError> {
    Err(MetaxError::NotSupported(format!(
        "{} is not available in Metax {}",
        operation, version
    )))
}

/// Access to a Metax server.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// All methods return `Result<T, MetaxError>`. Callers should handle:
/// - `NotAvailable`: the dataset, file, contract, etc. does not exist
/// - `AlreadyExists`: posted files were already in Metax
/// - `Http`: Metax rejected the request, body included
/// - `Network`: check connectivity
#[async_trait]
pub trait MetaxApi: Send + Sync {
    /// API version this client talks.
    fn api_version(&self) -> ApiVersion;

    // ------------------------------------------------------------------
    // Datasets
    // ------------------------------------------------------------------

    /// List datasets matching the query.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(Dataset)` if Metax answers 404
    async fn get_datasets(&self, query: &DatasetQuery) -> Result<Paginated<Dataset>, MetaxError>;

    /// List datasets with raw query parameters.
    async fn query_datasets(
        &self,
        params: &[(String, String)],
    ) -> Result<Paginated<Dataset>, MetaxError>;

    /// Fetch the datasets with the given identifiers.
    ///
    /// `fields` restricts the returned fields; empty means all.
    async fn get_datasets_by_ids(
        &self,
        ids: &[String],
        limit: u64,
        offset: u64,
        fields: &[String],
    ) -> Result<Paginated<Dataset>, MetaxError>;

    /// Fetch a single normalized dataset.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(Dataset)` if the dataset does not exist
    async fn get_dataset(&self, id: &str) -> Result<Dataset, MetaxError>;

    /// Fetch a dataset exactly as the server returns it.
    async fn get_dataset_raw(&self, id: &str) -> Result<Value, MetaxError>;

    async fn post_dataset(&self, metadata: &Value) -> Result<Value, MetaxError>;

    /// Patch a dataset with a partial V3 document.
    async fn patch_dataset(&self, id: &str, data: &Value) -> Result<Value, MetaxError>;

    async fn delete_dataset(&self, id: &str) -> Result<(), MetaxError>;

    /// All datasets preserved under a contract.
    async fn get_contract_datasets(&self, contract_id: &str) -> Result<Vec<Dataset>, MetaxError>;

    /// Minimal dataset template for PAS datasets.
    async fn get_dataset_template(&self) -> Result<Value, MetaxError> {
        not_supported(self.api_version(), "get_dataset_template")
    }

    /// Fetch a data catalog, unnormalized.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(DataCatalog)` if the catalog does not exist
    async fn get_datacatalog(&self, id: &str) -> Result<Value, MetaxError>;

    /// DataCite XML for a dataset.
    ///
    /// `dummy_doi` asks Metax to use a placeholder DOI if the dataset has
    /// none yet.
    ///
    /// # Errors
    ///
    /// - `DataciteGeneration` if Metax cannot produce valid DataCite
    /// - `NotAvailable(Dataset)` if the dataset does not exist
    async fn get_datacite(&self, id: &str, dummy_doi: bool) -> Result<String, MetaxError>;

    // ------------------------------------------------------------------
    // Preservation
    // ------------------------------------------------------------------

    async fn set_preservation_state(
        &self,
        id: &str,
        state: PreservationState,
        description: &str,
    ) -> Result<(), MetaxError>;

    async fn set_preservation_reason(&self, id: &str, reason: &str) -> Result<(), MetaxError>;

    /// Attach the dataset to a contract.
    async fn set_contract(&self, id: &str, contract_id: &str) -> Result<(), MetaxError>;

    /// Record that a submission information package has been built.
    async fn set_pas_package_created(&self, id: &str) -> Result<(), MetaxError> {
        let _ = id;
        not_supported(self.api_version(), "set_pas_package_created")
    }

    /// Mark the dataset and every file in it as being processed, so that
    /// users cannot modify them.
    async fn lock_dataset(&self, id: &str) -> Result<(), MetaxError> {
        let _ = id;
        not_supported(self.api_version(), "lock_dataset")
    }

    /// Reverse of [`MetaxApi::lock_dataset`].
    async fn unlock_dataset(&self, id: &str) -> Result<(), MetaxError> {
        let _ = id;
        not_supported(self.api_version(), "unlock_dataset")
    }

    /// Create the preservation copy of a dataset in the PAS catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidData` if the dataset has no contract
    async fn copy_dataset_to_pas_catalog(&self, id: &str) -> Result<(), MetaxError> {
        let _ = id;
        not_supported(self.api_version(), "copy_dataset_to_pas_catalog")
    }

    // ------------------------------------------------------------------
    // Contracts
    // ------------------------------------------------------------------

    /// List contracts, optionally of one organization.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(Contract)` if Metax answers 404
    async fn get_contracts(
        &self,
        limit: u64,
        offset: u64,
        org_filter: Option<&str>,
    ) -> Result<Paginated<Contract>, MetaxError>;

    /// # Errors
    ///
    /// - `NotAvailable(Contract)` if the contract does not exist
    async fn get_contract(&self, id: &str) -> Result<Contract, MetaxError>;

    async fn post_contract(&self, metadata: &Value) -> Result<Value, MetaxError>;

    async fn patch_contract(&self, id: &str, data: &Value) -> Result<Value, MetaxError>;

    async fn delete_contract(&self, id: &str) -> Result<(), MetaxError>;

    // ------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------

    /// # Errors
    ///
    /// - `NotAvailable(File)` if the file does not exist
    async fn get_file(&self, id: &str) -> Result<File, MetaxError>;

    /// Every file of a project.
    async fn get_files(&self, project: &str) -> Result<Vec<File>, MetaxError>;

    /// Every file of a project, keyed by path.
    async fn get_files_dict(&self, project: &str) -> Result<BTreeMap<String, FileRef>, MetaxError> {
        let files = self.get_files(project).await?;
        Ok(files
            .into_iter()
            .filter_map(|file| {
                let pathname = file.pathname?;
                Some((
                    pathname,
                    FileRef {
                        identifier: file.id,
                        storage_service: file.storage_service,
                    },
                ))
            })
            .collect())
    }

    /// File of a project at an exact path. Leading and trailing slashes are
    /// ignored when comparing.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(File)` if no file has that path
    async fn get_project_file(&self, project: &str, path: &str) -> Result<File, MetaxError>;

    /// Post a single file.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if the file is already in Metax
    async fn post_file(&self, metadata: &Value) -> Result<Value, MetaxError>;

    /// Post several files at once.
    ///
    /// # Errors
    ///
    /// - `AlreadyExists` if every failure was caused by a file that is
    ///   already in Metax
    /// - `Http` for any other rejection
    async fn post_files(&self, metadata: &[Value]) -> Result<Value, MetaxError>;

    async fn patch_file(&self, id: &str, data: &Value) -> Result<Value, MetaxError>;

    /// Update `characteristics` and `characteristics_extension` of a file.
    ///
    /// `data` holds either or both members.
    async fn patch_file_characteristics(&self, id: &str, data: &Value) -> Result<(), MetaxError>;

    async fn delete_file(&self, id: &str) -> Result<Value, MetaxError>;

    async fn delete_files(&self, ids: &[String]) -> Result<Value, MetaxError>;

    /// Datasets that contain the file.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(File)` if the file does not exist
    async fn get_file_datasets(&self, file_id: &str) -> Result<Value, MetaxError>;

    /// Map each file to the datasets that contain it. Files in no dataset
    /// are left out.
    async fn get_file2dataset_dict(
        &self,
        file_ids: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>, MetaxError>;

    /// The file format reference list.
    async fn get_file_format_versions(&self) -> Result<Vec<FileFormatVersion>, MetaxError> {
        not_supported(self.api_version(), "get_file_format_versions")
    }

    // ------------------------------------------------------------------
    // Dataset files and directories
    // ------------------------------------------------------------------

    /// Every file of a dataset, with its dataset-specific metadata.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(Dataset)` if the dataset does not exist
    async fn get_dataset_files(&self, dataset_id: &str) -> Result<Vec<File>, MetaxError>;

    /// One file of a dataset.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(File)` if the file is not in the dataset
    async fn get_dataset_file(&self, dataset_id: &str, file_id: &str) -> Result<File, MetaxError> {
        let _ = (dataset_id, file_id);
        not_supported(self.api_version(), "get_dataset_file")
    }

    /// Number of files in a dataset, including those in directories.
    async fn get_dataset_file_count(&self, dataset_id: &str) -> Result<u64, MetaxError>;

    /// Content of a directory within a dataset. A directory that does not
    /// exist lists as empty.
    async fn get_dataset_directory(
        &self,
        dataset_id: &str,
        path: &str,
    ) -> Result<DirectoryFiles, MetaxError> {
        let _ = (dataset_id, path);
        not_supported(self.api_version(), "get_dataset_directory")
    }

    /// Content of a project directory, optionally restricted to one dataset.
    ///
    /// # Errors
    ///
    /// - `NotAvailable(Directory)` if the directory does not exist
    async fn get_project_directory(
        &self,
        project: &str,
        path: &str,
        dataset_id: Option<&str>,
    ) -> Result<DirectoryFiles, MetaxError>;

    /// Identifier of a project directory.
    async fn get_directory_id(&self, project: &str, path: &str) -> Result<String, MetaxError> {
        let _ = (project, path);
        not_supported(self.api_version(), "get_directory_id")
    }
}
