//! client::v3
//!
//! Metax V3 backend.
//!
//! # Design
//!
//! V3 already speaks the normalized layout, so responses are deserialized
//! straight into the model types. Every read asks for `include_nulls=true`
//! so that unset fields arrive as explicit `null` instead of being dropped,
//! which keeps the normalized records complete.
//!
//! Convenience operations such as [`MetaxApi::lock_dataset`] compose
//! several requests and are not atomic: a failure midway leaves the earlier
//! changes in place.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::factory::ApiVersion;
use super::http::{HttpTransport, Request, Response};
use super::only_already_exists;
use super::traits::{DatasetQuery, MetaxApi};
use crate::error::{MetaxError, Resource};
use crate::model::{Contract, Dataset, DirectoryFiles, File, FileFormatVersion, Paginated};
use crate::state::PreservationState;

/// Page size used when walking every page of a file listing.
const FILE_PAGE_SIZE: u64 = 10_000;

/// Client for the Metax V3 API.
#[derive(Debug)]
pub struct V3Client {
    transport: HttpTransport,
    /// `{url}/v3`
    base_url: String,
}

impl V3Client {
    /// Create a client for the Metax instance at `url`.
    ///
    /// # Errors
    ///
    /// - `MissingCredentials` if neither a user nor a token is given
    pub fn new(
        url: &str,
        user: Option<String>,
        password: Option<String>,
        token: Option<String>,
        verify: bool,
    ) -> Result<Self, MetaxError> {
        Ok(Self {
            transport: HttpTransport::new(user, password, token, verify)?,
            base_url: format!("{}/v3", url.trim_end_matches('/')),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn dataset_request(&self, id: &str) -> Request {
        Request::get(self.url(&format!("/datasets/{}", id))).query("include_nulls", true)
    }

    /// Send a request whose 404 means that `missing` does not exist.
    async fn fetch(&self, request: Request, missing: Resource) -> Result<Response, MetaxError> {
        let response = self.transport.send(request.allow(404)).await?;
        if response.is(404) {
            return Err(MetaxError::NotAvailable(missing));
        }
        Ok(response)
    }

    async fn patch_preservation(&self, id: &str, data: Value) -> Result<(), MetaxError> {
        let request = Request::patch(self.url(&format!("/datasets/{}/preservation", id))).json(data);
        self.fetch(request, Resource::Dataset).await?;
        Ok(())
    }

    async fn set_pas_process_running(&self, id: &str, running: bool) -> Result<(), MetaxError> {
        self.patch_preservation(id, json!({"pas_process_running": running}))
            .await?;

        let files = self.get_dataset_files(id).await?;
        if files.is_empty() {
            tracing::debug!(dataset = id, "no files to update");
            return Ok(());
        }
        let patches: Vec<Value> = files
            .iter()
            .map(|file| json!({"id": file.id, "pas_process_running": running}))
            .collect();
        let request = Request::post(self.url("/files/patch-many"))
            .query("include_nulls", true)
            .json(Value::Array(patches));
        self.transport.send(request).await?;
        tracing::info!(dataset = id, files = files.len(), running, "updated pas_process_running");
        Ok(())
    }

    async fn post_files_request(
        &self,
        path: &str,
        body: Value,
        duplicate_message: &str,
    ) -> Result<Value, MetaxError> {
        let request = Request::post(self.url(path))
            .query("include_nulls", true)
            .json(body)
            .allow(400);
        let response = self.transport.send(request).await?;
        if response.is(400) {
            let errors = response.value().unwrap_or(Value::Null);
            if only_already_exists(&errors) {
                return Err(MetaxError::AlreadyExists {
                    message: duplicate_message.to_string(),
                    response: errors,
                });
            }
            tracing::error!(
                "HTTP request to {} failed. Response from server was: {}",
                response.url,
                response.body
            );
            return Err(response.into_error());
        }
        response.value()
    }

    /// Walk every page of a directory listing and merge them.
    async fn directory_pages(&self, request: Request) -> Result<Option<DirectoryFiles>, MetaxError> {
        let Some(pages) = self.transport.collect_pages(request.allow(404)).await? else {
            return Ok(None);
        };
        let mut listing = DirectoryFiles::empty();
        for page in pages {
            listing.merge(serde_json::from_value(page)?);
        }
        Ok(Some(listing))
    }
}

fn typed<T: serde::de::DeserializeOwned>(values: Vec<Value>) -> Result<Vec<T>, MetaxError> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(MetaxError::from))
        .collect()
}

#[async_trait]
impl MetaxApi for V3Client {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V3
    }

    async fn get_datasets(&self, query: &DatasetQuery) -> Result<Paginated<Dataset>, MetaxError> {
        let request = Request::get(self.url("/datasets"))
            .query("limit", query.limit)
            .query("offset", query.offset)
            .query("include_nulls", true)
            .query_opt(
                "preservation__state",
                query.states.as_deref().map(PreservationState::join_codes),
            )
            .query_opt("metadata_owner__organization", query.metadata_owner_org.as_deref())
            .query_opt("metadata_owner__user", query.metadata_owner_user.as_deref())
            .query_opt("ordering", query.ordering.as_deref())
            .query_opt("search", query.search.as_deref());
        self.fetch(request, Resource::Dataset).await?.json()
    }

    async fn query_datasets(
        &self,
        params: &[(String, String)],
    ) -> Result<Paginated<Dataset>, MetaxError> {
        let request = params
            .iter()
            .fold(Request::get(self.url("/datasets")), |request, (key, value)| {
                request.query(key.as_str(), value)
            });
        self.transport.send_json(request).await
    }

    async fn get_datasets_by_ids(
        &self,
        ids: &[String],
        limit: u64,
        offset: u64,
        fields: &[String],
    ) -> Result<Paginated<Dataset>, MetaxError> {
        let mut request = Request::get(self.url("/datasets"))
            .query("limit", limit)
            .query("offset", offset)
            .query("include_nulls", true);
        for id in ids {
            request = request.query("id", id);
        }
        if !fields.is_empty() {
            request = request.query("fields", fields.join(","));
        }
        self.transport.send_json(request).await
    }

    async fn get_dataset(&self, id: &str) -> Result<Dataset, MetaxError> {
        self.fetch(self.dataset_request(id), Resource::Dataset)
            .await?
            .json()
    }

    async fn get_dataset_raw(&self, id: &str) -> Result<Value, MetaxError> {
        self.fetch(self.dataset_request(id), Resource::Dataset)
            .await?
            .value()
    }

    async fn post_dataset(&self, metadata: &Value) -> Result<Value, MetaxError> {
        let request = Request::post(self.url("/datasets")).json(metadata.clone());
        self.transport.send(request).await?.value()
    }

    async fn patch_dataset(&self, id: &str, data: &Value) -> Result<Value, MetaxError> {
        let request = Request::patch(self.url(&format!("/datasets/{}", id))).json(data.clone());
        self.transport.send(request).await?.value()
    }

    async fn delete_dataset(&self, id: &str) -> Result<(), MetaxError> {
        self.transport
            .send(Request::delete(self.url(&format!("/datasets/{}", id))))
            .await?;
        Ok(())
    }

    async fn get_contract_datasets(&self, contract_id: &str) -> Result<Vec<Dataset>, MetaxError> {
        let request = Request::get(self.url("/datasets"))
            .query("preservation__contract", contract_id)
            .query("include_nulls", true);
        let datasets = self.transport.collect_list(request).await?.unwrap_or_default();
        typed(datasets)
    }

    async fn get_datacatalog(&self, id: &str) -> Result<Value, MetaxError> {
        let request = Request::get(self.url(&format!("/data-catalogs/{}", id)));
        self.fetch(request, Resource::DataCatalog).await?.value()
    }

    async fn get_datacite(&self, id: &str, dummy_doi: bool) -> Result<String, MetaxError> {
        let mut request = Request::get(self.url(&format!("/datasets/{}/metadata-download", id)))
            .query("format", "datacite")
            .allow(400);
        if dummy_doi {
            request = request.query("dummy_doi", true);
        }
        let response = self.fetch(request, Resource::Dataset).await?;
        if response.is(400) {
            let body = response.value().unwrap_or(Value::Null);
            let detail = match &body["detail"] {
                Value::String(detail) => detail.clone(),
                Value::Null => response.body.clone(),
                other => other.to_string(),
            };
            return Err(MetaxError::DataciteGeneration(detail));
        }
        Ok(response.body)
    }

    async fn set_preservation_state(
        &self,
        id: &str,
        state: PreservationState,
        description: &str,
    ) -> Result<(), MetaxError> {
        self.patch_preservation(
            id,
            json!({"state": state.code(), "description": {"en": description}}),
        )
        .await
    }

    async fn set_preservation_reason(&self, id: &str, reason: &str) -> Result<(), MetaxError> {
        self.patch_preservation(id, json!({"reason_description": reason}))
            .await
    }

    async fn set_contract(&self, id: &str, contract_id: &str) -> Result<(), MetaxError> {
        self.patch_preservation(id, json!({"contract": contract_id}))
            .await
    }

    async fn set_pas_package_created(&self, id: &str) -> Result<(), MetaxError> {
        self.patch_preservation(id, json!({"pas_package_created": true}))
            .await
    }

    async fn lock_dataset(&self, id: &str) -> Result<(), MetaxError> {
        self.set_pas_process_running(id, true).await
    }

    async fn unlock_dataset(&self, id: &str) -> Result<(), MetaxError> {
        self.set_pas_process_running(id, false).await
    }

    async fn copy_dataset_to_pas_catalog(&self, id: &str) -> Result<(), MetaxError> {
        let dataset = self.get_dataset(id).await?;
        if dataset.contract().is_none() {
            return Err(MetaxError::InvalidData("Dataset has no contract set.".to_string()));
        }
        let request = Request::post(self.url(&format!("/datasets/{}/create-preservation-version", id)));
        self.fetch(request, Resource::Dataset).await?;
        tracing::info!(dataset = id, "created preservation version");
        Ok(())
    }

    async fn get_contracts(
        &self,
        limit: u64,
        offset: u64,
        org_filter: Option<&str>,
    ) -> Result<Paginated<Contract>, MetaxError> {
        let request = Request::get(self.url("/contracts"))
            .query("limit", limit)
            .query("offset", offset)
            .query("include_nulls", true)
            .query_opt("organization__organization_identifier", org_filter);
        self.fetch(request, Resource::Contract).await?.json()
    }

    async fn get_contract(&self, id: &str) -> Result<Contract, MetaxError> {
        let request = Request::get(self.url(&format!("/contracts/{}", id))).query("include_nulls", true);
        self.fetch(request, Resource::Contract).await?.json()
    }

    async fn post_contract(&self, metadata: &Value) -> Result<Value, MetaxError> {
        let request = Request::post(self.url("/contracts")).json(metadata.clone());
        self.transport.send(request).await?.value()
    }

    async fn patch_contract(&self, id: &str, data: &Value) -> Result<Value, MetaxError> {
        let request = Request::patch(self.url(&format!("/contracts/{}", id))).json(data.clone());
        self.transport.send(request).await?.value()
    }

    async fn delete_contract(&self, id: &str) -> Result<(), MetaxError> {
        self.transport
            .send(Request::delete(self.url(&format!("/contracts/{}", id))))
            .await?;
        Ok(())
    }

    async fn get_file(&self, id: &str) -> Result<File, MetaxError> {
        let request = Request::get(self.url(&format!("/files/{}", id))).query("include_nulls", true);
        self.fetch(request, Resource::File).await?.json()
    }

    async fn get_files(&self, project: &str) -> Result<Vec<File>, MetaxError> {
        let request = Request::get(self.url("/files"))
            .query("include_nulls", true)
            .query("limit", FILE_PAGE_SIZE)
            .query("csc_project", project);
        let files = self.transport.collect_list(request).await?.unwrap_or_default();
        typed(files)
    }

    async fn get_project_file(&self, project: &str, path: &str) -> Result<File, MetaxError> {
        let request = Request::get(self.url("/files"))
            .query("include_nulls", true)
            .query("csc_project", project)
            .query("pathname", path);
        let page: Paginated<File> = self.transport.send_json(request).await?;
        let wanted = path.trim_matches('/');
        page.results
            .into_iter()
            .find(|file| {
                file.pathname
                    .as_deref()
                    .is_some_and(|p| p.trim_matches('/') == wanted)
            })
            .ok_or(MetaxError::NotAvailable(Resource::File))
    }

    async fn post_file(&self, metadata: &Value) -> Result<Value, MetaxError> {
        self.post_files_request("/files", metadata.clone(), "File already exists.")
            .await
    }

    async fn post_files(&self, metadata: &[Value]) -> Result<Value, MetaxError> {
        self.post_files_request(
            "/files/post-many",
            Value::Array(metadata.to_vec()),
            "Some of the files already exist.",
        )
        .await
    }

    async fn patch_file(&self, id: &str, data: &Value) -> Result<Value, MetaxError> {
        let request = Request::patch(self.url(&format!("/files/{}", id))).json(data.clone());
        self.transport.send(request).await?.value()
    }

    async fn patch_file_characteristics(&self, id: &str, data: &Value) -> Result<(), MetaxError> {
        if let Some(characteristics) = data.get("characteristics") {
            let url = self.url(&format!("/files/{}/characteristics", id));
            let response = self
                .transport
                .send(Request::patch(url.clone()).json(characteristics.clone()).allow(404))
                .await?;
            if response.is(404) {
                // No characteristics yet: create them
                self.transport
                    .send(Request::put(url).json(characteristics.clone()))
                    .await?;
            }
        }
        if let Some(extension) = data.get("characteristics_extension") {
            let request = Request::patch(self.url(&format!("/files/{}", id)))
                .json(json!({"characteristics_extension": extension}));
            self.transport.send(request).await?;
        }
        Ok(())
    }

    async fn delete_file(&self, id: &str) -> Result<Value, MetaxError> {
        self.transport
            .send(Request::delete(self.url(&format!("/files/{}", id))))
            .await?
            .value()
    }

    async fn delete_files(&self, ids: &[String]) -> Result<Value, MetaxError> {
        let body: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
        let request = Request::post(self.url("/files/delete-many")).json(Value::Array(body));
        self.transport.send(request).await?.value()
    }

    async fn get_file_datasets(&self, file_id: &str) -> Result<Value, MetaxError> {
        let request = Request::post(self.url("/files/datasets"))
            .query("relations", false)
            .json(json!([file_id]));
        self.fetch(request, Resource::File).await?.value()
    }

    async fn get_file2dataset_dict(
        &self,
        file_ids: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>, MetaxError> {
        if file_ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let request = Request::post(self.url("/files/datasets"))
            .query("relations", true)
            .json(json!(file_ids));
        match self.transport.send(request).await?.value()? {
            // Metax answers an empty list when no file is in any dataset
            Value::Array(_) | Value::Null => Ok(BTreeMap::new()),
            relations => Ok(serde_json::from_value(relations)?),
        }
    }

    async fn get_file_format_versions(&self) -> Result<Vec<FileFormatVersion>, MetaxError> {
        let request = Request::get(self.url("/reference-data/file-format-versions"))
            .query("pagination", false);
        let versions = match self.transport.send(request).await?.value()? {
            Value::Array(versions) => versions,
            mut page => match page.get_mut("results").map(Value::take) {
                Some(Value::Array(versions)) => versions,
                _ => Vec::new(),
            },
        };
        typed(versions)
    }

    async fn get_dataset_files(&self, dataset_id: &str) -> Result<Vec<File>, MetaxError> {
        let request = Request::get(self.url(&format!("/datasets/{}/files", dataset_id)))
            .query("include_nulls", true)
            .query("limit", FILE_PAGE_SIZE)
            .allow(404);
        match self.transport.collect_list(request).await? {
            Some(files) => typed(files),
            None => Err(MetaxError::NotAvailable(Resource::Dataset)),
        }
    }

    async fn get_dataset_file(&self, dataset_id: &str, file_id: &str) -> Result<File, MetaxError> {
        let request = Request::get(self.url(&format!("/datasets/{}/files/{}", dataset_id, file_id)))
            .query("include_nulls", true);
        self.fetch(request, Resource::File).await?.json()
    }

    async fn get_dataset_file_count(&self, dataset_id: &str) -> Result<u64, MetaxError> {
        Ok(self.get_dataset(dataset_id).await?.fileset.total_files_count)
    }

    async fn get_dataset_directory(
        &self,
        dataset_id: &str,
        path: &str,
    ) -> Result<DirectoryFiles, MetaxError> {
        let request = Request::get(self.url(&format!("/datasets/{}/directories", dataset_id)))
            .query("path", path)
            .query("include_nulls", true);
        Ok(self
            .directory_pages(request)
            .await?
            .unwrap_or_else(DirectoryFiles::empty))
    }

    async fn get_project_directory(
        &self,
        project: &str,
        path: &str,
        dataset_id: Option<&str>,
    ) -> Result<DirectoryFiles, MetaxError> {
        let request = Request::get(self.url("/directories"))
            .query("csc_project", project)
            .query("path", path)
            .query_opt("dataset", dataset_id)
            .query("include_nulls", true);
        self.directory_pages(request)
            .await?
            .ok_or(MetaxError::NotAvailable(Resource::Directory))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(url: &str) -> V3Client {
        V3Client::new(url, Some("tpas".into()), Some("pw".into()), None, true).unwrap()
    }

    #[test]
    fn base_url_ignores_trailing_slash() {
        assert_eq!(client("https://metax.localhost/").url("/files"), "https://metax.localhost/v3/files");
        assert_eq!(client("https://metax.localhost").url("/files"), "https://metax.localhost/v3/files");
    }

    #[test]
    fn typed_reports_bad_records() {
        let err = typed::<File>(vec![json!({"size": "big"})]).unwrap_err();
        assert!(matches!(err, MetaxError::Decode(_)));
    }
}
