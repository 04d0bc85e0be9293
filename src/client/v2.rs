//! client::v2
//!
//! Metax V2 backend.
//!
//! # Design
//!
//! Callers see the same V3 layout as with [`super::V3Client`]. Responses are
//! run through [`crate::convert::v2_to_v3`] before being deserialized, and
//! write payloads go through [`crate::convert::v3_to_v2`] before being sent.
//!
//! V2 replaces nested objects wholesale on PATCH. Partial updates are
//! therefore merged with the current record first (see
//! [`crate::convert::merge_patch`]), which costs one extra GET per patch.
//! Contracts keep everything under a single `contract_json` object, so a
//! contract patch always sends the whole merged contract.
//!
//! Operations that only exist in V3 keep the trait's `NotSupported` default.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::factory::ApiVersion;
use super::http::{HttpTransport, Request, Response};
use super::only_already_exists;
use super::traits::{DatasetQuery, MetaxApi};
use crate::convert::{merge_patch, update_nested, v2_to_v3, v3_to_v2};
use crate::error::{MetaxError, Resource};
use crate::model::{Contract, Dataset, DirectoryFiles, File, Paginated};
use crate::state::PreservationState;

/// Page size used when walking every page of a file listing.
const FILE_PAGE_SIZE: u64 = 10_000;

/// Client for the Metax V2 API.
#[derive(Debug)]
pub struct V2Client {
    transport: HttpTransport,
    /// Metax root URL
    url: String,
    /// `{url}/rest/v2`
    base_url: String,
    /// `{url}/rpc/v2`
    rpc_url: String,
}

impl V2Client {
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
        let url = url.trim_end_matches('/').to_string();
        Ok(Self {
            transport: HttpTransport::new(user, password, token, verify)?,
            base_url: format!("{}/rest/v2", url),
            rpc_url: format!("{}/rpc/v2", url),
            url,
        })
    }

    fn rest(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request whose 404 means that `missing` does not exist.
    async fn fetch(&self, request: Request, missing: Resource) -> Result<Response, MetaxError> {
        let response = self.transport.send(request.allow(404)).await?;
        if response.is(404) {
            return Err(MetaxError::NotAvailable(missing));
        }
        Ok(response)
    }

    /// Current V2 dataset record, unconverted.
    async fn raw_dataset(&self, id: &str) -> Result<Value, MetaxError> {
        let request = Request::get(self.rest(&format!("/datasets/{}", id)))
            .query("include_user_metadata", true)
            .query("file_details", true);
        self.fetch(request, Resource::Dataset).await?.value()
    }

    async fn raw_file(&self, id: &str) -> Result<Value, MetaxError> {
        let request = Request::get(self.rest(&format!("/files/{}", id)));
        self.fetch(request, Resource::File).await?.value()
    }

    /// Project of a dataset that only has files listed outside its research
    /// dataset.
    async fn dataset_project(&self, id: &str) -> Result<Option<String>, MetaxError> {
        let request = Request::get(self.rest(&format!("/datasets/{}/files", id))).allow(404);
        let response = self.transport.send(request).await?;
        if response.is(404) {
            return Ok(None);
        }
        let files = response.value()?;
        Ok(files
            .as_array()
            .into_iter()
            .flatten()
            .find_map(|file| file["project_identifier"].as_str())
            .map(str::to_string))
    }

    async fn convert_dataset(&self, v2: &Value) -> Result<Dataset, MetaxError> {
        let hint = match v2["identifier"].as_str() {
            Some(id) if v2_to_v3::needs_project_lookup(v2) => self.dataset_project(id).await?,
            _ => None,
        };
        Ok(serde_json::from_value(v2_to_v3::dataset(v2, hint.as_deref()))?)
    }

    async fn convert_dataset_page(&self, mut page: Value) -> Result<Paginated<Dataset>, MetaxError> {
        let results = match page.get_mut("results").map(Value::take) {
            Some(Value::Array(results)) => results,
            _ => Vec::new(),
        };
        let mut datasets = Vec::with_capacity(results.len());
        for dataset in &results {
            datasets.push(self.convert_dataset(dataset).await?);
        }
        Ok(Paginated {
            count: page["count"].as_u64(),
            next: page["next"].as_str().map(str::to_string),
            previous: page["previous"].as_str().map(str::to_string),
            results: datasets,
        })
    }

    async fn patch_dataset_flat(&self, id: &str, data: Value) -> Result<(), MetaxError> {
        let request = Request::patch(self.rest(&format!("/datasets/{}", id))).json(data);
        self.fetch(request, Resource::Dataset).await?;
        Ok(())
    }

    async fn post_converted_files(&self, body: Value) -> Result<Value, MetaxError> {
        let request = Request::post(self.rest("/files/"))
            .json(body)
            .allow(400);
        let response = self.fetch(request, Resource::File).await?;
        if response.is(400) {
            let errors = response.value().unwrap_or(Value::Null);
            if only_already_exists(&errors) {
                return Err(MetaxError::AlreadyExists {
                    message: "Some of the files already exist.".to_string(),
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
}

fn contract_from_v2(v2: &Value) -> Result<Contract, MetaxError> {
    Ok(serde_json::from_value(v2_to_v3::contract(v2))?)
}

fn file_from_v2(v2: &Value, research_dataset_file: &Value) -> Result<File, MetaxError> {
    Ok(serde_json::from_value(v2_to_v3::file(v2, research_dataset_file))?)
}

#[async_trait]
impl MetaxApi for V2Client {
    fn api_version(&self) -> ApiVersion {
        ApiVersion::V2
    }

    async fn get_datasets(&self, query: &DatasetQuery) -> Result<Paginated<Dataset>, MetaxError> {
        let states = match &query.states {
            Some(states) => PreservationState::join_codes(states),
            None => PreservationState::join_codes(&PreservationState::ALL),
        };
        let request = Request::get(self.rest("/datasets"))
            .query_opt("pas_filter", query.search.as_deref())
            .query_opt("metadata_owner_org", query.metadata_owner_org.as_deref())
            .query_opt("metadata_provider_user", query.metadata_owner_user.as_deref())
            .query_opt("ordering", query.ordering.as_deref())
            .query("include_user_metadata", true)
            .query("preservation_state", states)
            .query("limit", query.limit)
            .query("offset", query.offset);
        let page = self.fetch(request, Resource::Dataset).await?.value()?;
        self.convert_dataset_page(page).await
    }

    async fn query_datasets(
        &self,
        params: &[(String, String)],
    ) -> Result<Paginated<Dataset>, MetaxError> {
        let request = params
            .iter()
            .fold(Request::get(self.rest("/datasets")), |request, (key, value)| {
                request.query(key.as_str(), value)
            });
        let page = self.transport.send(request).await?.value()?;
        self.convert_dataset_page(page).await
    }

    async fn get_datasets_by_ids(
        &self,
        ids: &[String],
        limit: u64,
        offset: u64,
        fields: &[String],
    ) -> Result<Paginated<Dataset>, MetaxError> {
        // The only endpoint without the API version in its path
        let mut request = Request::post(format!("{}/rest/datasets/list", self.url))
            .query("limit", limit)
            .query("offset", offset)
            .json(json!(ids));
        if !fields.is_empty() {
            request = request.query("fields", fields.join(","));
        }
        let page = self.transport.send(request).await?.value()?;
        self.convert_dataset_page(page).await
    }

    async fn get_dataset(&self, id: &str) -> Result<Dataset, MetaxError> {
        let v2 = self.raw_dataset(id).await?;
        self.convert_dataset(&v2).await
    }

    async fn get_dataset_raw(&self, id: &str) -> Result<Value, MetaxError> {
        self.raw_dataset(id).await
    }

    async fn post_dataset(&self, metadata: &Value) -> Result<Value, MetaxError> {
        let request = Request::post(self.rest("/datasets/")).json(metadata.clone());
        self.transport.send(request).await?.value()
    }

    async fn patch_dataset(&self, id: &str, data: &Value) -> Result<Value, MetaxError> {
        let original = self.raw_dataset(id).await?;
        let merged = merge_patch(&original, v3_to_v2::dataset(data));
        let request = Request::patch(self.rest(&format!("/datasets/{}", id))).json(merged);
        self.transport.send(request).await?.value()
    }

    async fn delete_dataset(&self, id: &str) -> Result<(), MetaxError> {
        self.transport
            .send(Request::delete(self.rest(&format!("/datasets/{}", id))))
            .await?;
        Ok(())
    }

    async fn get_contract_datasets(&self, contract_id: &str) -> Result<Vec<Dataset>, MetaxError> {
        let request = Request::get(self.rest(&format!("/contracts/{}/datasets", contract_id)));
        let datasets = self.transport.send(request).await?.value()?;
        let mut converted = Vec::new();
        for dataset in datasets.as_array().into_iter().flatten() {
            converted.push(self.convert_dataset(dataset).await?);
        }
        Ok(converted)
    }

    async fn get_dataset_template(&self) -> Result<Value, MetaxError> {
        let request = Request::get(format!(
            "{}/datasets/get_minimal_dataset_template",
            self.rpc_url
        ))
        .query("type", "enduser_pas");
        self.transport.send(request).await?.value()
    }

    async fn get_datacatalog(&self, id: &str) -> Result<Value, MetaxError> {
        let request = Request::get(self.rest(&format!("/datacatalogs/{}", id)));
        self.fetch(request, Resource::DataCatalog).await?.value()
    }

    async fn get_datacite(&self, id: &str, dummy_doi: bool) -> Result<String, MetaxError> {
        let request = Request::get(self.rest(&format!("/datasets/{}", id)))
            .query("dataset_format", "datacite")
            .query("dummy_doi", dummy_doi)
            .allow(400);
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
        self.patch_dataset_flat(
            id,
            json!({
                "preservation_state": state.code(),
                "preservation_description": description,
            }),
        )
        .await
    }

    async fn set_preservation_reason(&self, id: &str, reason: &str) -> Result<(), MetaxError> {
        self.patch_dataset_flat(id, json!({"preservation_reason_description": reason}))
            .await
    }

    async fn set_contract(&self, id: &str, contract_id: &str) -> Result<(), MetaxError> {
        self.patch_dataset_flat(id, json!({"contract": {"identifier": contract_id}}))
            .await
    }

    async fn get_contracts(
        &self,
        limit: u64,
        offset: u64,
        org_filter: Option<&str>,
    ) -> Result<Paginated<Contract>, MetaxError> {
        let request = Request::get(self.rest("/contracts"))
            .query_opt("organization", org_filter)
            .query("limit", limit)
            .query("offset", offset);
        let page: Paginated<Value> = self.fetch(request, Resource::Contract).await?.json()?;
        page.try_map(|contract| contract_from_v2(&contract))
    }

    async fn get_contract(&self, id: &str) -> Result<Contract, MetaxError> {
        let request = Request::get(self.rest(&format!("/contracts/{}", id)));
        let v2 = self.fetch(request, Resource::Contract).await?.value()?;
        contract_from_v2(&v2)
    }

    async fn post_contract(&self, metadata: &Value) -> Result<Value, MetaxError> {
        let request = Request::post(self.rest("/contracts/")).json(v3_to_v2::contract(metadata));
        let created = self.transport.send(request).await?.value()?;
        Ok(v2_to_v3::contract(&created))
    }

    async fn patch_contract(&self, id: &str, data: &Value) -> Result<Value, MetaxError> {
        let original = serde_json::to_value(self.get_contract(id).await?)?;
        let merged = update_nested(&original, data);
        let request = Request::patch(self.rest(&format!("/contracts/{}", id)))
            .json(v3_to_v2::contract(&merged));
        let patched = self.transport.send(request).await?.value()?;
        Ok(v2_to_v3::contract(&patched))
    }

    async fn delete_contract(&self, id: &str) -> Result<(), MetaxError> {
        self.transport
            .send(Request::delete(self.rest(&format!("/contracts/{}", id))))
            .await?;
        Ok(())
    }

    async fn get_file(&self, id: &str) -> Result<File, MetaxError> {
        file_from_v2(&self.raw_file(id).await?, &Value::Null)
    }

    async fn get_files(&self, project: &str) -> Result<Vec<File>, MetaxError> {
        let request = Request::get(self.rest("/files"))
            .query("limit", FILE_PAGE_SIZE)
            .query("project_identifier", project);
        let files = self.transport.collect_list(request).await?.unwrap_or_default();
        files.iter().map(|file| file_from_v2(file, &Value::Null)).collect()
    }

    async fn get_project_file(&self, project: &str, path: &str) -> Result<File, MetaxError> {
        let request = Request::get(self.rest("/files"))
            .query("file_path", path)
            .query("project_identifier", project);
        let page = self.transport.send(request).await?.value()?;
        let wanted = path.trim_matches('/');
        let found = page["results"]
            .as_array()
            .into_iter()
            .flatten()
            .find(|file| {
                file["file_path"]
                    .as_str()
                    .is_some_and(|p| p.trim_matches('/') == wanted)
            })
            .ok_or(MetaxError::NotAvailable(Resource::File))?;
        file_from_v2(found, &Value::Null)
    }

    async fn post_file(&self, metadata: &Value) -> Result<Value, MetaxError> {
        self.post_converted_files(v3_to_v2::file(metadata)).await
    }

    async fn post_files(&self, metadata: &[Value]) -> Result<Value, MetaxError> {
        let converted: Vec<Value> = metadata.iter().map(v3_to_v2::file).collect();
        self.post_converted_files(Value::Array(converted)).await
    }

    async fn patch_file(&self, id: &str, data: &Value) -> Result<Value, MetaxError> {
        let original = self.raw_file(id).await?;
        let merged = merge_patch(&original, v3_to_v2::file(data));
        let request = Request::patch(self.rest(&format!("/files/{}", id))).json(merged);
        self.transport.send(request).await?.value()
    }

    async fn patch_file_characteristics(&self, id: &str, data: &Value) -> Result<(), MetaxError> {
        self.patch_file(id, data).await?;
        Ok(())
    }

    async fn delete_file(&self, id: &str) -> Result<Value, MetaxError> {
        self.transport
            .send(Request::delete(self.rest(&format!("/files/{}", id))))
            .await?
            .value()
    }

    async fn delete_files(&self, ids: &[String]) -> Result<Value, MetaxError> {
        let request = Request::delete(self.rest("/files")).json(json!(ids));
        self.transport.send(request).await?.value()
    }

    async fn get_file_datasets(&self, file_id: &str) -> Result<Value, MetaxError> {
        let request = Request::post(self.rest("/files/datasets")).json(json!([file_id]));
        self.fetch(request, Resource::File).await?.value()
    }

    async fn get_file2dataset_dict(
        &self,
        file_ids: &[String],
    ) -> Result<BTreeMap<String, Vec<String>>, MetaxError> {
        // V2 rejects an empty list
        if file_ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let request = Request::post(self.rest("/files/datasets"))
            .query("keys", "files")
            .json(json!(file_ids));
        match self.transport.send(request).await?.value()? {
            Value::Array(_) | Value::Null => Ok(BTreeMap::new()),
            relations => Ok(serde_json::from_value(relations)?),
        }
    }

    async fn get_dataset_files(&self, dataset_id: &str) -> Result<Vec<File>, MetaxError> {
        let request = Request::get(self.rest(&format!("/datasets/{}/files", dataset_id)));
        let files = self.fetch(request, Resource::Dataset).await?.value()?;
        let no_metadata = Value::Null;

        // Use category only exists in the research dataset
        let dataset = self.raw_dataset(dataset_id).await?;
        let research_files: BTreeMap<&str, &Value> = dataset["research_dataset"]["files"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(|file| Some((file["identifier"].as_str()?, file)))
            .collect();

        files
            .as_array()
            .into_iter()
            .flatten()
            .map(|file| {
                let research_file = file["identifier"]
                    .as_str()
                    .and_then(|id| research_files.get(id).copied())
                    .unwrap_or(&no_metadata);
                file_from_v2(file, research_file)
            })
            .collect()
    }

    async fn get_dataset_file_count(&self, dataset_id: &str) -> Result<u64, MetaxError> {
        let request = Request::get(self.rest(&format!("/datasets/{}/files", dataset_id)))
            .query("file_fields", "id");
        let files = self.fetch(request, Resource::Dataset).await?.value()?;
        Ok(files.as_array().map_or(0, |files| files.len() as u64))
    }

    async fn get_project_directory(
        &self,
        project: &str,
        path: &str,
        dataset_id: Option<&str>,
    ) -> Result<DirectoryFiles, MetaxError> {
        let request = Request::get(self.rest("/directories/files"))
            .query("path", path)
            .query("project", project)
            .query("depth", 1)
            .query("include_parent", true)
            .query_opt("cr_identifier", dataset_id);
        let v2 = self.fetch(request, Resource::Directory).await?.value()?;
        let mut page = v2_to_v3::directory_files(&v2);
        let listing = page.get_mut("results").map(Value::take).unwrap_or_default();
        Ok(serde_json::from_value(listing)?)
    }

    async fn get_directory_id(&self, project: &str, path: &str) -> Result<String, MetaxError> {
        let request = Request::get(self.rest("/directories/files"))
            .query("path", path)
            .query("project", project)
            .query("include_parent", true);
        let directory = self.fetch(request, Resource::Directory).await?.value()?;
        directory["identifier"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| MetaxError::InvalidData("Directory has no identifier.".to_string()))
    }
}
