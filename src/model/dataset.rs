//! model::dataset
//!
//! Normalized dataset record.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::{null_as_default, LangString};
use crate::state::{PreservationState, UNSET_STATE};

/// A dataset as seen by the preservation services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Metax identifier
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub created: Option<String>,
    pub title: Option<LangString>,
    pub description: Option<LangString>,
    pub modified: Option<String>,
    /// Zeroed when the dataset has no files
    #[serde(default, deserialize_with = "null_as_default")]
    pub fileset: Fileset,
    /// State `-1` when the dataset has never entered preservation
    #[serde(default, deserialize_with = "null_as_default")]
    pub preservation: Preservation,
    pub access_rights: Option<AccessRights>,
    /// Free-form version tag, a string or a number depending on the catalog
    #[serde(default)]
    pub version: Value,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language: Vec<Language>,
    pub persistent_identifier: Option<String>,
    pub issued: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub actors: Vec<Actor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub keyword: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme: Vec<Theme>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub spatial: Vec<Spatial>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub field_of_science: Vec<FieldOfScience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub provenance: Vec<Provenance>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata_owner: MetadataOwner,
    pub data_catalog: Option<String>,
}

impl Dataset {
    /// Identifier of the contract the dataset is preserved under.
    pub fn contract(&self) -> Option<&str> {
        self.preservation.contract.as_deref()
    }

    /// Current preservation state, `None` when unset or unknown.
    pub fn preservation_state(&self) -> Option<PreservationState> {
        PreservationState::try_from(self.preservation.state).ok()
    }

    /// Project that owns the dataset files.
    pub fn csc_project(&self) -> Option<&str> {
        self.fileset.csc_project.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fileset {
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_files_size: u64,
    pub csc_project: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_files_count: u64,
}

/// Preservation bookkeeping of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preservation {
    #[serde(default = "unset_state", deserialize_with = "state_or_unset")]
    pub state: i64,
    /// Language map in V3, plain text in V2
    #[serde(default)]
    pub description: Option<Value>,
    pub reason_description: Option<String>,
    /// Present once a preserved copy of the dataset exists
    #[serde(default, deserialize_with = "null_as_default")]
    pub dataset_version: DatasetVersion,
    pub contract: Option<String>,
}

impl Default for Preservation {
    fn default() -> Self {
        Self {
            state: UNSET_STATE,
            description: None,
            reason_description: None,
            dataset_version: DatasetVersion::default(),
            contract: None,
        }
    }
}

fn unset_state() -> i64 {
    UNSET_STATE
}

fn state_or_unset<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(deserializer)?.unwrap_or(UNSET_STATE))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetVersion {
    pub id: Option<String>,
    pub persistent_identifier: Option<String>,
    pub preservation_state: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessRights {
    #[serde(default, deserialize_with = "null_as_default")]
    pub license: Vec<License>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct License {
    /// Empty string when Metax has no URL for the license
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    pub pref_label: Option<LangString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub url: Option<String>,
}

/// A person or organization credited on the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Roles such as `creator` or `publisher`
    #[serde(default, deserialize_with = "null_as_default")]
    pub roles: Vec<String>,
    pub person: Option<ActorPerson>,
    pub organization: Option<ActorOrganization>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorPerson {
    pub name: Option<String>,
    pub external_identifier: Option<String>,
    /// Hidden by Metax for some datasets
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorOrganization {
    pub pref_label: Option<LangString>,
    pub url: Option<String>,
    pub external_identifier: Option<String>,
    pub parent: Option<ParentOrganization>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentOrganization {
    pub pref_label: Option<LangString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub pref_label: Option<LangString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOfScience {
    pub pref_label: Option<LangString>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Spatial {
    pub geographic_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Provenance {
    pub title: Option<LangString>,
    pub temporal: Option<ProvenanceTemporal>,
    pub description: Option<LangString>,
    pub event_outcome: Option<ProvenanceEventOutcome>,
    pub outcome_description: Option<LangString>,
    pub lifecycle_event: Option<ProvenanceLifecycleEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceTemporal {
    pub start_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceEventOutcome {
    pub pref_label: Option<LangString>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvenanceLifecycleEvent {
    pub pref_label: Option<LangString>,
}

/// Owner of the dataset metadata. Either field may be hidden by Metax.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetadataOwner {
    pub organization: Option<String>,
    pub user: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn minimal_dataset_gets_defaults() {
        let dataset: Dataset = serde_json::from_value(json!({
            "id": "test_dataset_id",
            "created": "test_created_date",
            "title": {"en": "testing"},
            "modified": "test_modified_date",
            "version": 1,
            "fileset": null,
            "preservation": null,
            "metadata_owner": {"organization": "service_tpas", "user": "service_tpas"}
        }))
        .unwrap();

        assert_eq!(
            serde_json::to_value(&dataset).unwrap(),
            json!({
                "id": "test_dataset_id",
                "created": "test_created_date",
                "title": {"en": "testing"},
                "description": null,
                "modified": "test_modified_date",
                "fileset": {
                    "total_files_size": 0,
                    "csc_project": null,
                    "total_files_count": 0
                },
                "preservation": {
                    "state": -1,
                    "description": null,
                    "reason_description": null,
                    "dataset_version": {
                        "id": null,
                        "persistent_identifier": null,
                        "preservation_state": null
                    },
                    "contract": null
                },
                "access_rights": null,
                "version": 1,
                "language": [],
                "persistent_identifier": null,
                "issued": null,
                "actors": [],
                "keyword": [],
                "theme": [],
                "spatial": [],
                "field_of_science": [],
                "provenance": [],
                "metadata_owner": {"organization": "service_tpas", "user": "service_tpas"},
                "data_catalog": null
            })
        );
        assert!(dataset.preservation_state().is_none());
    }

    #[test]
    fn drops_fields_outside_stable_set() {
        let dataset: Dataset = serde_json::from_value(json!({
            "id": "d1",
            "cumulative_state": 0,
            "preservation": {
                "state": 75,
                "contract": "agreement:identifier1",
                "id": "abcdefgh1",
                "description": {"en": "preservation_description"}
            },
            "access_rights": {
                "license": [{"url": null, "pref_label": {"en": "Other"}, "custom_url": "x"}],
                "available": "2020-01-01"
            },
            "actors": [{
                "roles": null,
                "person": {"name": "Teppo", "external_identifier": null, "homepage": {}},
                "organization": null
            }]
        }))
        .unwrap();

        assert_eq!(dataset.contract(), Some("agreement:identifier1"));
        assert_eq!(
            dataset.preservation_state(),
            Some(PreservationState::MetadataConfirmed)
        );
        let value = serde_json::to_value(&dataset).unwrap();
        assert!(value.get("cumulative_state").is_none());
        assert_eq!(
            value["access_rights"],
            json!({"license": [{"url": "", "pref_label": {"en": "Other"}}]})
        );
        assert_eq!(
            value["actors"],
            json!([{
                "roles": [],
                "person": {"name": "Teppo", "external_identifier": null, "email": null},
                "organization": null
            }])
        );
        assert_eq!(
            value["preservation"]["description"],
            json!({"en": "preservation_description"})
        );
    }
}
