//! model
//!
//! Normalized records handed out by the client.
//!
//! # Design
//!
//! Metax responses carry far more than the preservation services need, and
//! the two API versions disagree on field names. Every response is first
//! reshaped into the V3 layout (see [`crate::convert`]) and then deserialized
//! into the types here, which keep only the stable field set.
//!
//! Deserialization is lenient: unknown fields are ignored, and `null` or
//! missing values collapse to the defaults documented on each field. This
//! means a record always serializes back with the same keys, whatever the
//! source looked like.

pub mod contract;
pub mod dataset;
pub mod directory;
pub mod file;

pub use contract::{Contact, Contract, ContractOrganization, RelatedService, UndString, Validity};
pub use dataset::{
    AccessRights, Actor, ActorOrganization, ActorPerson, Dataset, DatasetVersion, Fileset,
    FieldOfScience, Language, License, MetadataOwner, ParentOrganization, Preservation,
    Provenance, ProvenanceEventOutcome, ProvenanceLifecycleEvent, ProvenanceTemporal, Spatial,
    Theme,
};
pub use directory::{DirectoryEntry, DirectoryFile, DirectoryFiles, DirectoryInfo};
pub use file::{
    Characteristics, DatasetMetadata, File, FileFormatVersion, FileRef, FormatVersion,
    UseCategory,
};

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Text keyed by language code, e.g. `{"en": "Title", "fi": "Otsikko"}`.
pub type LangString = BTreeMap<String, String>;

/// One page of a list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Paginated<T> {
    /// Total number of matching records, when Metax reports it
    #[serde(default)]
    pub count: Option<u64>,
    /// Absolute URL of the next page
    #[serde(default)]
    pub next: Option<String>,
    /// Absolute URL of the previous page
    #[serde(default)]
    pub previous: Option<String>,
    /// Records on this page
    #[serde(default, deserialize_with = "null_as_default")]
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Convert every record on the page, keeping the paging links.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }

    /// Fallible version of [`Paginated::map`].
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Paginated<U>, E> {
        Ok(Paginated {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect::<Result<_, _>>()?,
        })
    }
}

/// Deserialize a value, treating `null` as the type's default.
///
/// Pair with `#[serde(default)]` so that missing keys behave the same way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "null_as_default")]
        items: Vec<u32>,
        #[serde(default, deserialize_with = "null_as_default")]
        size: u64,
    }

    #[test]
    fn null_and_missing_become_default() {
        let probe: Probe = serde_json::from_value(json!({"items": null})).unwrap();
        assert!(probe.items.is_empty());
        assert_eq!(probe.size, 0);

        let probe: Probe = serde_json::from_value(json!({"items": [1, 2], "size": 7})).unwrap();
        assert_eq!(probe.items, vec![1, 2]);
        assert_eq!(probe.size, 7);
    }

    #[test]
    fn paginated_map_keeps_links() {
        let page: Paginated<u32> = serde_json::from_value(json!({
            "count": 3,
            "next": "https://metax/v3/files?page=2",
            "previous": null,
            "results": [1, 2]
        }))
        .unwrap();

        let doubled = page.map(|n| n * 2);
        assert_eq!(doubled.results, vec![2, 4]);
        assert_eq!(doubled.count, Some(3));
        assert_eq!(doubled.next.as_deref(), Some("https://metax/v3/files?page=2"));
    }

    #[test]
    fn paginated_tolerates_missing_results() {
        let page: Paginated<u32> = serde_json::from_value(json!({"next": null})).unwrap();
        assert!(page.results.is_empty());
        assert!(page.count.is_none());
    }
}
