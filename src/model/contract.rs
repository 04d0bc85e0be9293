//! model::contract
//!
//! Normalized preservation contract.

use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: UndString,
    pub quota: Option<u64>,
    pub organization: Option<ContractOrganization>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: Vec<Contact>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub related_service: Vec<RelatedService>,
    /// `{"und": null}` when the contract has no description
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: UndString,
    pub created: Option<String>,
    pub validity: Option<Validity>,
}

/// Text in an undetermined language.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UndString {
    pub und: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractOrganization {
    pub name: Option<String>,
    pub organization_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelatedService {
    pub identifier: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Validity {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}
