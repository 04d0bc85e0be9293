//! model::file
//!
//! Normalized file record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{null_as_default, LangString};

/// A file as seen by the preservation services.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct File {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub storage_identifier: Option<String>,
    pub pathname: Option<String>,
    pub filename: Option<String>,
    pub size: Option<u64>,
    /// `<algorithm>:<hex digest>`, e.g. `md5:2d...`
    pub checksum: Option<String>,
    pub csc_project: Option<String>,
    pub storage_service: Option<String>,
    /// Only populated when the file was listed through a dataset
    #[serde(default, deserialize_with = "null_as_default")]
    pub dataset_metadata: DatasetMetadata,
    #[serde(default, deserialize_with = "null_as_default")]
    pub characteristics: Characteristics,
    #[serde(default)]
    pub characteristics_extension: Value,
    pub pas_compatible_file: Option<String>,
    pub non_pas_compatible_file: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub use_category: Option<UseCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UseCategory {
    pub pref_label: Option<LangString>,
    pub url: Option<String>,
}

/// Technical characteristics detected for the file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Characteristics {
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_format_version: FormatVersion,
    pub encoding: Option<String>,
    pub csv_delimiter: Option<String>,
    pub csv_record_separator: Option<String>,
    pub csv_quoting_char: Option<String>,
    pub csv_has_header: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormatVersion {
    pub file_format: Option<String>,
    pub format_version: Option<String>,
}

/// Entry of the file format reference list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileFormatVersion {
    pub url: Option<String>,
    pub file_format: Option<String>,
    pub format_version: Option<String>,
}

/// Value of the pathname-keyed project file index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub identifier: String,
    pub storage_service: Option<String>,
}
