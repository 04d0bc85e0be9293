//! convert::v3_to_v2
//!
//! Reshape V3 write payloads for Metax V2 endpoints.
//!
//! Only what the services actually send is covered: new files, file patches,
//! contracts and the contract/preservation fields of a dataset.

use serde_json::{json, Map, Value};

use super::json::remove_none;

/// Convert a V3 contract.
pub fn contract(v3: &Value) -> Value {
    let identifier = match &v3["contract_identifier"] {
        Value::Null => v3["id"].clone(),
        id => id.clone(),
    };
    remove_none(json!({
        "date_modified": v3["modified"],
        "date_created": v3["created"],
        "service_created": v3["service"],
        "removed": v3["removed"],
        "contract_json": {
            "quota": v3["quota"],
            "title": v3["title"]["und"],
            "contact": v3["contact"],
            "created": v3["created"],
            "modified": v3["modified"],
            "validity": v3["validity"],
            "identifier": identifier,
            "description": v3["description"]["und"],
            "organization": v3["organization"],
            "related_service": v3["related_service"],
        },
    }))
}

/// Convert the fields of a V3 dataset that V2 lets the services change.
pub fn dataset(v3: &Value) -> Value {
    let preservation = &v3["preservation"];
    let mut converted = Map::new();
    if !preservation["contract"].is_null() {
        converted.insert(
            "contract".into(),
            json!({"identifier": preservation["contract"]}),
        );
    }
    for (v3_key, v2_key) in [
        ("state", "preservation_state"),
        ("description", "preservation_description"),
        ("reason_description", "preservation_reason_description"),
    ] {
        let value = match &preservation[v3_key] {
            // V3 keeps the description as a language map
            Value::Object(map) => map.get("en").cloned().unwrap_or(Value::Null),
            other => other.clone(),
        };
        if !value.is_null() {
            converted.insert(v2_key.into(), value);
        }
    }
    Value::Object(converted)
}

/// Convert a V3 file.
pub fn file(v3: &Value) -> Value {
    let characteristics = &v3["characteristics"];
    let format_version = &characteristics["file_format_version"];
    let checksum = match v3["checksum"].as_str() {
        Some(checksum) => {
            let (algorithm, value) = checksum.split_once(':').unwrap_or(("", checksum));
            json!({"algorithm": algorithm.to_uppercase(), "value": value})
        }
        None => Value::Null,
    };

    remove_none(json!({
        "identifier": v3["id"],
        "file_storage": {"identifier": v3["storage_identifier"]},
        "file_path": v3["pathname"],
        "file_name": v3["filename"],
        "byte_size": v3["size"],
        "checksum": checksum,
        "service_created": v3["storage_service"],
        "project_identifier": v3["csc_project"],
        "file_frozen": v3["frozen"],
        "file_modified": v3["modified"],
        "removed": v3["removed"],
        "date_created": v3["published"],
        "file_format": v3["file_format"],
        "file_characteristics": {
            "encoding": characteristics["encoding"],
            "csv_has_header": characteristics["csv_has_header"],
            "csv_quoting_char": characteristics["csv_quoting_char"],
            "csv_delimiter": characteristics["csv_delimiter"],
            "csv_record_separator": characteristics["csv_record_separator"],
            "title": format_version["pref_label"],
            "file_format": format_version["file_format"],
            "format_version": format_version["format_version"],
        },
        "file_characteristics_extension": v3["characteristics_extension"],
    }))
}
