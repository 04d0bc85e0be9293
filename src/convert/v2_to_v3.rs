//! convert::v2_to_v3
//!
//! Reshape Metax V2 payloads into the V3 layout.
//!
//! Only the fields the preservation services use are carried over. A field
//! that is missing from the V2 payload is left out of the output rather than
//! set to `null`.

use serde_json::{json, Map, Value};

use super::json::{items, or, remove_none, truthy};

/// License URL used when a V2 license has no identifier.
pub const UNSPECIFIED_LICENSE: &str = "http://uri.suomi.fi/codelist/fairdata/license/code/notspecified";

const ACTOR_ROLES: [&str; 5] = ["creator", "publisher", "curator", "contributor", "rights_holder"];

/// Convert a V2 contract.
pub fn contract(v2: &Value) -> Value {
    let contract_json = &v2["contract_json"];
    remove_none(json!({
        "modified": v2["date_modified"],
        "created": v2["date_created"],
        "service": v2["service_created"],
        "removed": v2["removed"],
        "id": contract_json["identifier"],
        "contract_identifier": contract_json["identifier"],
        "title": {"und": contract_json["title"]},
        "description": {"und": contract_json["description"]},
        "quota": contract_json["quota"],
        "organization": contract_json["organization"],
        "validity": contract_json["validity"],
        "contact": contract_json["contact"],
        "related_service": contract_json["related_service"],
    }))
}

/// Convert a V2 `/directories/files` response into a single V3 page.
pub fn directory_files(v2: &Value) -> Value {
    let directories: Vec<Value> = items(&v2["directories"])
        .map(|d| {
            json!({
                "name": d["directory_name"],
                "size": d["byte_size"],
                "file_count": d["file_count"],
                "pathname": d["directory_path"],
            })
        })
        .collect();
    let files: Vec<Value> = items(&v2["files"])
        .map(|f| {
            json!({
                "id": f["identifier"],
                "filename": f["file_name"],
                "size": f["byte_size"],
            })
        })
        .collect();

    json!({
        "count": null,
        "next": null,
        "previous": null,
        "results": remove_none(json!({
            "directory": {"pathname": v2["directory_path"]},
            "directories": directories,
            "files": files,
        })),
    })
}

/// Whether the project of a V2 dataset can only be found by listing its
/// files.
pub fn needs_project_lookup(v2: &Value) -> bool {
    let research_dataset = &v2["research_dataset"];
    !truthy(&research_dataset["files"]) && !truthy(&research_dataset["directories"])
}

/// Convert a V2 dataset.
///
/// `project_hint` is used as `fileset.csc_project` when neither the files
/// nor the directories of the research dataset name a project.
pub fn dataset(v2: &Value, project_hint: Option<&str>) -> Value {
    let deprecated = if truthy(&v2["deprecated"]) {
        or(&v2["date_deprecated"], &v2["date_modified"])
    } else {
        Value::Null
    };
    let api_version = match &v2["api_meta"]["version"] {
        Value::Null => json!(1),
        v => v.clone(),
    };

    let mut dataset = Map::new();
    dataset.insert("metadata_owner".into(), metadata_owner(v2));
    dataset.insert("data_catalog".into(), v2["data_catalog"]["identifier"].clone());
    dataset.insert("cumulation_started".into(), v2["date_cumulation_started"].clone());
    dataset.insert("cumulation_ended".into(), v2["date_cumulation_ended"].clone());
    dataset.insert("cumulative_state".into(), v2["cumulative_state"].clone());
    dataset.insert("created".into(), v2["date_created"].clone());
    dataset.insert("deprecated".into(), deprecated);
    dataset.insert("state".into(), v2["state"].clone());
    dataset.insert(
        "last_cumulative_addition".into(),
        v2["date_last_cumulative_addition"].clone(),
    );
    dataset.insert("id".into(), v2["identifier"].clone());
    dataset.insert("api_version".into(), api_version);
    dataset.insert("preservation".into(), preservation(v2));
    dataset.insert("modified".into(), v2["date_modified"].clone());

    let rd = &v2["research_dataset"];
    let keyword = if truthy(&rd["keyword"]) { rd["keyword"].clone() } else { json!([]) };
    let research_fields = [
        ("persistent_identifier", rd["preferred_identifier"].clone()),
        ("title", rd["title"].clone()),
        ("description", rd["description"].clone()),
        ("issued", rd["issued"].clone()),
        ("keyword", keyword),
        ("bibliographic_citation", rd["bibliographic_citation"].clone()),
        ("actors", Value::Array(actors(rd))),
        ("provenance", map_items(&rd["provenance"], provenance)),
        ("projects", map_items(&rd["is_output_of"], project)),
        ("field_of_science", map_items(&rd["field_of_science"], |v| reference(v, "pref_label"))),
        ("theme", map_items(&rd["theme"], |v| reference(v, "pref_label"))),
        ("language", map_items(&rd["language"], |v| reference(v, "title"))),
        ("infrastructure", map_items(&rd["infrastructure"], |v| reference(v, "pref_label"))),
        ("spatial", map_items(&rd["spatial"], spatial)),
        ("temporal", map_items(&rd["temporal"], temporal)),
        ("other_identifiers", map_items(&rd["other_identifier"], other_identifier)),
        ("relation", map_items(&rd["relation"], relation)),
        ("remote_resources", map_items(&rd["remote_resources"], remote_resource)),
        ("fileset", fileset(rd, project_hint)),
    ];
    for (key, value) in research_fields {
        if !matches!(&value, Value::Array(a) if a.is_empty()) {
            dataset.insert(key.into(), value);
        }
    }

    let access_rights = &rd["access_rights"];
    if truthy(access_rights) {
        dataset.insert(
            "access_rights".into(),
            json!({
                "license": map_items(&access_rights["license"], license),
                "description": access_rights["description"],
                "available": access_rights["available"],
            }),
        );
    }
    if let Some(version) = rd.get("version") {
        dataset.insert("version".into(), version.clone());
    }

    remove_none(Value::Object(dataset))
}

/// Convert a V2 file.
///
/// `research_dataset_file` is the matching entry of the dataset's
/// `research_dataset.files`, which holds the per-dataset file metadata. Pass
/// `Value::Null` when the file was not fetched through a dataset.
pub fn file(v2: &Value, research_dataset_file: &Value) -> Value {
    let storage_service = match &v2["service_created"] {
        Value::String(s) if s == "tpas" => json!("pas"),
        other => other.clone(),
    };

    let mut converted = remove_none(json!({
        "id": v2["identifier"],
        "storage_identifier": v2["file_storage"]["identifier"],
        "pathname": v2["file_path"],
        "filename": v2["file_name"],
        "size": v2["byte_size"],
        "checksum": checksum(&v2["checksum"], "value"),
        "storage_service": storage_service,
        "csc_project": v2["project_identifier"],
        "frozen": v2["file_frozen"],
        "modified": v2["file_modified"],
        "removed": v2["removed"],
        "published": v2["date_created"],
        "dataset_metadata": {
            "title": research_dataset_file["title"],
            "file_type": reference(&research_dataset_file["file_type"], "pref_label"),
            "use_category": reference(&research_dataset_file["use_category"], "pref_label"),
        },
        "characteristics": file_characteristics(&v2["file_characteristics"]),
    }));

    if let Value::Object(map) = &mut converted {
        map.insert(
            "characteristics_extension".into(),
            v2["file_characteristics_extension"].clone(),
        );
    }
    converted
}

fn map_items(value: &Value, f: impl Fn(&Value) -> Value) -> Value {
    Value::Array(items(value).map(f).collect())
}

fn metadata_owner(v2: &Value) -> Value {
    let user = &v2["metadata_provider_user"];
    let org = or(&v2["metadata_provider_org"], &v2["metadata_owner_org"]);
    if user.is_null() && org.is_null() {
        return Value::Null;
    }
    json!({"user": user, "organization": org})
}

fn preservation(v2: &Value) -> Value {
    let version = &v2["preservation_dataset_version"];
    let dataset_version = if truthy(version) {
        json!({
            "id": version["identifier"],
            "persistent_identifier": version["preferred_identifier"],
            "preservation_state": version["preservation_state"],
        })
    } else {
        Value::Null
    };

    json!({
        "contract": v2["contract"]["identifier"],
        "id": v2["preservation_identifier"],
        "state": v2["preservation_state"],
        "description": v2["preservation_description"],
        "reason_description": v2["preservation_reason_description"],
        "dataset_version": dataset_version,
    })
}

fn fileset(rd: &Value, project_hint: Option<&str>) -> Value {
    let csc_project = if let Some(first) = rd["files"].as_array().and_then(|f| f.first()) {
        first["details"]["project_identifier"].clone()
    } else if let Some(first) = rd["directories"].as_array().and_then(|d| d.first()) {
        first["details"]["project_identifier"].clone()
    } else {
        project_hint.map(Value::from).unwrap_or(Value::Null)
    };

    json!({
        "csc_project": csc_project,
        "total_files_size": rd["total_files_byte_size"],
    })
}

fn file_characteristics(fc: &Value) -> Value {
    if !truthy(fc) {
        return Value::Null;
    }
    json!({
        "file_created": fc["file_created"],
        "encoding": fc["encoding"],
        "csv_has_header": fc["csv_has_header"],
        "csv_quoting_char": fc["csv_quoting_char"],
        "csv_delimiter": fc["csv_delimiter"],
        "csv_record_separator": fc["csv_record_separator"],
        "file_format_version": {
            "pref_label": fc["title"],
            "file_format": fc["file_format"],
            "format_version": fc["format_version"],
        },
    })
}

fn license(license: &Value) -> Value {
    let url = if truthy(&license["identifier"]) {
        license["identifier"].clone()
    } else {
        json!(UNSPECIFIED_LICENSE)
    };
    json!({
        "url": url,
        "custom_url": license["license"],
        "title": license["title"],
        "description": license["description"],
    })
}

fn homepage(homepage: &Value) -> Value {
    if !truthy(homepage) {
        return Value::Null;
    }
    json!({"title": homepage["title"], "url": homepage["identifier"]})
}

fn organization(org: &Value) -> Value {
    if !truthy(org) {
        return Value::Null;
    }
    let mut converted = json!({
        "pref_label": org["name"],
        "email": org["email"],
        "homepage": homepage(&org["homepage"]),
        "url": org["identifier"],
    });
    if truthy(&org["is_part_of"]) {
        converted["parent"] = organization(&org["is_part_of"]);
    }
    converted
}

fn actor(actor: &Value, roles: &[&str]) -> Value {
    let mut converted = Map::new();
    let mut v2_org = &Value::Null;
    match actor["@type"].as_str() {
        Some("Person") => {
            converted.insert(
                "person".into(),
                json!({
                    "name": actor["name"],
                    "external_identifier": actor["identifier"],
                    "email": actor["email"],
                    "homepage": homepage(&actor["homepage"]),
                }),
            );
            v2_org = &actor["member_of"];
        }
        Some("Organization") => v2_org = actor,
        _ => {}
    }

    if truthy(v2_org) {
        converted.insert("organization".into(), organization(v2_org));
    }
    if !roles.is_empty() {
        converted.insert("roles".into(), json!(roles));
    }
    Value::Object(converted)
}

/// Flatten the role lists of a research dataset into V3 actors. The same
/// actor appearing under several roles becomes one actor with all roles.
fn actors(rd: &Value) -> Vec<Value> {
    let mut collected: Vec<(&Value, Vec<&str>)> = Vec::new();
    for role in ACTOR_ROLES {
        let role_actors: Vec<&Value> = match &rd[role] {
            Value::Object(_) => vec![&rd[role]],
            other => items(other).collect(),
        };
        for role_actor in role_actors {
            match collected.iter_mut().find(|(a, _)| *a == role_actor) {
                Some((_, roles)) => roles.push(role),
                None => collected.push((role_actor, vec![role])),
            }
        }
    }
    collected
        .into_iter()
        .map(|(a, roles)| actor(a, &roles))
        .collect()
}

fn spatial(spatial: &Value) -> Value {
    if !truthy(spatial) {
        return Value::Null;
    }
    json!({
        "reference": spatial["place_uri"],
        "geographic_name": spatial["geographic_name"],
        "full_address": spatial["full_address"],
        "altitude_in_meters": spatial["alt"],
    })
}

fn temporal(temporal: &Value) -> Value {
    if !truthy(temporal) {
        return Value::Null;
    }
    json!({
        "start_date": temporal["start_date"],
        "end_date": temporal["end_date"],
        "temporal_coverage": temporal["temporal_coverage"],
    })
}

fn concept(concept: &Value) -> Value {
    if !truthy(concept) {
        return Value::Null;
    }
    json!({
        "pref_label": concept["pref_label"],
        "definition": concept["definition"],
        "concept_identifier": concept["identifier"],
        "in_scheme": concept["in_scheme"],
    })
}

fn variable(variable: &Value) -> Value {
    json!({
        "pref_label": variable["pref_label"],
        "description": variable["description"],
        "concept": concept(&variable["concept"]),
        "universe": concept(&variable["universe"]),
        "representation": variable["representation"],
    })
}

fn provenance(provenance: &Value) -> Value {
    json!({
        "title": provenance["title"],
        "description": provenance["description"],
        "preservation_event": reference(&provenance["preservation_event"], "pref_label"),
        "temporal": temporal(&provenance["temporal"]),
        "outcome_description": provenance["outcome_description"],
        "spatial": spatial(&provenance["spatial"]),
        "event_outcome": reference(&provenance["event_outcome"], "pref_label"),
        "lifecycle_event": reference(&provenance["lifecycle_event"], "pref_label"),
        "variables": map_items(&provenance["variable"], variable),
        "is_associated_with": map_items(&provenance["was_associated_with"], |a| actor(a, &[])),
    })
}

/// Convert a V2 reference-data entry (`identifier`) into the V3 shape
/// (`url`). `label_key` names the member holding the label.
fn reference(reference: &Value, label_key: &str) -> Value {
    if !truthy(reference) {
        return Value::Null;
    }
    json!({
        "id": reference["id"],
        "url": reference["identifier"],
        "in_scheme": reference["in_scheme"],
        "pref_label": reference[label_key],
    })
}

fn project(project: &Value) -> Value {
    let funder_type = reference(&project["funder_type"], "pref_label");
    let funding_identifier = &project["has_funder_identifier"];
    let agencies: Vec<Value> = match project.get("has_funding_agency") {
        Some(agencies) => items(agencies).cloned().collect(),
        None => vec![Value::Null],
    };

    let funding: Vec<Value> = agencies
        .iter()
        .map(|org| {
            json!({
                "funder": {
                    "organization": organization(org),
                    "funder_type": funder_type,
                },
                "funding_identifier": funding_identifier,
            })
        })
        .collect();

    json!({
        "title": project["name"],
        "project_identifier": project["identifier"],
        "participating_organizations": map_items(&project["source_organization"], organization),
        "funding": funding,
    })
}

fn other_identifier(other: &Value) -> Value {
    json!({
        "notation": other["notation"],
        "identifier_type": reference(&other["type"], "pref_label"),
    })
}

fn entity(entity: &Value) -> Value {
    json!({
        "title": entity["title"],
        "description": entity["description"],
        "entity_identifier": entity["identifier"],
        "type": reference(&entity["type"], "pref_label"),
    })
}

fn relation(relation: &Value) -> Value {
    json!({
        "entity": entity(&relation["entity"]),
        "relation_type": reference(&relation["relation_type"], "pref_label"),
    })
}

fn remote_url(url: &Value) -> Value {
    if truthy(&url["identifier"]) {
        url["identifier"].clone()
    } else {
        Value::Null
    }
}

fn remote_resource(resource: &Value) -> Value {
    let in_english = |v: &Value| if truthy(v) { json!({"en": v}) } else { Value::Null };
    json!({
        "title": in_english(&resource["title"]),
        "description": in_english(&resource["description"]),
        "checksum": checksum(&resource["checksum"], "checksum_value"),
        "mediatype": resource["mediatype"],
        "use_category": reference(&resource["use_category"], "pref_label"),
        "file_type": reference(&resource["file_type"], "pref_label"),
        "access_url": remote_url(&resource["access_url"]),
        "download_url": remote_url(&resource["download_url"]),
    })
}

/// `{"algorithm": "SHA-256", "value": "ABC"}` becomes `"sha256:abc"`.
fn checksum(checksum: &Value, value_key: &str) -> Value {
    if !truthy(checksum) {
        return Value::Null;
    }
    let algorithm = checksum["algorithm"]
        .as_str()
        .unwrap_or_default()
        .to_lowercase()
        .replace('-', "");
    let value = checksum[value_key].as_str().unwrap_or_default().to_lowercase();
    json!(format!("{}:{}", algorithm, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    mod contract {
        use super::*;

        #[test]
        fn moves_contract_json_to_top_level() {
            let v2 = json!({
                "date_modified": "2023-01-02",
                "date_created": "2023-01-01",
                "service_created": "tpas",
                "contract_json": {
                    "identifier": "urn:uuid:abcd1234",
                    "title": "Testisopimus",
                    "quota": 111204,
                    "organization": {"name": "Testiorganisaatio"},
                    "validity": {"start_date": "2014-01-17"}
                }
            });
            assert_eq!(
                contract(&v2),
                json!({
                    "modified": "2023-01-02",
                    "created": "2023-01-01",
                    "service": "tpas",
                    "id": "urn:uuid:abcd1234",
                    "contract_identifier": "urn:uuid:abcd1234",
                    "title": {"und": "Testisopimus"},
                    "quota": 111204,
                    "organization": {"name": "Testiorganisaatio"},
                    "validity": {"start_date": "2014-01-17"}
                })
            );
        }
    }

    mod file {
        use super::*;

        #[test]
        fn converts_storage_checksum_and_characteristics() {
            let v2 = json!({
                "identifier": "pid:urn:1",
                "file_storage": {"identifier": "urn:nbn:fi:att:file-storage-pas"},
                "file_path": "/path/to/file",
                "file_name": "file",
                "byte_size": 1024,
                "checksum": {"algorithm": "SHA-256", "value": "ABCDEF"},
                "service_created": "tpas",
                "project_identifier": "project",
                "file_characteristics": {
                    "title": "Plain Text",
                    "file_format": "text/plain",
                    "format_version": "",
                    "encoding": "UTF-8"
                },
                "file_characteristics_extension": {"streams": {}}
            });
            let converted = file(&v2, &Value::Null);
            assert_eq!(
                converted,
                json!({
                    "id": "pid:urn:1",
                    "storage_identifier": "urn:nbn:fi:att:file-storage-pas",
                    "pathname": "/path/to/file",
                    "filename": "file",
                    "size": 1024,
                    "checksum": "sha256:abcdef",
                    "storage_service": "pas",
                    "csc_project": "project",
                    "characteristics": {
                        "encoding": "UTF-8",
                        "file_format_version": {
                            "pref_label": "Plain Text",
                            "file_format": "text/plain",
                            "format_version": ""
                        }
                    },
                    "characteristics_extension": {"streams": {}}
                })
            );
        }

        #[test]
        fn characteristics_extension_is_always_present() {
            let converted = file(&json!({"identifier": "f"}), &Value::Null);
            assert_eq!(
                converted,
                json!({"id": "f", "characteristics_extension": null})
            );
        }

        #[test]
        fn use_category_comes_from_research_dataset() {
            let rd_file = json!({
                "identifier": "f",
                "title": "File title",
                "use_category": {
                    "identifier": "http://uri.suomi.fi/codelist/fairdata/use_category/code/source",
                    "pref_label": {"en": "Source material"}
                }
            });
            let converted = file(&json!({"identifier": "f"}), &rd_file);
            assert_eq!(
                converted["dataset_metadata"],
                json!({
                    "title": "File title",
                    "use_category": {
                        "url": "http://uri.suomi.fi/codelist/fairdata/use_category/code/source",
                        "pref_label": {"en": "Source material"}
                    }
                })
            );
        }
    }

    mod dataset {
        use super::*;

        fn v2_dataset() -> Value {
            json!({
                "identifier": "dataset_identifier",
                "date_created": "2023-01-01T00:00:00Z",
                "date_modified": "2023-02-01T00:00:00Z",
                "metadata_provider_user": "service_tpas",
                "metadata_provider_org": "service_tpas",
                "data_catalog": {"identifier": "urn:nbn:fi:att:data-catalog-pas"},
                "contract": {"identifier": "agreement:identifier1"},
                "preservation_state": 75,
                "preservation_description": "preservation_description",
                "preservation_dataset_version": {
                    "identifier": "pas_version_identifier",
                    "preferred_identifier": "doi:pas_version_preferred_identifier",
                    "preservation_state": 75
                },
                "research_dataset": {
                    "preferred_identifier": "doi:test",
                    "title": {"en": "Wonderful Title"},
                    "total_files_byte_size": 300,
                    "files": [{"identifier": "f1", "details": {"project_identifier": "project_x"}}],
                    "creator": [
                        {"@type": "Person", "name": "Teppo Testaaja",
                         "member_of": {"@type": "Organization", "identifier": "org_id_csc",
                                       "name": {"en": "CSC"}}}
                    ],
                    "publisher": {"@type": "Person", "name": "Teppo Testaaja",
                         "member_of": {"@type": "Organization", "identifier": "org_id_csc",
                                       "name": {"en": "CSC"}}},
                    "language": [{"identifier": "http://lexvo.org/id/iso639-3/eng",
                                  "title": {"en": "English"}}],
                    "access_rights": {"license": [{"title": {"en": "Other"}}]},
                    "version": "version"
                }
            })
        }

        #[test]
        fn top_level_fields() {
            let converted = dataset(&v2_dataset(), None);
            assert_eq!(converted["id"], "dataset_identifier");
            assert_eq!(converted["created"], "2023-01-01T00:00:00Z");
            assert_eq!(converted["api_version"], 1);
            assert_eq!(converted["data_catalog"], "urn:nbn:fi:att:data-catalog-pas");
            assert_eq!(
                converted["metadata_owner"],
                json!({"user": "service_tpas", "organization": "service_tpas"})
            );
            assert_eq!(converted["persistent_identifier"], "doi:test");
            assert_eq!(converted["version"], "version");
            assert!(converted.get("deprecated").is_none());
            assert!(converted.get("theme").is_none(), "empty lists are dropped");
        }

        #[test]
        fn preservation_block() {
            let converted = dataset(&v2_dataset(), None);
            assert_eq!(
                converted["preservation"],
                json!({
                    "contract": "agreement:identifier1",
                    "state": 75,
                    "description": "preservation_description",
                    "dataset_version": {
                        "id": "pas_version_identifier",
                        "persistent_identifier": "doi:pas_version_preferred_identifier",
                        "preservation_state": 75
                    }
                })
            );
        }

        #[test]
        fn identical_actors_merge_roles() {
            let converted = dataset(&v2_dataset(), None);
            let actors = converted["actors"].as_array().unwrap();
            assert_eq!(actors.len(), 1);
            assert_eq!(actors[0]["roles"], json!(["creator", "publisher"]));
            assert_eq!(actors[0]["person"]["name"], "Teppo Testaaja");
            assert_eq!(actors[0]["organization"]["url"], "org_id_csc");
        }

        #[test]
        fn license_without_identifier_is_not_specified() {
            let converted = dataset(&v2_dataset(), None);
            assert_eq!(
                converted["access_rights"]["license"],
                json!([{"url": UNSPECIFIED_LICENSE, "title": {"en": "Other"}}])
            );
        }

        #[test]
        fn language_label_comes_from_title() {
            let converted = dataset(&v2_dataset(), None);
            assert_eq!(
                converted["language"],
                json!([{"url": "http://lexvo.org/id/iso639-3/eng",
                        "pref_label": {"en": "English"}}])
            );
        }

        #[test]
        fn fileset_project_from_files_then_hint() {
            let converted = dataset(&v2_dataset(), Some("ignored"));
            assert_eq!(
                converted["fileset"],
                json!({"csc_project": "project_x", "total_files_size": 300})
            );

            let mut without_files = v2_dataset();
            without_files["research_dataset"]
                .as_object_mut()
                .unwrap()
                .remove("files");
            assert!(needs_project_lookup(&without_files));
            let converted = dataset(&without_files, Some("hinted"));
            assert_eq!(converted["fileset"]["csc_project"], "hinted");
        }

        #[test]
        fn deprecated_falls_back_to_modification_date() {
            let mut v2 = v2_dataset();
            v2["deprecated"] = json!(true);
            assert_eq!(dataset(&v2, None)["deprecated"], "2023-02-01T00:00:00Z");

            v2["date_deprecated"] = json!("2023-03-01T00:00:00Z");
            assert_eq!(dataset(&v2, None)["deprecated"], "2023-03-01T00:00:00Z");
        }
    }

    #[test]
    fn directory_files_response() {
        let v2 = json!({
            "directory_path": "/test",
            "directories": [{"directory_name": "sub", "byte_size": 10,
                             "file_count": 1, "directory_path": "/test/sub"}],
            "files": [{"identifier": "f1", "file_name": "a.txt", "byte_size": 10}]
        });
        assert_eq!(
            directory_files(&v2),
            json!({
                "count": null,
                "next": null,
                "previous": null,
                "results": {
                    "directory": {"pathname": "/test"},
                    "directories": [{"name": "sub", "size": 10, "file_count": 1,
                                     "pathname": "/test/sub"}],
                    "files": [{"id": "f1", "filename": "a.txt", "size": 10}]
                }
            })
        );
    }

    #[test]
    fn checksum_normalization() {
        assert_eq!(
            checksum(&json!({"algorithm": "MD5", "value": "2D6F"}), "value"),
            json!("md5:2d6f")
        );
        assert_eq!(checksum(&Value::Null, "value"), Value::Null);
    }
}
