//! client
//!
//! Access to the Metax REST API.
//!
//! # Architecture
//!
//! The `MetaxApi` trait defines every operation the preservation services
//! need. Callers obtain an implementation from [`create_client`], which picks
//! the backend for the configured API version, and never import a backend
//! directly.
//!
//! # Modules
//!
//! - `traits`: the `MetaxApi` trait and `DatasetQuery`
//! - [`http`]: authenticated request plumbing shared by both backends
//! - [`v3`]: Metax V3, the native layout
//! - [`v2`]: Metax V2, converted to and from the V3 layout
//! - `factory`: API version selection
//!
//! # Example
//!
//! ```ignore
//! use metax_access::client::{create_client, MetaxApi};
//!
//! let metax = create_client(&config)?;
//! let dataset = metax.get_dataset("urn:nbn:fi:att:1234").await?;
//! println!("{}", dataset.preservation.state);
//! ```

mod factory;
pub mod http;
mod traits;
pub mod v2;
pub mod v3;

pub use factory::{create_client, valid_version_names, ApiVersion};
pub use traits::*;
pub use v2::V2Client;
pub use v3::V3Client;

use std::sync::OnceLock;

use regex::RegexSet;
use serde_json::Value;

/// Messages Metax uses to reject a file that is already stored.
const ALREADY_EXISTS_PATTERNS: [&str; 3] = [
    r"(?i)a file with path .* already exists in project .*",
    r"(?i)a file with given identifier already exists",
    r"(?i)a file with the same value already exists",
];

static ALREADY_EXISTS: OnceLock<RegexSet> = OnceLock::new();

fn already_exists_set() -> &'static RegexSet {
    ALREADY_EXISTS.get_or_init(|| {
        RegexSet::new(ALREADY_EXISTS_PATTERNS).expect("already-exists patterns are valid")
    })
}

/// Whether every error in a rejected file post says the file already exists.
///
/// `body` is the 400 response. Bulk posts list the rejections under
/// `failed`, each with an `errors` object; a single post answers with the
/// `errors` object directly. Error values are a message or a list of
/// messages. A body without any message is not treated as a duplicate.
pub(crate) fn only_already_exists(body: &Value) -> bool {
    let mut messages = Vec::new();
    match body.get("failed") {
        Some(Value::Array(failed)) => {
            for entry in failed {
                collect_messages(&entry["errors"], &mut messages);
            }
        }
        _ => collect_messages(body, &mut messages),
    }

    let set = already_exists_set();
    !messages.is_empty() && messages.iter().all(|m| set.is_match(m))
}

fn collect_messages<'a>(errors: &'a Value, out: &mut Vec<&'a str>) {
    match errors {
        Value::String(message) => out.push(message),
        Value::Array(list) => list.iter().for_each(|v| collect_messages(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_messages(v, out)),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod already_exists {
        use super::*;

        #[test]
        fn bulk_failures_all_duplicates() {
            let body = json!({
                "success": [],
                "failed": [
                    {"object": {}, "errors": {"pathname": ["A file with path /a already exists in project p"]}},
                    {"object": {}, "errors": {"id": "A file with given identifier already exists"}}
                ]
            });
            assert!(only_already_exists(&body));
        }

        #[test]
        fn single_failure_shape() {
            let body = json!({"storage_identifier": ["A file with the same value already exists"]});
            assert!(only_already_exists(&body));
        }

        #[test]
        fn other_error_is_not_duplicate() {
            let body = json!({
                "failed": [
                    {"errors": {"pathname": ["a file with path /a already exists in project p"]}},
                    {"errors": {"checksum": ["This field is required."]}}
                ]
            });
            assert!(!only_already_exists(&body));
        }

        #[test]
        fn empty_body_is_not_duplicate() {
            assert!(!only_already_exists(&json!({})));
            assert!(!only_already_exists(&json!({"failed": []})));
        }
    }
}
