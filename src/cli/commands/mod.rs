//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Reads its input file, if any
//! 2. Calls the Metax client
//! 3. Prints the result
//!
//! # Async Commands
//!
//! Every command except `completion` talks to Metax, so handlers are async
//! and [`dispatch`] is awaited on the runtime created by [`crate::cli::run`].

mod completion;
mod datacite;
mod delete;
mod get;
mod patch;
mod post;

pub use completion::completion;
pub use datacite::datacite;
pub use delete::delete;
pub use get::get;
pub use patch::patch;
pub use post::post;

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::cli::args::Command;
use crate::client::MetaxApi;

/// Dispatch a command to its handler.
pub async fn dispatch(command: Command, metax: &dyn MetaxApi) -> Result<()> {
    match command {
        Command::Post { resource, filepath } => post::post(metax, resource, &filepath).await,
        Command::Get {
            resource,
            identifier,
            output,
        } => get::get(metax, resource, &identifier, output.as_deref()).await,
        Command::Delete {
            resource,
            identifier,
        } => delete::delete(metax, resource, &identifier).await,
        Command::Patch {
            resource,
            identifier,
            filepath,
        } => patch::patch(metax, resource, &identifier, &filepath).await,
        Command::Datacite { dataset, dummy_doi } => {
            datacite::datacite(metax, &dataset, dummy_doi).await
        }
        Command::Completion { shell } => completion::completion(shell),
    }
}

/// Read a JSON document from a file.
pub(crate) fn read_json(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))
}

/// Render a value as JSON indented by four spaces.
pub(crate) fn to_pretty_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .context("failed to serialize JSON")?;
    String::from_utf8(buffer).context("serialized JSON is not UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn pretty_json_uses_four_spaces() {
        let rendered = to_pretty_json(&json!({"a": {"b": 1}})).unwrap();
        assert_eq!(rendered, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn read_json_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));

        let missing = temp.path().join("missing.json");
        assert!(read_json(&missing).is_err());
    }
}
