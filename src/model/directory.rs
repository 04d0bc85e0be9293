//! model::directory
//!
//! Directory listings.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Content of a single directory: the directory itself plus its direct
/// children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryFiles {
    pub directory: Option<DirectoryInfo>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub files: Vec<DirectoryFile>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub directories: Vec<DirectoryEntry>,
}

impl DirectoryFiles {
    /// Listing of a directory that does not exist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Append the children of another page of the same directory.
    pub fn merge(&mut self, page: DirectoryFiles) {
        if self.directory.is_none() {
            self.directory = page.directory;
        }
        self.files.extend(page.files);
        self.directories.extend(page.directories);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryInfo {
    pub pathname: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryFile {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    pub filename: Option<String>,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    pub name: Option<String>,
    pub size: Option<u64>,
    pub file_count: Option<u64>,
    pub pathname: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_listing_shape() {
        assert_eq!(
            serde_json::to_value(DirectoryFiles::empty()).unwrap(),
            json!({"directory": null, "files": [], "directories": []})
        );
    }

    #[test]
    fn merge_concatenates_children() {
        let mut first: DirectoryFiles = serde_json::from_value(json!({
            "directory": {"pathname": "/test_dir", "size": 10},
            "files": [{"id": "file1", "filename": "a.txt", "size": 1}],
            "directories": []
        }))
        .unwrap();
        let second: DirectoryFiles = serde_json::from_value(json!({
            "directory": {"pathname": "/test_dir"},
            "files": [{"id": "file2", "filename": "b.txt", "size": 2}],
            "directories": [{"name": "sub", "size": 0, "file_count": 0, "pathname": "/test_dir/sub"}]
        }))
        .unwrap();

        first.merge(second);
        assert_eq!(first.files.len(), 2);
        assert_eq!(first.directories.len(), 1);
        assert_eq!(
            first.directory.and_then(|d| d.pathname).as_deref(),
            Some("/test_dir")
        );
    }
}
