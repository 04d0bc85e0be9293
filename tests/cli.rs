//! Integration tests for the `metax_access` binary.
//!
//! Every test runs with an empty temporary home directory so that the
//! developer's own configuration never leaks in.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn metax_access(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("metax_access").unwrap();
    cmd.env("HOME", home)
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("METAX_ACCESS_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Write `~/.metax.toml` pointing at `url`.
fn write_home_config(home: &Path, url: &str) {
    let config = format!(
        "[metax]\nurl = \"{}\"\nuser = \"tpas\"\npassword = \"pw\"\napi_version = \"v3\"\n",
        url
    );
    std::fs::write(home.join(".metax.toml"), config).unwrap();
}

mod usage {
    use super::*;

    #[test]
    fn help_lists_commands() {
        let home = TempDir::new().unwrap();
        metax_access(home.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("datacite"))
            .stdout(predicate::str::contains("post"));
    }

    #[test]
    fn completion_needs_no_connection() {
        let home = TempDir::new().unwrap();
        metax_access(home.path())
            .args(["completion", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("metax_access"));
    }

    #[test]
    fn missing_host_is_usage_error() {
        let home = TempDir::new().unwrap();
        metax_access(home.path())
            .args(["get", "dataset", "ds1", "-u", "tpas", "-p", "pw"])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Metax hostname must be provided."));
    }

    #[test]
    fn missing_credentials_is_usage_error() {
        let home = TempDir::new().unwrap();
        metax_access(home.path())
            .args(["get", "dataset", "ds1", "--host", "https://metax.localhost"])
            .write_stdin("")
            .assert()
            .code(2)
            .stderr(predicate::str::contains(
                "Username and password or access token must be provided.",
            ));
    }

    #[test]
    fn missing_config_file_is_usage_error() {
        let home = TempDir::new().unwrap();
        let missing = home.path().join("nope.toml");
        metax_access(home.path())
            .args(["get", "dataset", "ds1", "--config"])
            .arg(&missing)
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not found."));
    }

    #[test]
    fn unknown_resource_is_rejected() {
        let home = TempDir::new().unwrap();
        metax_access(home.path())
            .args(["get", "directory", "d1"])
            .assert()
            .code(2);
    }

    #[test]
    fn invalid_config_is_reported() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join(".metax.toml"), "[metax]\napi_version = \"v9\"\n").unwrap();
        metax_access(home.path())
            .args(["get", "dataset", "ds1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("v9"));
    }
}

mod commands {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn get_prints_normalized_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/datasets/ds1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ds1",
                "title": {"en": "Test dataset"},
                "preservation": null
            })))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());

        metax_access(home.path())
            .args(["get", "dataset", "ds1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("    \"id\": \"ds1\""))
            .stdout(predicate::str::contains("\"state\": -1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn get_writes_output_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/files/f1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "f1",
                "pathname": "/a.txt"
            })))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());
        let output = home.path().join("file.json");

        metax_access(home.path())
            .args(["get", "file", "f1", "--output"])
            .arg(&output)
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written["pathname"], "/a.txt");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn flags_override_config_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/contracts/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c1",
                "title": {"und": "Sopimus"}
            })))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), "https://unreachable.invalid");

        metax_access(home.path())
            .args(["get", "contract", "c1", "--host", &server.uri()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Sopimus"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn missing_resource_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/files/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());

        metax_access(home.path())
            .args(["get", "file", "nope"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("File not found"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn post_list_uses_bulk_endpoint() {
        let server = MockServer::start().await;
        let files = json!([{"id": "f1", "pathname": "/a.txt"}, {"id": "f2", "pathname": "/b.txt"}]);
        Mock::given(method("POST"))
            .and(path("/v3/files/post-many"))
            .and(body_json(files.clone()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": [], "failed": []})))
            .expect(1)
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());
        let input = home.path().join("files.json");
        std::fs::write(&input, files.to_string()).unwrap();

        metax_access(home.path())
            .args(["post", "file"])
            .arg(&input)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"failed\": []"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn patch_sends_file_contents() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v3/datasets/ds1"))
            .and(body_json(json!({"title": {"en": "New title"}})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "ds1"})))
            .expect(1)
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());
        let input = home.path().join("patch.json");
        std::fs::write(&input, r#"{"title": {"en": "New title"}}"#).unwrap();

        metax_access(home.path())
            .args(["patch", "dataset", "ds1"])
            .arg(&input)
            .assert()
            .success();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_reports_resource() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v3/datasets/ds1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());

        metax_access(home.path())
            .args(["delete", "dataset", "ds1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Deleted dataset ds1"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn datacite_prints_xml() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/datasets/ds1/metadata-download"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<resource/>\n"))
            .mount(&server)
            .await;
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), &server.uri());

        metax_access(home.path())
            .args(["datacite", "ds1", "--dummy-doi"])
            .assert()
            .success()
            .stdout("<resource/>\n");
    }

    #[test]
    fn unreadable_input_fails() {
        let home = TempDir::new().unwrap();
        write_home_config(home.path(), "https://metax.localhost");

        metax_access(home.path())
            .args(["post", "dataset"])
            .arg(home.path().join("missing.json"))
            .assert()
            .code(1)
            .stderr(predicate::str::contains("missing.json"));
    }
}
