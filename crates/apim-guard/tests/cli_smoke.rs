// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_apim-guard"))
}

#[test]
fn help_lists_commands() {
    let output = bin().arg("--help").output().expect("help");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.contains("validate"));
    assert!(text.contains("kinds"));
    assert!(text.contains("named-values"));
}

#[test]
fn kinds_text_covers_all_resource_kinds() {
    let output = bin().arg("kinds").output().expect("kinds");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    assert_eq!(text.lines().count(), 5);
    assert!(text.contains("api\tapis"));
    assert!(text.contains("version_set\tversion sets"));
}

#[test]
fn kinds_json_is_parseable() {
    let output = bin()
        .args(["kinds", "--format", "json"])
        .output()
        .expect("kinds json");
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let rows = payload["kinds"].as_array().expect("kinds rows");
    assert_eq!(rows.len(), 5);
}

#[test]
fn named_values_prints_discovered_catalog() {
    let temp = TempDir::new().expect("tempdir");
    let nv_dir = temp.path().join("external/base/named values/api-key");
    fs::create_dir_all(&nv_dir).expect("mkdir");
    fs::write(
        nv_dir.join("namedValueInformation.json"),
        r#"{"properties": {"displayName": "ExternalApiKey", "value": "v", "secret": true, "tags": []}}"#,
    )
    .expect("write");
    let output = bin()
        .arg("named-values")
        .arg(temp.path())
        .output()
        .expect("named-values");
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).expect("utf8");
    assert!(text.contains("api-key"));
    assert!(text.contains("ExternalApiKey"));
}

#[test]
fn quiet_suppresses_rendered_output() {
    let output = bin().args(["--quiet", "kinds"]).output().expect("kinds");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
