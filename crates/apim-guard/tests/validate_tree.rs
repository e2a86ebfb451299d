// SPDX-License-Identifier: Apache-2.0

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_apim-guard"))
}

const VALID_API_INFO: &str = r#"{
    "properties": {
        "path": "address-lookup",
        "apiVersion": "v10",
        "apiVersionSetId": "address-lookup",
        "isCurrent": false,
        "displayName": "Address Lookup",
        "protocols": ["https"],
        "serviceUrl": "https://backend.example.net/address",
        "subscriptionRequired": false
    }
}"#;

const VALID_SPEC: &str = "openapi: 3.0.1\ninfo:\n  title: Address Lookup\npaths:\n  /addresses: {}\n";

const COMPLETE_POLICY: &str = "<policies><inbound><base /></inbound><outbound><base /></outbound><on-error><base /></on-error></policies>";

fn write_api(root: &Path, name: &str, info: &str, spec: &str, policy: &str) {
    let dir = root.join("external/base/apis").join(name);
    fs::create_dir_all(&dir).expect("mkdir");
    fs::write(dir.join("apiInformation.json"), info).expect("info");
    fs::write(dir.join("Specification.yaml"), spec).expect("spec");
    fs::write(dir.join("Policy.xml"), policy).expect("policy");
}

fn scenario_tree() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    write_api(
        temp.path(),
        "address-lookup-v10",
        VALID_API_INFO,
        "openapi: 3.0.1\ninfo:\n  title: Address Lookup\n",
        "<policies><inbound><base /></inbound></policies>",
    );
    temp
}

fn read_summary(path: &Path) -> serde_json::Value {
    let text = fs::read_to_string(path).expect("summary file");
    serde_json::from_str(&text).expect("summary json")
}

#[test]
fn address_lookup_scenario_exits_one_with_expected_totals() {
    let temp = scenario_tree();
    let log = temp.path().join("summary.json");
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .arg("--log-path")
        .arg(&log)
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(1));

    let summary = read_summary(&log);
    assert_eq!(summary["totals"]["errors"], 3);
    let issues = summary["issues"].as_array().expect("issues");
    let codes: Vec<&str> = issues
        .iter()
        .filter_map(|i| i["code"].as_str())
        .collect();
    assert_eq!(
        codes
            .iter()
            .filter(|c| **c == "SPECIFICATION_SECTION_MISSING")
            .count(),
        1
    );
    assert_eq!(
        codes
            .iter()
            .filter(|c| **c == "POLICY_SECTION_MISSING")
            .count(),
        2
    );
    assert!(codes.iter().all(|c| !c.starts_with("API_INFO")));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("summary: errors=3"));
}

#[test]
fn valid_tree_exits_zero_and_writes_summary() {
    let temp = TempDir::new().expect("tempdir");
    write_api(
        temp.path(),
        "address-lookup-v10",
        VALID_API_INFO,
        VALID_SPEC,
        COMPLETE_POLICY,
    );
    let log = temp.path().join("summary.json");
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .arg("--log-path")
        .arg(&log)
        .output()
        .expect("validate");
    assert_eq!(
        output.status.code(),
        Some(0),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary = read_summary(&log);
    assert_eq!(summary["totals"]["errors"], 0);
    assert_eq!(summary["targets"].as_array().map(Vec::len), Some(1));
    assert_eq!(summary["targets"][0]["status"], "pass");
}

#[test]
fn default_summary_file_lands_in_working_directory() {
    let temp = TempDir::new().expect("tempdir");
    write_api(
        temp.path(),
        "address-lookup-v10",
        VALID_API_INFO,
        VALID_SPEC,
        COMPLETE_POLICY,
    );
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .args(["--journey", "external", "--environment", "base"])
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(0));
    assert!(temp.path().join("apim-guard-summary.json").exists());
}

#[test]
fn unknown_placeholder_warns_without_failing_unless_escalated() {
    let temp = TempDir::new().expect("tempdir");
    write_api(
        temp.path(),
        "address-lookup-v10",
        VALID_API_INFO,
        VALID_SPEC,
        "<policies><inbound><base />{{UnknownValue}}</inbound><outbound><base /></outbound><on-error><base /></on-error></policies>",
    );
    let log = temp.path().join("summary.json");
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .arg("--log-path")
        .arg(&log)
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(0));
    let summary = read_summary(&log);
    let unknown = summary["issues"]
        .as_array()
        .expect("issues")
        .iter()
        .filter(|i| i["code"] == "NAMED_VALUE_UNKNOWN")
        .count();
    assert_eq!(unknown, 1);

    let escalated = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .arg("--fail-on-warning")
        .arg("--log-path")
        .arg(&log)
        .output()
        .expect("validate");
    assert_eq!(escalated.status.code(), Some(1));
}

#[test]
fn summaries_are_byte_identical_apart_from_timestamp() {
    let temp = scenario_tree();
    let first_log = temp.path().join("first.json");
    let second_log = temp.path().join("second.json");
    for log in [&first_log, &second_log] {
        let output = bin()
            .current_dir(temp.path())
            .arg("validate")
            .arg(temp.path())
            .args(["--journey", "external", "--environment", "base"])
            .arg("--log-path")
            .arg(log)
            .output()
            .expect("validate");
        assert_eq!(output.status.code(), Some(1));
    }
    let strip_timestamp = |text: String| -> String {
        text.lines()
            .filter(|line| !line.contains("\"timestamp\":"))
            .collect::<Vec<_>>()
            .join("\n")
    };
    let first = strip_timestamp(fs::read_to_string(&first_log).expect("first"));
    let second = strip_timestamp(fs::read_to_string(&second_log).expect("second"));
    assert_eq!(first, second);
}

#[test]
fn ci_output_renders_azure_pipelines_commands() {
    let temp = scenario_tree();
    let log = temp.path().join("summary.json");
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .args(["--output", "ci"])
        .arg("--log-path")
        .arg(&log)
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("##vso[task.logissue type=error;"));
    assert!(stderr.contains("##vso[task.complete result=Failed;]"));
}

#[test]
fn markdown_artifact_groups_targets() {
    let temp = scenario_tree();
    let log = temp.path().join("summary.json");
    let markdown = temp.path().join("report.md");
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .arg("--log-path")
        .arg(&log)
        .arg("--markdown-path")
        .arg(&markdown)
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(1));
    let table = fs::read_to_string(&markdown).expect("markdown");
    assert!(table.starts_with("| Journey | Environment |"));
    assert!(table.contains("| external | base | api | address-lookup-v10 | fail |"));
}

#[test]
fn missing_root_fails_with_an_error_issue() {
    let temp = TempDir::new().expect("tempdir");
    let log = temp.path().join("summary.json");
    let output = bin()
        .current_dir(temp.path())
        .arg("validate")
        .arg(temp.path().join("does-not-exist"))
        .arg("--log-path")
        .arg(&log)
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(1));
    let summary = read_summary(&log);
    assert_eq!(summary["issues"][0]["code"], "ROOT_NOT_FOUND");
}

#[test]
fn verbose_emits_log_records_on_stderr() {
    let temp = TempDir::new().expect("tempdir");
    write_api(
        temp.path(),
        "address-lookup-v10",
        VALID_API_INFO,
        VALID_SPEC,
        COMPLETE_POLICY,
    );
    let output = bin()
        .current_dir(temp.path())
        .args(["--verbose", "validate"])
        .arg(temp.path())
        .args(["--journey", "external", "--environment", "base"])
        .output()
        .expect("validate");
    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[info] VALIDATE_START:"));
    assert!(stderr.contains("[info] SUMMARY_WRITTEN:"));
}
