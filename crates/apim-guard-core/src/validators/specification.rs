//! Shallow structural checks for OpenAPI specification documents.

use apim_guard_model::Issue;
use serde_yaml::Value;

use super::file_name;
use crate::FileContext;

fn top_level<'a>(doc: &'a Value, key: &str) -> Option<&'a Value> {
    doc.get(key)
}

fn non_empty_scalar(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Number(_)) => true,
        _ => false,
    }
}

/// BOM-tolerant: extraction tooling regularly emits UTF-8 specifications with
/// a leading byte-order mark, which must not fail the version-key match.
pub fn check_specification(_ctx: &FileContext<'_>, text: &str, rel_path: &str) -> Vec<Issue> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let doc: Value = match serde_yaml::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            return vec![Issue::error(
                "SPECIFICATION_INVALID_YAML",
                rel_path,
                format!("invalid YAML format: {err}"),
            )]
        }
    };
    if doc.as_mapping().is_none() {
        return vec![Issue::error(
            "SPECIFICATION_NOT_MAPPING",
            rel_path,
            format!(
                "Expected a YAML mapping at the top level of {}",
                file_name(rel_path)
            ),
        )];
    }
    let mut issues = Vec::new();
    if !non_empty_scalar(top_level(&doc, "openapi")) && !non_empty_scalar(top_level(&doc, "swagger"))
    {
        issues.push(Issue::error(
            "SPECIFICATION_VERSION_MISSING",
            rel_path,
            format!(
                "Missing 'openapi' or 'swagger' version key in {}",
                file_name(rel_path)
            ),
        ));
    }
    for section in ["info", "paths"] {
        if top_level(&doc, section).is_none() {
            issues.push(Issue::error(
                "SPECIFICATION_SECTION_MISSING",
                rel_path,
                format!("Missing '{section}' in {}", file_name(rel_path)),
            ));
        }
    }
    issues
}
