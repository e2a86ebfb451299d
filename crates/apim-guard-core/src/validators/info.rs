//! Shallow field rules for the JSON information documents.

use apim_guard_model::Issue;
use serde_json::Value;

use super::file_name;
use crate::fields;
use crate::FileContext;

#[derive(Debug, Clone, Copy)]
enum Rule {
    /// Strings need content, arrays and objects at least one element.
    NonEmpty,
    /// Anything but `null`/absent, so `false` and `[]` both satisfy it.
    Present,
}

struct RuleSet {
    invalid_code: &'static str,
    missing_code: &'static str,
    rules: &'static [(&'static str, Rule)],
}

const API_INFORMATION: RuleSet = RuleSet {
    invalid_code: "API_INFO_INVALID_JSON",
    missing_code: "API_INFO_FIELD_MISSING",
    rules: &[
        ("properties.path", Rule::NonEmpty),
        ("properties.apiVersion", Rule::NonEmpty),
        ("properties.apiVersionSetId", Rule::NonEmpty),
        ("properties.isCurrent", Rule::Present),
        ("properties.displayName", Rule::NonEmpty),
        ("properties.protocols", Rule::NonEmpty),
        ("properties.serviceUrl", Rule::NonEmpty),
        ("properties.subscriptionRequired", Rule::Present),
    ],
};

const PRODUCT_INFORMATION: RuleSet = RuleSet {
    invalid_code: "PRODUCT_INFO_INVALID_JSON",
    missing_code: "PRODUCT_INFO_FIELD_MISSING",
    rules: &[
        ("properties.description", Rule::NonEmpty),
        ("properties.state", Rule::NonEmpty),
        ("properties.subscriptionRequired", Rule::Present),
        ("properties.displayName", Rule::NonEmpty),
    ],
};

const VERSION_SET_INFORMATION: RuleSet = RuleSet {
    invalid_code: "VERSION_SET_INFO_INVALID_JSON",
    missing_code: "VERSION_SET_INFO_FIELD_MISSING",
    rules: &[
        ("properties.displayName", Rule::NonEmpty),
        ("properties.versioningScheme", Rule::NonEmpty),
    ],
};

const NAMED_VALUE_INFORMATION: RuleSet = RuleSet {
    invalid_code: "NAMED_VALUE_INFO_INVALID_JSON",
    missing_code: "NAMED_VALUE_INFO_FIELD_MISSING",
    rules: &[
        ("properties.secret", Rule::Present),
        ("properties.tags", Rule::Present),
        ("properties.value", Rule::NonEmpty),
        ("properties.displayName", Rule::NonEmpty),
    ],
};

fn check_info_document(text: &str, rel_path: &str, set: &RuleSet) -> Vec<Issue> {
    let doc: Value = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            return vec![Issue::error(
                set.invalid_code,
                rel_path,
                format!("invalid JSON format: {err}"),
            )]
        }
    };
    let mut issues = Vec::new();
    for (field, rule) in set.rules {
        let satisfied = match rule {
            Rule::NonEmpty => fields::is_non_empty(&doc, field),
            Rule::Present => fields::is_present(&doc, field),
        };
        if !satisfied {
            issues.push(Issue::error(
                set.missing_code,
                rel_path,
                format!("Missing '{field}' in {}", file_name(rel_path)),
            ));
        }
    }
    issues
}

pub fn check_api_information(_ctx: &FileContext<'_>, text: &str, rel_path: &str) -> Vec<Issue> {
    check_info_document(text, rel_path, &API_INFORMATION)
}

pub fn check_product_information(_ctx: &FileContext<'_>, text: &str, rel_path: &str) -> Vec<Issue> {
    check_info_document(text, rel_path, &PRODUCT_INFORMATION)
}

pub fn check_version_set_information(
    _ctx: &FileContext<'_>,
    text: &str,
    rel_path: &str,
) -> Vec<Issue> {
    check_info_document(text, rel_path, &VERSION_SET_INFORMATION)
}

pub fn check_named_value_information(
    _ctx: &FileContext<'_>,
    text: &str,
    rel_path: &str,
) -> Vec<Issue> {
    check_info_document(text, rel_path, &NAMED_VALUE_INFORMATION)
}
