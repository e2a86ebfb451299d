#![forbid(unsafe_code)]

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

fn is_segment(input: &str) -> bool {
    !input.is_empty()
        && input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// Audience-facing partition of the catalog (`external`, `internal`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Journey(String);

impl Journey {
    pub fn parse(value: &str) -> Result<Self, String> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err("journey cannot be empty".to_string());
        }
        if !is_segment(raw) {
            return Err(format!(
                "invalid journey `{raw}`: expected a lowercase path segment"
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Journey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deployment stage segment (`base`, `dev`, `test`, `pre`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment(String);

impl Environment {
    pub fn parse(value: &str) -> Result<Self, String> {
        let raw = value.trim();
        if raw.is_empty() {
            return Err("environment cannot be empty".to_string());
        }
        if !is_segment(raw) {
            return Err(format!(
                "invalid environment `{raw}`: expected a lowercase path segment"
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub code: String,
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn error(code: impl Into<String>, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn warning(
        code: impl Into<String>,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            code: code.into(),
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Api,
    Product,
    ProductApiLink,
    VersionSet,
    NamedValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    ApiInformation,
    Specification,
    Policy,
    ProductInformation,
    ProductApiLinks,
    VersionSetInformation,
    NamedValueInformation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Required,
    Optional,
}

/// One expected file inside a resource directory. The first variant is the
/// canonical name used in missing-file messages; matching is case-insensitive
/// across all variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredFile {
    pub kind: FileKind,
    pub variants: &'static [&'static str],
    pub requirement: Requirement,
}

impl RequiredFile {
    pub fn primary(&self) -> &'static str {
        self.variants[0]
    }

    pub fn is_required(&self) -> bool {
        self.requirement == Requirement::Required
    }
}

const API_FILES: &[RequiredFile] = &[
    RequiredFile {
        kind: FileKind::ApiInformation,
        variants: &["apiInformation.json"],
        requirement: Requirement::Required,
    },
    RequiredFile {
        kind: FileKind::Specification,
        variants: &[
            "specification.yaml",
            "specification.yml",
            "openapi.yaml",
            "openapi.yml",
        ],
        requirement: Requirement::Required,
    },
    RequiredFile {
        kind: FileKind::Policy,
        variants: &["policy.xml", "apiPolicy.xml"],
        requirement: Requirement::Optional,
    },
];

const PRODUCT_FILES: &[RequiredFile] = &[
    RequiredFile {
        kind: FileKind::ProductInformation,
        variants: &["productInformation.json"],
        requirement: Requirement::Required,
    },
    RequiredFile {
        kind: FileKind::Policy,
        variants: &["policy.xml", "productPolicy.xml"],
        requirement: Requirement::Optional,
    },
];

const PRODUCT_API_LINK_FILES: &[RequiredFile] = &[RequiredFile {
    kind: FileKind::ProductApiLinks,
    variants: &["productApis.json", "productApiLinks.json"],
    requirement: Requirement::Required,
}];

const VERSION_SET_FILES: &[RequiredFile] = &[RequiredFile {
    kind: FileKind::VersionSetInformation,
    variants: &["versionSetInformation.json", "apiVersionSetInformation.json"],
    requirement: Requirement::Required,
}];

const NAMED_VALUE_FILES: &[RequiredFile] = &[RequiredFile {
    kind: FileKind::NamedValueInformation,
    variants: &["namedValueInformation.json", "namedValue.json"],
    requirement: Requirement::Required,
}];

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Api,
        ResourceKind::Product,
        ResourceKind::ProductApiLink,
        ResourceKind::VersionSet,
        ResourceKind::NamedValue,
    ];

    /// Physical directory name under `<journey>/<environment>/`. Product and
    /// ProductApiLink share the `products` directory.
    pub fn dir_name(self) -> &'static str {
        match self {
            ResourceKind::Api => "apis",
            ResourceKind::Product | ResourceKind::ProductApiLink => "products",
            ResourceKind::VersionSet => "version sets",
            ResourceKind::NamedValue => "named values",
        }
    }

    pub fn required_files(self) -> &'static [RequiredFile] {
        match self {
            ResourceKind::Api => API_FILES,
            ResourceKind::Product => PRODUCT_FILES,
            ResourceKind::ProductApiLink => PRODUCT_API_LINK_FILES,
            ResourceKind::VersionSet => VERSION_SET_FILES,
            ResourceKind::NamedValue => NAMED_VALUE_FILES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Api => "api",
            ResourceKind::Product => "product",
            ResourceKind::ProductApiLink => "product_api_link",
            ResourceKind::VersionSet => "version_set",
            ResourceKind::NamedValue => "named_value",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directory the walker expects to validate:
/// `<root>/<journey>/<environment>/<kind dir>/<name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTarget {
    pub journey: Journey,
    pub environment: Environment,
    pub kind: ResourceKind,
    pub name: String,
}

impl ValidationTarget {
    pub fn rel_dir(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.journey,
            self.environment,
            self.kind.dir_name(),
            self.name
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetOutcome {
    pub journey: String,
    pub environment: String,
    pub kind: ResourceKind,
    pub name: String,
    pub status: TargetStatus,
    pub errors: u64,
    pub warnings: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueTotals {
    pub errors: u64,
    pub warnings: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub timestamp: String,
    pub root_path: String,
    pub journeys: Vec<String>,
    pub environments: Vec<String>,
    pub targets: Vec<TargetOutcome>,
    pub issues: Vec<Issue>,
    pub totals: IssueTotals,
}

pub fn report_json_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "apim-guard validation report",
        "type": "object",
        "required": ["timestamp", "root_path", "journeys", "environments", "targets", "issues", "totals"],
        "properties": {
            "timestamp": {"type": "string"},
            "root_path": {"type": "string"},
            "journeys": {"type": "array", "items": {"type": "string"}},
            "environments": {"type": "array", "items": {"type": "string"}},
            "targets": {"type": "array"},
            "issues": {
                "type": "array",
                "items": {
                    "type": "object",
                    "required": ["severity", "code", "path", "message"],
                    "properties": {
                        "severity": {"enum": ["warning", "error"]},
                        "code": {"type": "string"},
                        "path": {"type": "string"},
                        "message": {"type": "string"}
                    }
                }
            },
            "totals": {
                "type": "object",
                "required": ["errors", "warnings"],
                "properties": {
                    "errors": {"type": "integer", "minimum": 0},
                    "warnings": {"type": "integer", "minimum": 0}
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journey_validation() {
        assert!(Journey::parse("external").is_ok());
        assert!(Journey::parse("address-lookup").is_ok());
        assert!(Journey::parse("External").is_err());
        assert!(Journey::parse("").is_err());
    }

    #[test]
    fn environment_validation() {
        assert!(Environment::parse("base").is_ok());
        assert!(Environment::parse("pre").is_ok());
        assert!(Environment::parse("PRE").is_err());
    }

    #[test]
    fn product_kinds_share_directory() {
        assert_eq!(ResourceKind::Product.dir_name(), "products");
        assert_eq!(ResourceKind::ProductApiLink.dir_name(), "products");
        assert_eq!(ResourceKind::VersionSet.dir_name(), "version sets");
    }

    #[test]
    fn every_kind_declares_a_required_file() {
        for kind in ResourceKind::ALL {
            assert!(
                kind.required_files().iter().any(RequiredFile::is_required),
                "{kind} has no required file"
            );
        }
    }

    #[test]
    fn target_rel_dir_layout() {
        let target = ValidationTarget {
            journey: Journey::parse("external").expect("journey"),
            environment: Environment::parse("base").expect("environment"),
            kind: ResourceKind::Api,
            name: "address-lookup-v10".to_string(),
        };
        assert_eq!(target.rel_dir(), "external/base/apis/address-lookup-v10");
    }

    #[test]
    fn severity_orders_error_above_warning() {
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn report_schema_contains_required_fields() {
        let schema = report_json_schema();
        let required = schema.get("required").map(Value::to_string).unwrap_or_default();
        assert!(required.contains("timestamp"));
        assert!(required.contains("root_path"));
        assert!(required.contains("issues"));
        assert!(required.contains("totals"));
    }
}
