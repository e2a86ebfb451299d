//! Policy document checks: XML structure plus named-value placeholder
//! cross-referencing.

use apim_guard_model::{Issue, Severity};
use roxmltree::{Document, Node};

use super::file_name;
use crate::catalog::placeholder_idents;
use crate::{FileContext, PolicySections};

const OUTER_SECTIONS: [&str; 2] = ["outbound", "on-error"];

fn child_element<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn has_base_pass_through(section: Node<'_, '_>) -> bool {
    child_element(section, "base").is_some()
}

fn check_section(
    issues: &mut Vec<Issue>,
    root: Node<'_, '_>,
    rel_path: &str,
    name: &str,
    missing_severity: Severity,
    base_severity: Severity,
) {
    match child_element(root, name) {
        None => issues.push(Issue {
            severity: missing_severity,
            code: "POLICY_SECTION_MISSING".to_string(),
            path: rel_path.to_string(),
            message: format!("Missing '{name}' section in {}", file_name(rel_path)),
        }),
        Some(section) => {
            if !has_base_pass_through(section) {
                issues.push(Issue {
                    severity: base_severity,
                    code: "POLICY_BASE_MISSING".to_string(),
                    path: rel_path.to_string(),
                    message: format!(
                        "Section '{name}' has no '<base />' pass-through in {}",
                        file_name(rel_path)
                    ),
                });
            }
        }
    }
}

fn check_rate_limit(issues: &mut Vec<Issue>, doc: &Document<'_>, rel_path: &str) {
    for node in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "rate-limit")
    {
        if !node.has_attribute("calls") || !node.has_attribute("renewal-period") {
            issues.push(Issue::warning(
                "POLICY_RATE_LIMIT_INCOMPLETE",
                rel_path,
                format!(
                    "'rate-limit' is missing 'calls' or 'renewal-period' in {}",
                    file_name(rel_path)
                ),
            ));
        }
    }
}

fn check_validate_jwt(issues: &mut Vec<Issue>, doc: &Document<'_>, rel_path: &str) {
    for node in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "validate-jwt")
    {
        let has_token_source = node.has_attribute("header-name")
            || node.has_attribute("query-parameter-name")
            || node.has_attribute("token-value");
        let has_issuer_config =
            child_element(node, "openid-config").is_some() || child_element(node, "issuers").is_some();
        if !has_token_source || !has_issuer_config {
            issues.push(Issue::warning(
                "POLICY_JWT_INCOMPLETE",
                rel_path,
                format!(
                    "'validate-jwt' is missing a token source or issuer configuration in {}",
                    file_name(rel_path)
                ),
            ));
        }
    }
}

pub fn check_policy(ctx: &FileContext<'_>, text: &str, rel_path: &str) -> Vec<Issue> {
    let mut issues = Vec::new();
    match Document::parse(text) {
        Err(err) => issues.push(Issue::error(
            "POLICY_INVALID_XML",
            rel_path,
            format!("invalid XML format: {err}"),
        )),
        Ok(doc) => {
            let root = doc.root_element();
            if root.tag_name().name() != "policies" {
                issues.push(Issue::error(
                    "POLICY_ROOT_ELEMENT",
                    rel_path,
                    format!(
                        "Root element must be 'policies', found '{}' in {}",
                        root.tag_name().name(),
                        file_name(rel_path)
                    ),
                ));
            } else {
                let (outer_severity, base_severity) = match ctx.policy_sections {
                    PolicySections::Full => (Severity::Error, Severity::Error),
                    PolicySections::Inbound => (Severity::Warning, Severity::Warning),
                };
                check_section(&mut issues, root, rel_path, "inbound", Severity::Error, base_severity);
                for section in OUTER_SECTIONS {
                    check_section(&mut issues, root, rel_path, section, outer_severity, base_severity);
                }
                check_rate_limit(&mut issues, &doc, rel_path);
                check_validate_jwt(&mut issues, &doc, rel_path);
            }
        }
    }
    // Placeholders are scanned on the raw text so references still resolve
    // even when the XML itself fails to parse.
    for ident in placeholder_idents(text) {
        if !ctx.catalog.contains(&ident) {
            issues.push(Issue::warning(
                "NAMED_VALUE_UNKNOWN",
                rel_path,
                format!("Unknown Named Value reference '{{{{{ident}}}}}'"),
            ));
        }
    }
    issues
}
