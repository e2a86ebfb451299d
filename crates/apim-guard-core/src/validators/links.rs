//! Product-to-API link files: a JSON array of API resource names.

use apim_guard_model::Issue;
use serde_json::Value;

use super::file_name;
use crate::FileContext;

pub fn check_product_api_links(_ctx: &FileContext<'_>, text: &str, rel_path: &str) -> Vec<Issue> {
    let doc: Value = match serde_json::from_str(text) {
        Ok(doc) => doc,
        Err(err) => {
            return vec![Issue::error(
                "PRODUCT_APIS_INVALID_JSON",
                rel_path,
                format!("invalid JSON format: {err}"),
            )]
        }
    };
    let Some(items) = doc.as_array() else {
        return vec![Issue::error(
            "PRODUCT_APIS_NOT_ARRAY",
            rel_path,
            format!(
                "Expected a JSON array of API names in {}",
                file_name(rel_path)
            ),
        )];
    };
    let mut issues = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let ok = matches!(item, Value::String(s) if !s.trim().is_empty());
        if !ok {
            issues.push(Issue::error(
                "PRODUCT_APIS_ENTRY_INVALID",
                rel_path,
                format!(
                    "Entry {index} in {} must be a non-empty API name",
                    file_name(rel_path)
                ),
            ));
        }
    }
    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NamedValueCatalog, PolicySections};

    fn ctx(catalog: &NamedValueCatalog) -> FileContext<'_> {
        FileContext {
            policy_sections: PolicySections::Full,
            catalog,
        }
    }

    #[test]
    fn empty_array_is_legal() {
        let catalog = NamedValueCatalog::empty();
        let issues = check_product_api_links(&ctx(&catalog), "[]", "p/productApis.json");
        assert!(issues.is_empty());
    }

    #[test]
    fn names_must_be_non_empty_strings() {
        let catalog = NamedValueCatalog::empty();
        let issues = check_product_api_links(
            &ctx(&catalog),
            r#"["address-lookup-v10", "", 3]"#,
            "p/productApis.json",
        );
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("Entry 1"));
        assert!(issues[1].message.contains("Entry 2"));
    }

    #[test]
    fn object_payload_is_one_error() {
        let catalog = NamedValueCatalog::empty();
        let issues = check_product_api_links(&ctx(&catalog), "{}", "p/productApis.json");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "PRODUCT_APIS_NOT_ARRAY");
    }
}
