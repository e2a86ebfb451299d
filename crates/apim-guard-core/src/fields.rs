//! Dot-path lookups over parsed JSON documents.
//!
//! Info documents are loosely typed; every field rule walks a path like
//! `properties.displayName` and decides on presence, never panicking on a
//! missing intermediate object.

use serde_json::Value;

/// Resolves `path` segments (split on `.`) against nested objects. A missing
/// segment at any depth yields `None`; an explicit JSON `null` is returned
/// as-is so callers can distinguish it when they need to.
pub fn get_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = root;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Present means the path resolves to anything other than `null`. An empty
/// array or `false` is present.
pub fn is_present(root: &Value, path: &str) -> bool {
    matches!(get_path(root, path), Some(v) if !v.is_null())
}

/// Non-empty presence: strings must have non-whitespace content, arrays and
/// objects at least one element. Booleans and numbers count as non-empty, so
/// `false` never trips a non-empty rule.
pub fn is_non_empty(root: &Value, path: &str) -> bool {
    match get_path(root, path) {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Bool(_)) | Some(Value::Number(_)) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_objects() {
        let doc = json!({"properties": {"path": "address-lookup", "nested": {"deep": 1}}});
        assert_eq!(
            get_path(&doc, "properties.path"),
            Some(&json!("address-lookup"))
        );
        assert_eq!(get_path(&doc, "properties.nested.deep"), Some(&json!(1)));
        assert_eq!(get_path(&doc, "properties.absent"), None);
        assert_eq!(get_path(&doc, "absent.path"), None);
    }

    #[test]
    fn traversal_through_non_objects_is_absent() {
        let doc = json!({"properties": "scalar"});
        assert_eq!(get_path(&doc, "properties.path"), None);
    }

    #[test]
    fn false_is_present() {
        let doc = json!({"properties": {"isCurrent": false, "secret": null}});
        assert!(is_present(&doc, "properties.isCurrent"));
        assert!(!is_present(&doc, "properties.secret"));
        assert!(!is_present(&doc, "properties.subscriptionRequired"));
    }

    #[test]
    fn empty_values_are_not_non_empty() {
        let doc = json!({"properties": {
            "displayName": "  ",
            "protocols": [],
            "tags": ["a"],
            "serviceUrl": "https://example.net"
        }});
        assert!(!is_non_empty(&doc, "properties.displayName"));
        assert!(!is_non_empty(&doc, "properties.protocols"));
        assert!(is_non_empty(&doc, "properties.tags"));
        assert!(is_non_empty(&doc, "properties.serviceUrl"));
    }
}
