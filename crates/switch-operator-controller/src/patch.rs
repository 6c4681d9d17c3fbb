//! JSON merge patches (RFC 7386).
//!
//! Status is flushed as the merge diff between the snapshot taken before a
//! reconcile and the status the reconcile produced. Fields that were cleared
//! appear as `null` so the API server removes them.

use serde_json::{Map, Value};

/// Compute the merge patch that turns `original` into `modified`.
///
/// Returns an empty object when nothing changed.
#[must_use]
pub fn merge_diff(original: &Value, modified: &Value) -> Value {
    match (original, modified) {
        (Value::Object(old), Value::Object(new)) => {
            let mut patch = Map::new();

            for key in old.keys() {
                if !new.contains_key(key) {
                    patch.insert(key.clone(), Value::Null);
                }
            }

            for (key, new_value) in new {
                match old.get(key) {
                    Some(old_value) if old_value == new_value => {}
                    Some(old_value @ Value::Object(_)) if new_value.is_object() => {
                        let nested = merge_diff(old_value, new_value);
                        if !is_empty_patch(&nested) {
                            patch.insert(key.clone(), nested);
                        }
                    }
                    _ => {
                        patch.insert(key.clone(), new_value.clone());
                    }
                }
            }

            Value::Object(patch)
        }
        _ => modified.clone(),
    }
}

/// Whether a patch produced by [`merge_diff`] changes nothing.
#[must_use]
pub fn is_empty_patch(patch: &Value) -> bool {
    patch.as_object().is_some_and(Map::is_empty)
}

/// Apply a merge patch to `target` in place.
pub fn apply_merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(entries) = patch else {
        *target = patch.clone();
        return;
    };

    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    let Value::Object(fields) = target else {
        return;
    };

    for (key, value) in entries {
        if value.is_null() {
            fields.remove(key);
        } else {
            apply_merge_patch(fields.entry(key.clone()).or_insert(Value::Null), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unchanged_is_empty() {
        let status = json!({"state": "Ready", "ports": [{"name": "Ethernet0"}]});
        assert!(is_empty_patch(&merge_diff(&status, &status)));
    }

    #[test]
    fn cleared_fields_become_null() {
        let old = json!({"state": "Ready", "neighbor": {"macAddress": "aa", "systemName": "spine"}});
        let new = json!({"state": "Ready"});
        assert_eq!(merge_diff(&old, &new), json!({"neighbor": null}));
    }

    #[test]
    fn nested_changes_only() {
        let old = json!({"neighbor": {"macAddress": "aa", "systemName": "spine"}});
        let new = json!({"neighbor": {"macAddress": "bb", "systemName": "spine"}});
        assert_eq!(
            merge_diff(&old, &new),
            json!({"neighbor": {"macAddress": "bb"}})
        );
    }

    #[test]
    fn diff_then_apply_reproduces_target() {
        let old = json!({"state": "Pending", "sku": "x", "neighbor": {"macAddress": "aa"}});
        let new = json!({"state": "Ready", "macAddress": "11:22", "neighbor": {"systemName": "s"}});

        let mut target = old.clone();
        apply_merge_patch(&mut target, &merge_diff(&old, &new));
        assert_eq!(target, new);
    }
}
