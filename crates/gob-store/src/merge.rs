//! Deep merge over JSON value trees.
//!
//! Objects merge key-wise and recursively. Every other overlay node (scalars,
//! `null`, arrays) replaces the base node outright, so an overlay array never
//! interleaves with the base array.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Merge `overlay` into `base` in place. Overlay leaves win; base structure
/// fills keys the overlay does not mention.
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Merge an overlay tree over a typed base and decode the result back into `T`.
pub fn merge_over<T>(base: &T, overlay: Value) -> Result<T, serde_json::Error>
where
    T: Serialize + DeserializeOwned,
{
    let mut tree = serde_json::to_value(base)?;
    deep_merge(&mut tree, overlay);
    serde_json::from_value(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn nested_objects_merge_keywise() {
        let mut base = json!({"a": {"x": 1, "y": 2}, "b": true});
        deep_merge(&mut base, json!({"a": {"y": 3, "z": 4}}));
        assert_eq!(base, json!({"a": {"x": 1, "y": 3, "z": 4}, "b": true}));
    }

    #[test]
    fn arrays_and_nulls_replace() {
        let mut base = json!({"list": [1, 2, 3], "name": "x"});
        deep_merge(&mut base, json!({"list": [9], "name": null}));
        assert_eq!(base, json!({"list": [9], "name": null}));
    }

    #[test]
    fn scalar_overlay_replaces_object() {
        let mut base = json!({"a": {"x": 1}});
        deep_merge(&mut base, json!({"a": 5}));
        assert_eq!(base, json!({"a": 5}));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Shape {
        tab: String,
        flags: Flags,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Flags {
        a: bool,
        b: bool,
    }

    #[test]
    fn merge_over_fills_gaps_from_typed_base() {
        let base = Shape {
            tab: "home".into(),
            flags: Flags { a: false, b: true },
        };
        let merged = merge_over(&base, json!({"flags": {"a": true}})).unwrap();
        assert_eq!(
            merged,
            Shape {
                tab: "home".into(),
                flags: Flags { a: true, b: true },
            }
        );
    }

    #[test]
    fn merge_over_rejects_type_conflicts() {
        let base = Shape {
            tab: "home".into(),
            flags: Flags { a: false, b: true },
        };
        assert!(merge_over(&base, json!({"tab": 42})).is_err());
    }
}
