//! Path language for compound storage addresses.
//!
//! A path is a sequence of dotted segments with optional numeric bracket
//! indices: `a.b[2].c` is the same as `a.b.2.c`. Numeric segments index into
//! arrays; against an object they are plain keys.

use serde_json::{Map, Value};

/// Split a path into segments. `a.b[2].c` → `["a", "b", "2", "c"]`.
pub fn segments(path: &str) -> Vec<String> {
    let mut normalized = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '[' {
            let mut index = String::new();
            let mut closed = false;
            while let Some(&next) = chars.peek() {
                chars.next();
                if next == ']' {
                    closed = true;
                    break;
                }
                index.push(next);
            }
            if closed && !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit()) {
                normalized.push('.');
                normalized.push_str(&index);
            } else {
                normalized.push('[');
                normalized.push_str(&index);
                if closed {
                    normalized.push(']');
                }
            }
        } else {
            normalized.push(c);
        }
    }

    normalized
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn as_index(segment: &str) -> Option<usize> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

/// Resolve `path` inside `root`. Returns `None` as soon as a segment is absent.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    segments(path)
        .iter()
        .try_fold(root, |current, segment| match current {
            Value::Object(map) => map.get(segment.as_str()),
            Value::Array(items) => as_index(segment).and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Largest run of `null`s an array write may pad before the target index.
pub const MAX_ARRAY_PADDING: usize = 1024;

/// Write `value` at `path` inside `root`, creating intermediate containers.
///
/// A missing or primitive intermediate becomes an array when the following
/// segment is a non-negative integer and an object otherwise. Array writes
/// past the end pad with `null`, at most [`MAX_ARRAY_PADDING`] of them. An
/// empty path replaces the root.
///
/// Returns `false` without a usable result when an index is out of reach;
/// `root` may then hold partially created containers and should be dropped.
pub fn assign(root: &mut Value, path: &str, value: Value) -> bool {
    let segments = segments(path);
    let Some((last, parents)) = segments.split_last() else {
        *root = value;
        return true;
    };

    let mut current = root;
    for (position, segment) in parents.iter().enumerate() {
        let next_is_index = as_index(&segments[position + 1]).is_some();
        let Some(child) = child_container(current, segment, next_is_index) else {
            return false;
        };
        current = child;
    }

    match slot_mut(current, last) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}

fn empty_container(as_array: bool) -> Value {
    if as_array {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn child_container<'a>(
    parent: &'a mut Value,
    segment: &str,
    as_array: bool,
) -> Option<&'a mut Value> {
    let slot = slot_mut(parent, segment)?;
    if !(slot.is_object() || slot.is_array()) {
        *slot = empty_container(as_array);
    }
    Some(slot)
}

/// Mutable slot for `segment` under `parent`, creating it as `null` if
/// missing. A primitive parent is replaced by an object first. `None` when
/// the index lies too far past the end of an array.
fn slot_mut<'a>(parent: &'a mut Value, segment: &str) -> Option<&'a mut Value> {
    // A non-numeric key cannot live in a JSON array, so the array is replaced.
    if !(parent.is_object() || parent.is_array())
        || (parent.is_array() && as_index(segment).is_none())
    {
        *parent = Value::Object(Map::new());
    }

    match parent {
        Value::Array(items) => {
            let index = as_index(segment)?;
            if index > items.len().saturating_add(MAX_ARRAY_PADDING) {
                return None;
            }
            if items.len() <= index {
                items.resize(index + 1, Value::Null);
            }
            items.get_mut(index)
        }
        Value::Object(map) => Some(map.entry(segment.to_string()).or_insert(Value::Null)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn segments_normalize_bracket_indices() {
        assert_eq!(segments("a.b[2].c"), vec!["a", "b", "2", "c"]);
        assert_eq!(segments("list[0][1]"), vec!["list", "0", "1"]);
        assert_eq!(segments("plain"), vec!["plain"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn segments_keep_non_numeric_brackets_literal() {
        assert_eq!(segments("a[x].b"), vec!["a[x]", "b"]);
    }

    #[test]
    fn resolve_walks_objects_and_arrays() {
        let doc = json!({"a": {"b": [10, 20, {"c": "deep"}]}});
        assert_eq!(resolve(&doc, "a.b[2].c"), Some(&json!("deep")));
        assert_eq!(resolve(&doc, "a.b.1"), Some(&json!(20)));
        assert_eq!(resolve(&doc, "a.b[9]"), None);
        assert_eq!(resolve(&doc, "a.missing.c"), None);
        assert_eq!(resolve(&doc, "a.b.c"), None);
    }

    #[test]
    fn assign_creates_objects_and_arrays_by_next_segment() {
        let mut doc = json!({});
        assert!(assign(&mut doc, "a.b[2].c", json!("v")));
        assert_eq!(doc, json!({"a": {"b": [null, null, {"c": "v"}]}}));
    }

    #[test]
    fn assign_replaces_primitive_intermediates() {
        let mut doc = json!({"a": 5});
        assert!(assign(&mut doc, "a.b", json!(true)));
        assert_eq!(doc, json!({"a": {"b": true}}));
    }

    #[test]
    fn assign_leaves_siblings_untouched() {
        let mut doc = json!({"keep": {"x": 1}, "a": {"y": 2}});
        assert!(assign(&mut doc, "a.z", json!(3)));
        assert_eq!(doc, json!({"keep": {"x": 1}, "a": {"y": 2, "z": 3}}));
    }

    #[test]
    fn assign_numeric_key_into_existing_object_is_a_key() {
        let mut doc = json!({"a": {"0": "zero"}});
        assert!(assign(&mut doc, "a.1", json!("one")));
        assert_eq!(doc, json!({"a": {"0": "zero", "1": "one"}}));
    }

    #[test]
    fn assign_empty_path_replaces_root() {
        let mut doc = json!({"a": 1});
        assert!(assign(&mut doc, "", json!([1, 2])));
        assert_eq!(doc, json!([1, 2]));
    }

    #[test]
    fn assign_refuses_indices_far_past_the_end() {
        let mut doc = json!({"a": [1]});
        assert!(!assign(&mut doc, "a[18446744073709551615]", json!("x")));
        assert!(!assign(&mut doc, "a[4000000000].b", json!("x")));

        let mut doc = json!({});
        assert!(!assign(&mut doc, "list[5000]", json!(1)));
        assert!(assign(&mut doc, "list[3]", json!(1)));
        assert_eq!(doc, json!({"list": [null, null, null, 1]}));
    }
}
