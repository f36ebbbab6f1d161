//! Flatten/unflatten over `__`-delimited keys.
//!
//! Legacy scripts address nested create fields as `parent__child`. These
//! helpers convert between that single-level form and nested objects.

use serde_json::{Map, Value};

/// Separator joining nested path segments in a flat key.
pub const DELIMITER: &str = "__";

/// Collapse nested objects into one level, joining keys with [`DELIMITER`].
///
/// Only objects are descended into. Arrays, scalars and empty objects are
/// kept as leaf values.
pub fn flatten(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    flatten_into(obj, None, &mut out);
    out
}

fn flatten_into(obj: &Map<String, Value>, prefix: Option<&str>, out: &mut Map<String, Value>) {
    for (key, value) in obj {
        let path = match prefix {
            Some(p) => format!("{p}{DELIMITER}{key}"),
            None => key.clone(),
        };
        match value {
            Value::Object(child) if !child.is_empty() => flatten_into(child, Some(&path), out),
            other => {
                out.insert(path, other.clone());
            }
        }
    }
}

/// Rebuild nested objects from `__`-delimited keys.
///
/// Leaf values are copied as-is. A key with an empty segment is treated as a
/// single segment. When two keys claim the same path, the shorter key keeps
/// its value and the longer one stays flat at the top level, whatever the
/// input order.
pub fn unflatten(obj: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in obj {
        let split: Vec<&str> = key.split(DELIMITER).collect();
        let segments = if split.iter().any(|s| s.is_empty()) {
            vec![key.as_str()]
        } else {
            split
        };

        match insert_path(&mut out, &segments, value.clone()) {
            Placement::Placed => {}
            Placement::Blocked => {
                out.insert(key.clone(), value.clone());
            }
            Placement::Displaced(nested) => {
                for (leaf_key, leaf) in flatten(&nested) {
                    out.insert(format!("{key}{DELIMITER}{leaf_key}"), leaf);
                }
            }
        }
    }
    out
}

enum Placement {
    Placed,
    /// The path runs through an existing non-object value.
    Blocked,
    /// The value replaced an object built from longer keys.
    Displaced(Map<String, Value>),
}

fn insert_path(target: &mut Map<String, Value>, segments: &[&str], value: Value) -> Placement {
    let Some((last, parents)) = segments.split_last() else {
        return Placement::Blocked;
    };

    let mut cursor = target;
    for segment in parents {
        let slot = cursor
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        match slot {
            Value::Object(next) => cursor = next,
            _ => return Placement::Blocked,
        }
    }

    match cursor.insert(last.to_string(), value) {
        Some(Value::Object(previous)) => Placement::Displaced(previous),
        _ => Placement::Placed,
    }
}
