//! Structural diffs between two store snapshots.
//!
//! Pure comparisons, independent of patch replay. [`diff`] is shallow and
//! reports only top-level changed keys; [`detailed_diff`] partitions the
//! differences into added/updated/deleted sub-trees, recursing into nested
//! objects. Both satisfy `diff(X, X) == {}` for every X.

use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{Map, Value};

/// How a single top-level key changed between two snapshots.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "change", content = "value", rename_all = "snake_case")]
pub enum KeyChange {
    /// Key present only in the right operand.
    Added(Value),
    /// Key present in both with different values.
    Updated { from: Value, to: Value },
    /// Key present only in the left operand; carries the removed value.
    Removed(Value),
}

/// Shallow structural diff: top-level changed keys only.
///
/// When the operands are not both objects, equal values yield an empty map
/// and differing values are reported under the pseudo-key `""`.
///
/// # Examples
///
/// ```rust
/// use tracelens::store::{diff, KeyChange};
/// use serde_json::json;
///
/// let a = json!({"count": 1, "user": "ada"});
/// let b = json!({"count": 2, "tags": []});
///
/// let changes = diff(&a, &b);
/// assert_eq!(changes.len(), 3);
/// assert_eq!(
///     changes.get("count"),
///     Some(&KeyChange::Updated { from: json!(1), to: json!(2) })
/// );
/// assert_eq!(changes.get("user"), Some(&KeyChange::Removed(json!("ada"))));
/// assert_eq!(changes.get("tags"), Some(&KeyChange::Added(json!([]))));
///
/// assert!(diff(&a, &a).is_empty());
/// ```
pub fn diff(a: &Value, b: &Value) -> FxHashMap<String, KeyChange> {
    let mut changes = FxHashMap::default();
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            for (key, left_value) in left {
                match right.get(key) {
                    None => {
                        changes.insert(key.clone(), KeyChange::Removed(left_value.clone()));
                    }
                    Some(right_value) if right_value != left_value => {
                        changes.insert(
                            key.clone(),
                            KeyChange::Updated {
                                from: left_value.clone(),
                                to: right_value.clone(),
                            },
                        );
                    }
                    Some(_) => {}
                }
            }
            for (key, right_value) in right {
                if !left.contains_key(key) {
                    changes.insert(key.clone(), KeyChange::Added(right_value.clone()));
                }
            }
        }
        (left, right) if left == right => {}
        (left, right) => {
            changes.insert(
                String::new(),
                KeyChange::Updated {
                    from: left.clone(),
                    to: right.clone(),
                },
            );
        }
    }
    changes
}

/// Differences between two snapshots, partitioned into sub-trees.
///
/// Nested objects are recursed, so each partition mirrors the shape of the
/// snapshot and contains only the affected paths. Deleted leaves carry
/// their old value.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DetailedDiff {
    pub added: Value,
    pub updated: Value,
    pub deleted: Value,
}

impl DetailedDiff {
    fn empty() -> Self {
        Self {
            added: Value::Object(Map::new()),
            updated: Value::Object(Map::new()),
            deleted: Value::Object(Map::new()),
        }
    }

    /// `true` when the two snapshots compared equal.
    pub fn is_empty(&self) -> bool {
        fn blank(value: &Value) -> bool {
            match value {
                Value::Object(map) => map.is_empty(),
                Value::Null => true,
                _ => false,
            }
        }
        blank(&self.added) && blank(&self.updated) && blank(&self.deleted)
    }
}

/// Partition the differences between two snapshots into added, updated,
/// and deleted sub-trees.
///
/// Arrays and scalars are compared leaf-wise (a changed array lands whole
/// under `updated`). When the operands are not both objects and differ,
/// `updated` carries the right operand verbatim.
///
/// # Examples
///
/// ```rust
/// use tracelens::store::detailed_diff;
/// use serde_json::json;
///
/// let a = json!({"user": {"name": "ada", "role": "admin"}, "count": 1});
/// let b = json!({"user": {"name": "ada", "email": "a@b.c"}, "count": 2});
///
/// let d = detailed_diff(&a, &b);
/// assert_eq!(d.added, json!({"user": {"email": "a@b.c"}}));
/// assert_eq!(d.updated, json!({"count": 2}));
/// assert_eq!(d.deleted, json!({"user": {"role": "admin"}}));
///
/// assert!(detailed_diff(&a, &a).is_empty());
/// ```
pub fn detailed_diff(a: &Value, b: &Value) -> DetailedDiff {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => diff_objects(left, right),
        (left, right) if left == right => DetailedDiff::empty(),
        (_, right) => DetailedDiff {
            updated: right.clone(),
            ..DetailedDiff::empty()
        },
    }
}

fn diff_objects(left: &Map<String, Value>, right: &Map<String, Value>) -> DetailedDiff {
    let mut added = Map::new();
    let mut updated = Map::new();
    let mut deleted = Map::new();

    for (key, left_value) in left {
        match right.get(key) {
            None => {
                deleted.insert(key.clone(), left_value.clone());
            }
            Some(right_value) if right_value == left_value => {}
            Some(right_value) => match (left_value, right_value) {
                (Value::Object(lo), Value::Object(ro)) => {
                    let sub = diff_objects(lo, ro);
                    insert_non_empty(&mut added, key, sub.added);
                    insert_non_empty(&mut updated, key, sub.updated);
                    insert_non_empty(&mut deleted, key, sub.deleted);
                }
                _ => {
                    updated.insert(key.clone(), right_value.clone());
                }
            },
        }
    }
    for (key, right_value) in right {
        if !left.contains_key(key) {
            added.insert(key.clone(), right_value.clone());
        }
    }

    DetailedDiff {
        added: Value::Object(added),
        updated: Value::Object(updated),
        deleted: Value::Object(deleted),
    }
}

fn insert_non_empty(target: &mut Map<String, Value>, key: &str, value: Value) {
    let empty = matches!(&value, Value::Object(map) if map.is_empty());
    if !empty {
        target.insert(key.to_string(), value);
    }
}
