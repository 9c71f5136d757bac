//! Comparison operator keys for generic field predicates.
//!
//! Query strings spell comparisons as bare words inside bracket keys
//! (`price[gte]=10&price[lt]=50`). This module expands those keys into a
//! nested structure and renames the bare operator words to their operator
//! form with a structural walk. Only keys that are exactly one of the four
//! words are renamed; values and keys that merely contain them are left
//! untouched.
//!
//! ```rust
//! use sift_query::operators::{expand_brackets, rewrite_operator_keys};
//! use sift_query::params::RawValue;
//!
//! let raw = [("age[gt]", RawValue::from("5")), ("gtLevel", RawValue::from("3"))];
//! let expanded = expand_brackets(raw.iter().map(|(k, v)| (*k, v))).unwrap();
//! let rewritten = rewrite_operator_keys(expanded);
//!
//! let RawValue::Nested(age) = &rewritten["age"] else { panic!() };
//! assert!(age.contains_key("$gt"));
//! assert!(rewritten.contains_key("gtLevel"));
//! ```

use std::fmt;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::error::{FilterError, FilterResult};
use crate::params::RawValue;

/// A comparison operator that may appear as a bare word key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl ComparisonOp {
    /// All operators.
    pub const ALL: [ComparisonOp; 4] = [Self::Gt, Self::Gte, Self::Lt, Self::Lte];

    /// Match a key exactly against the bare operator words.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            _ => None,
        }
    }

    /// The bare word.
    pub fn as_word(&self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    /// The operator form used in document predicates.
    pub fn as_operator(&self) -> &'static str {
        match self {
            Self::Gt => "$gt",
            Self::Gte => "$gte",
            Self::Lt => "$lt",
            Self::Lte => "$lte",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_operator())
    }
}

/// Rename bare operator keys at every depth of a parameter object.
pub fn rewrite_operator_keys(map: IndexMap<String, RawValue>) -> IndexMap<String, RawValue> {
    map.into_iter()
        .map(|(key, value)| {
            let key = match ComparisonOp::from_key(&key) {
                Some(op) => op.as_operator().to_string(),
                None => key,
            };
            (key, rewrite_value(value))
        })
        .collect()
}

fn rewrite_value(value: RawValue) -> RawValue {
    match value {
        RawValue::Nested(map) => RawValue::Nested(rewrite_operator_keys(map)),
        other => other,
    }
}

/// Split a bracket key like `a[b][c]` into its path segments.
///
/// A trailing `[]` marks the value as a list and is reported through the
/// returned flag.
fn key_path(key: &str) -> FilterResult<(Vec<&str>, bool)> {
    let Some(open) = key.find('[') else {
        if key.contains(']') {
            return Err(FilterError::malformed_parameter(key, "unexpected ']'"));
        }
        return Ok((vec![key], false));
    };

    let base = &key[..open];
    if base.is_empty() {
        return Err(FilterError::malformed_parameter(key, "missing field name before '['"));
    }

    let mut path = vec![base];
    let mut is_list = false;
    let mut rest = &key[open..];
    while !rest.is_empty() {
        if is_list {
            return Err(FilterError::malformed_parameter(key, "'[]' must be the last segment"));
        }
        let Some(inner) = rest.strip_prefix('[') else {
            return Err(FilterError::malformed_parameter(key, "expected '[' after ']'"));
        };
        let Some(close) = inner.find(']') else {
            return Err(FilterError::malformed_parameter(key, "unclosed bracket"));
        };
        let segment = &inner[..close];
        if segment.contains('[') {
            return Err(FilterError::malformed_parameter(key, "nested '[' inside a segment"));
        }
        if segment.is_empty() {
            is_list = true;
        } else {
            path.push(segment);
        }
        rest = &inner[close + 1..];
    }

    Ok((path, is_list))
}

fn as_list(value: RawValue) -> RawValue {
    match value {
        RawValue::Text(s) => RawValue::Many(vec![s]),
        other => other,
    }
}

fn insert_path(
    tree: &mut IndexMap<String, RawValue>,
    key: &str,
    path: &[&str],
    value: RawValue,
) -> FilterResult<()> {
    let (head, tail) = match path.split_first() {
        Some(split) => split,
        None => return Ok(()),
    };

    if tail.is_empty() {
        return match tree.entry((*head).to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
                Ok(())
            }
            Entry::Occupied(mut slot) => match (slot.get_mut(), value) {
                (RawValue::Nested(existing), RawValue::Nested(incoming)) => {
                    for (k, v) in incoming {
                        insert_path(existing, key, &[k.as_str()], v)?;
                    }
                    Ok(())
                }
                _ => Err(FilterError::malformed_parameter(
                    key,
                    format!("'{}' is given more than one value", head),
                )),
            },
        };
    }

    let child = tree
        .entry((*head).to_string())
        .or_insert_with(|| RawValue::Nested(IndexMap::new()));
    match child {
        RawValue::Nested(map) => insert_path(map, key, tail, value),
        _ => Err(FilterError::malformed_parameter(
            key,
            format!("'{}' is used both as a value and as an object", head),
        )),
    }
}

/// Expand bracket keys into a nested parameter object.
///
/// `age[gt]=5` becomes `{ age: { gt: "5" } }` and `tags[]=a` becomes
/// `{ tags: ["a"] }`. A field used both as a plain value and as an object,
/// or a key with unbalanced brackets, is rejected.
pub fn expand_brackets<'a, I>(entries: I) -> FilterResult<IndexMap<String, RawValue>>
where
    I: IntoIterator<Item = (&'a str, &'a RawValue)>,
{
    let mut tree = IndexMap::new();
    for (key, value) in entries {
        let (path, is_list) = key_path(key)?;
        let value = if is_list { as_list(value.clone()) } else { value.clone() };
        insert_path(&mut tree, key, &path, value)?;
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested(pairs: &[(&str, RawValue)]) -> RawValue {
        RawValue::Nested(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn expand(pairs: &[(&str, &str)]) -> FilterResult<IndexMap<String, RawValue>> {
        let values: Vec<(&str, RawValue)> =
            pairs.iter().map(|(k, v)| (*k, RawValue::from(*v))).collect();
        expand_brackets(values.iter().map(|(k, v)| (*k, v)))
    }

    #[test]
    fn test_from_key_exact_only() {
        assert_eq!(ComparisonOp::from_key("gt"), Some(ComparisonOp::Gt));
        assert_eq!(ComparisonOp::from_key("lte"), Some(ComparisonOp::Lte));
        assert_eq!(ComparisonOp::from_key("gtLevel"), None);
        assert_eq!(ComparisonOp::from_key("agt"), None);
        assert_eq!(ComparisonOp::from_key("GT"), None);
        assert_eq!(ComparisonOp::from_key("$gt"), None);
    }

    #[test]
    fn test_operator_forms() {
        for op in ComparisonOp::ALL {
            assert_eq!(op.as_operator(), format!("${}", op.as_word()));
            assert_eq!(ComparisonOp::from_key(op.as_word()), Some(op));
        }
        assert_eq!(ComparisonOp::Gte.to_string(), "$gte");
    }

    #[test]
    fn test_expand_plain_keys() {
        let tree = expand(&[("brand", "acme"), ("stock", "3")]).unwrap();
        assert_eq!(tree["brand"], RawValue::from("acme"));
        assert_eq!(tree["stock"], RawValue::from("3"));
    }

    #[test]
    fn test_expand_bracket_keys() {
        let tree = expand(&[("age[gt]", "5"), ("age[lte]", "10"), ("a[b][c]", "x")]).unwrap();
        assert_eq!(
            tree["age"],
            nested(&[("gt", "5".into()), ("lte", "10".into())])
        );
        assert_eq!(tree["a"], nested(&[("b", nested(&[("c", "x".into())]))]));
    }

    #[test]
    fn test_expand_list_suffix() {
        let tree = expand(&[("tags[]", "new")]).unwrap();
        assert_eq!(tree["tags"], RawValue::Many(vec!["new".into()]));
    }

    #[test]
    fn test_expand_rejects_conflicts() {
        let err = expand(&[("age", "5"), ("age[gt]", "3")]).unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.key(), Some("age[gt]"));

        assert!(expand(&[("age[gt]", "3"), ("age", "5")]).is_err());
    }

    #[test]
    fn test_expand_rejects_malformed_brackets() {
        assert!(expand(&[("age[gt", "5")]).is_err());
        assert!(expand(&[("[gt]", "5")]).is_err());
        assert!(expand(&[("age]", "5")]).is_err());
        assert!(expand(&[("age[gt]x", "5")]).is_err());
        assert!(expand(&[("tags[][x]", "5")]).is_err());
    }

    #[test]
    fn test_expand_merges_nested_values() {
        let a = nested(&[("gt", "1".into())]);
        let b = nested(&[("lt", "9".into())]);
        let entries = [("age", &a), ("age", &b)];
        let tree = expand_brackets(entries).unwrap();
        assert_eq!(tree["age"], nested(&[("gt", "1".into()), ("lt", "9".into())]));
    }

    #[test]
    fn test_rewrite_at_any_depth() {
        let mut tree = IndexMap::new();
        tree.insert("age".to_string(), nested(&[("gt", "5".into())]));
        tree.insert(
            "specs".to_string(),
            nested(&[("weight", nested(&[("lte", "2".into()), ("unit", "kg".into())]))]),
        );

        let rewritten = rewrite_operator_keys(tree);
        assert_eq!(rewritten["age"], nested(&[("$gt", "5".into())]));
        assert_eq!(
            rewritten["specs"],
            nested(&[("weight", nested(&[("$lte", "2".into()), ("unit", "kg".into())]))])
        );
    }

    #[test]
    fn test_rewrite_leaves_lookalikes_and_values() {
        let mut tree = IndexMap::new();
        tree.insert("gtLevel".to_string(), RawValue::from("gt"));
        tree.insert("status".to_string(), nested(&[("ltd", "lte".into())]));

        let rewritten = rewrite_operator_keys(tree);
        assert_eq!(rewritten["gtLevel"], RawValue::from("gt"));
        assert_eq!(rewritten["status"], nested(&[("ltd", "lte".into())]));
    }
}
