//! Raw request parameters and the shared list parsers.
//!
//! Query strings are stringly typed: a parameter may arrive as a single
//! value, as a comma-joined list, or repeated (`color=red&color=blue`).
//! [`RawParameters`] keeps them as they came and the helpers here normalize
//! them at one place, so every list-valued filter reads input the same way.
//!
//! ```rust
//! use sift_query::params::{RawParameters, comma_list, numeric_list};
//!
//! let params = RawParameters::from_query_str("color=red,%20blue&seamSize=10,abc,20");
//!
//! let colors = comma_list(params.get("color").unwrap());
//! assert_eq!(colors, vec!["red", "blue"]);
//!
//! let seams = numeric_list(params.get("seamSize").unwrap());
//! assert_eq!(seams, vec![10.0, 20.0]);
//! ```

use std::borrow::Cow;

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::trace;

/// A single raw parameter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    /// A scalar, possibly a comma-joined list.
    Text(String),
    /// A key that was repeated in the query string.
    Many(Vec<String>),
    /// A pre-structured sub-object.
    Nested(IndexMap<String, RawValue>),
}

impl RawValue {
    /// Check if the value carries nothing usable.
    ///
    /// Empty and whitespace-only text counts as blank, which makes the
    /// parameter absent for every filter.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(s) => s.trim().is_empty(),
            Self::Many(values) => values.iter().all(|s| s.trim().is_empty()),
            Self::Nested(map) => map.is_empty(),
        }
    }

    /// View the value as a single string.
    ///
    /// Repeated values are joined with a comma. Nested values have no text
    /// form.
    pub fn text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Text(s) => Some(Cow::Borrowed(s.as_str())),
            Self::Many(values) => Some(Cow::Owned(values.join(","))),
            Self::Nested(_) => None,
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for RawValue {
    fn from(values: Vec<String>) -> Self {
        Self::Many(values)
    }
}

impl From<Vec<&str>> for RawValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Many(values.into_iter().map(str::to_string).collect())
    }
}

impl From<IndexMap<String, RawValue>> for RawValue {
    fn from(map: IndexMap<String, RawValue>) -> Self {
        Self::Nested(map)
    }
}

/// Raw request parameters, in the order they were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParameters {
    entries: IndexMap<String, RawValue>,
}

impl RawParameters {
    /// Create an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string.
    ///
    /// A leading `?` is ignored, pairs without a key are skipped and
    /// repeated keys fold into [`RawValue::Many`].
    pub fn from_query_str(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = Self::new();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if key.is_empty() {
                continue;
            }
            params.append(key.into_owned(), value.into_owned());
        }
        trace!(keys = params.len(), "parsed query string");
        params
    }

    /// Insert a value, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Option<RawValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Append a value, turning a repeated key into a list.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.entries.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(RawValue::Text(value));
            }
            Entry::Occupied(mut slot) => {
                let previous = std::mem::replace(slot.get_mut(), RawValue::Many(Vec::new()));
                *slot.get_mut() = match previous {
                    RawValue::Text(first) => RawValue::Many(vec![first, value]),
                    RawValue::Many(mut values) => {
                        values.push(value);
                        RawValue::Many(values)
                    }
                    RawValue::Nested(_) => RawValue::Text(value),
                };
            }
        }
    }

    /// Get a value by key, blank or not.
    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key)
    }

    /// Get a value by key, treating blank values as absent.
    pub fn get_present(&self, key: &str) -> Option<&RawValue> {
        self.entries.get(key).filter(|value| !value.is_blank())
    }

    /// Get the text of a present value.
    pub fn text(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get_present(key).and_then(RawValue::text)
    }

    /// Check if a key is present and not blank.
    pub fn contains(&self, key: &str) -> bool {
        self.get_present(key).is_some()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for RawParameters
where
    K: Into<String>,
    V: Into<RawValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn tokens(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Parse a value into trimmed, non-empty comma-separated tokens.
///
/// A single value without a comma yields a one-element list. Repeated
/// values are split individually and concatenated in order.
pub fn comma_list(value: &RawValue) -> Vec<String> {
    match value {
        RawValue::Text(s) => tokens(s).collect(),
        RawValue::Many(values) => values.iter().flat_map(|s| tokens(s)).collect(),
        RawValue::Nested(_) => Vec::new(),
    }
}

/// Parse a value into numbers, dropping tokens that are not finite numbers.
pub fn numeric_list(value: &RawValue) -> Vec<f64> {
    comma_list(value)
        .iter()
        .filter_map(|token| token.parse::<f64>().ok())
        .filter(|n| n.is_finite())
        .collect()
}
