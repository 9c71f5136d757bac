//! Sort specifications.
//!
//! Orderings arrive as comma-separated field lists where a leading `-`
//! marks a descending field:
//!
//! ```rust
//! use sift_query::types::{OrderBy, OrderByField};
//!
//! let order = OrderBy::parse_list("name,-price").unwrap();
//! assert_eq!(
//!     order.fields(),
//!     &[OrderByField::asc("name"), OrderByField::desc("price")]
//! );
//! assert_eq!(order.to_sort_string(), "name -price");
//! ```

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Sort order for query results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    /// Ascending order (A-Z, 0-9, oldest first).
    #[default]
    Asc,
    /// Descending order (Z-A, 9-0, newest first).
    Desc,
}

impl SortOrder {
    /// The numeric direction used in sort documents.
    pub fn as_direction(&self) -> i32 {
        match self {
            Self::Asc => 1,
            Self::Desc => -1,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("asc"),
            Self::Desc => f.write_str("desc"),
        }
    }
}

/// Order specification for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderByField {
    /// The field path to order by.
    pub field: Cow<'static, str>,
    /// The sort order.
    pub order: SortOrder,
}

impl OrderByField {
    /// Create a new order field.
    pub fn new(field: impl Into<Cow<'static, str>>, order: SortOrder) -> Self {
        Self {
            field: field.into(),
            order,
        }
    }

    /// Create an ascending order.
    pub fn asc(field: impl Into<Cow<'static, str>>) -> Self {
        Self::new(field, SortOrder::Asc)
    }

    /// Create a descending order.
    pub fn desc(field: impl Into<Cow<'static, str>>) -> Self {
        Self::new(field, SortOrder::Desc)
    }

    /// Parse one token; a leading `-` means descending.
    ///
    /// Returns `None` for tokens with no field name.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (name, order) = match token.strip_prefix('-') {
            Some(name) => (name.trim(), SortOrder::Desc),
            None => (token, SortOrder::Asc),
        };
        if name.is_empty() {
            return None;
        }
        Some(Self::new(name.to_string(), order))
    }

    /// Write the `-field` / `field` token to a buffer.
    #[inline]
    pub fn write_token(&self, buffer: &mut String) {
        if self.order == SortOrder::Desc {
            buffer.push('-');
        }
        buffer.push_str(&self.field);
    }
}

/// Order specification over one or more fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    /// Order by a single field.
    Field(OrderByField),
    /// Order by multiple fields, in priority order.
    Fields(Box<[OrderByField]>),
}

impl OrderBy {
    /// Create an empty order (no ordering).
    pub fn none() -> Self {
        Self::Fields(Box::new([]))
    }

    /// Check if the order is empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Field(_) => false,
            Self::Fields(fields) => fields.is_empty(),
        }
    }

    /// Create an order from multiple fields.
    pub fn from_fields(fields: impl IntoIterator<Item = OrderByField>) -> Self {
        let mut fields: Vec<_> = fields.into_iter().collect();
        if fields.len() == 1 {
            if let Some(field) = fields.pop() {
                return Self::Field(field);
            }
        }
        Self::Fields(fields.into_boxed_slice())
    }

    /// Parse a comma-separated field list such as `name,-price`.
    ///
    /// Empty tokens are ignored; returns `None` when no field remains.
    pub fn parse_list(list: &str) -> Option<Self> {
        let order = Self::from_fields(list.split(',').filter_map(OrderByField::parse));
        if order.is_empty() { None } else { Some(order) }
    }

    /// The fields in priority order.
    pub fn fields(&self) -> &[OrderByField] {
        match self {
            Self::Field(field) => std::slice::from_ref(field),
            Self::Fields(fields) => &fields[..],
        }
    }

    /// Render the space-joined form, e.g. `name -price`.
    pub fn to_sort_string(&self) -> String {
        let cap: usize = self.fields().iter().map(|f| f.field.len() + 2).sum();
        let mut out = String::with_capacity(cap);
        for (i, field) in self.fields().iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            field.write_token(&mut out);
        }
        out
    }

    /// Number of fields.
    #[inline]
    pub fn field_count(&self) -> usize {
        self.fields().len()
    }
}

impl From<OrderByField> for OrderBy {
    fn from(field: OrderByField) -> Self {
        Self::Field(field)
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sort_string())
    }
}
