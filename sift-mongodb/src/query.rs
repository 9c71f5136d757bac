//! The query builder seam and the in-crate find query.

use bson::{Document, doc};
use sift_query::OrderBy;

use crate::filter::and_all;

/// A chainable retrieval query that predicate fragments narrow.
///
/// Implementations must treat every fragment passed to [`find`](Self::find)
/// as an additional AND clause, and [`sort`](Self::sort) as replacing any
/// earlier ordering.
pub trait QueryBuilder: Sized {
    /// Intersect the query with a predicate fragment.
    fn find(self, fragment: Document) -> Self;

    /// Set the ordering, replacing any previous one.
    fn sort(self, order: &OrderBy) -> Self;
}

/// A find query against one collection, not yet executed.
///
/// # Example
///
/// ```rust
/// use bson::doc;
/// use sift_mongodb::{FindQuery, QueryBuilder};
/// use sift_query::OrderBy;
///
/// let query = FindQuery::new("products")
///     .find(doc! { "published": true })
///     .find(doc! { "price": { "$lte": 50 } })
///     .sort(&OrderBy::parse_list("-createdAt").unwrap());
///
/// assert_eq!(
///     query.filter_document(),
///     doc! { "$and": [{ "published": true }, { "price": { "$lte": 50 } }] }
/// );
/// assert_eq!(query.sort_document(), Some(doc! { "createdAt": -1 }));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    collection: String,
    clauses: Vec<Document>,
    order: Option<OrderBy>,
}

impl FindQuery {
    /// Create an unfiltered query on a collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Self::default()
        }
    }

    /// The target collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The AND-ed fragments, in the order they were added.
    pub fn clauses(&self) -> &[Document] {
        &self.clauses
    }

    /// Check if no fragment narrows the query.
    pub fn is_unfiltered(&self) -> bool {
        self.clauses.is_empty()
    }

    /// The effective filter document.
    pub fn filter_document(&self) -> Document {
        and_all(self.clauses.clone())
    }

    /// The ordering, if any.
    pub fn order(&self) -> Option<&OrderBy> {
        self.order.as_ref()
    }

    /// The ordering as a sort document, e.g. `{ name: 1, price: -1 }`.
    pub fn sort_document(&self) -> Option<Document> {
        let order = self.order.as_ref()?;
        let mut sort = doc! {};
        for field in order.fields() {
            sort.insert(field.field.to_string(), field.order.as_direction());
        }
        Some(sort)
    }

    /// The ordering in space-joined form, e.g. `name -price`.
    pub fn sort_string(&self) -> Option<String> {
        self.order.as_ref().map(OrderBy::to_sort_string)
    }
}

impl QueryBuilder for FindQuery {
    fn find(mut self, fragment: Document) -> Self {
        if !fragment.is_empty() {
            self.clauses.push(fragment);
        }
        self
    }

    fn sort(mut self, order: &OrderBy) -> Self {
        self.order = if order.is_empty() {
            None
        } else {
            Some(order.clone())
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sift_query::OrderByField;

    #[test]
    fn test_unfiltered_query() {
        let query = FindQuery::new("products");
        assert_eq!(query.collection(), "products");
        assert!(query.is_unfiltered());
        assert_eq!(query.filter_document(), doc! {});
        assert_eq!(query.sort_document(), None);
    }

    #[test]
    fn test_find_accumulates() {
        let query = FindQuery::new("products")
            .find(doc! { "a": 1 })
            .find(doc! {})
            .find(doc! { "a": 2 });

        assert_eq!(query.clauses().len(), 2);
        assert_eq!(
            query.filter_document(),
            doc! { "$and": [{ "a": 1 }, { "a": 2 }] }
        );
    }

    #[test]
    fn test_single_clause_is_unwrapped() {
        let query = FindQuery::new("products").find(doc! { "a": 1 });
        assert_eq!(query.filter_document(), doc! { "a": 1 });
    }

    #[test]
    fn test_sort_last_writer_wins() {
        let query = FindQuery::new("products")
            .sort(&OrderBy::from(OrderByField::asc("name")))
            .sort(&OrderBy::parse_list("name,-price").unwrap());

        assert_eq!(query.sort_document(), Some(doc! { "name": 1, "price": -1 }));
        assert_eq!(query.sort_string().as_deref(), Some("name -price"));

        let cleared = query.sort(&OrderBy::none());
        assert_eq!(cleared.order(), None);
    }
}
