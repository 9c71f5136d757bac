//! Predicate fragment building.

use bson::{Bson, Document, doc, oid::ObjectId};

/// Builder for a single predicate fragment.
///
/// Each call adds one condition to the fragment document. Conditions on
/// different fields in one fragment are implicitly AND-ed by the store;
/// a second condition on the same field replaces the first, so range
/// bounds on one field go through [`between`](Self::between).
///
/// # Example
///
/// ```rust
/// use sift_mongodb::FilterBuilder;
/// use bson::doc;
///
/// let fragment = FilterBuilder::new()
///     .in_array("colors.colorName", vec!["red", "blue"])
///     .between("price", 10, 50)
///     .build();
///
/// assert_eq!(
///     fragment,
///     doc! {
///         "colors.colorName": { "$in": ["red", "blue"] },
///         "price": { "$gte": 10, "$lte": 50 },
///     }
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    doc: Document,
}

impl FilterBuilder {
    /// Create a new empty filter builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn eq(mut self, field: &str, value: impl Into<Bson>) -> Self {
        self.doc.insert(field, value.into());
        self
    }

    /// Add an equality condition on a reference id.
    pub fn eq_id(self, field: &str, id: ObjectId) -> Self {
        self.eq(field, id)
    }

    /// Add an "in" condition (value in set).
    pub fn in_array(mut self, field: &str, values: Vec<impl Into<Bson>>) -> Self {
        let bson_values: Vec<Bson> = values.into_iter().map(Into::into).collect();
        self.doc.insert(field, doc! { "$in": bson_values });
        self
    }

    /// Add an inclusive range condition.
    pub fn between(mut self, field: &str, min: impl Into<Bson>, max: impl Into<Bson>) -> Self {
        self.doc
            .insert(field, doc! { "$gte": min.into(), "$lte": max.into() });
        self
    }

    /// Add a regex condition with options.
    pub fn regex_with_options(mut self, field: &str, pattern: &str, options: &str) -> Self {
        self.doc
            .insert(field, doc! { "$regex": pattern, "$options": options });
        self
    }

    /// Build the fragment document.
    pub fn build(self) -> Document {
        self.doc
    }

    /// Check if the fragment is empty.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }
}

/// Combine fragments with `$and`.
///
/// No fragments give the match-everything document and a single fragment
/// is returned as is.
pub fn and_all(mut fragments: Vec<Document>) -> Document {
    match fragments.len() {
        0 => doc! {},
        1 => fragments.pop().unwrap_or_default(),
        _ => doc! { "$and": fragments },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_builder_eq() {
        let oid = ObjectId::new();
        let filter = FilterBuilder::new().eq("brand", "acme").eq_id("category", oid).build();

        assert_eq!(filter.get_str("brand").unwrap(), "acme");
        assert_eq!(filter.get_object_id("category").unwrap(), oid);
    }

    #[test]
    fn test_filter_builder_in_array() {
        let filter = FilterBuilder::new()
            .in_array("colors.sizes.size", vec!["S", "M"])
            .build();

        assert_eq!(filter, doc! { "colors.sizes.size": { "$in": ["S", "M"] } });
    }

    #[test]
    fn test_filter_builder_between() {
        let filter = FilterBuilder::new().between("price", 0_i64, 100.5).build();
        assert_eq!(filter, doc! { "price": { "$gte": 0_i64, "$lte": 100.5 } });
    }

    #[test]
    fn test_filter_builder_regex() {
        let filter = FilterBuilder::new()
            .regex_with_options("name", "shirt", "i")
            .build();

        let name = filter.get_document("name").unwrap();
        assert_eq!(name.get_str("$regex").unwrap(), "shirt");
        assert_eq!(name.get_str("$options").unwrap(), "i");
    }

    #[test]
    fn test_filter_builder_empty() {
        assert!(FilterBuilder::new().is_empty());
        assert!(!FilterBuilder::new().eq("a", 1).is_empty());
    }

    #[test]
    fn test_and_all() {
        assert_eq!(and_all(vec![]), doc! {});
        assert_eq!(and_all(vec![doc! { "a": 1 }]), doc! { "a": 1 });
        assert_eq!(
            and_all(vec![doc! { "a": 1 }, doc! { "b": 2 }]),
            doc! { "$and": [{ "a": 1 }, { "b": 2 }] }
        );
    }
}
