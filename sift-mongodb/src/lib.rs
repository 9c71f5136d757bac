//! # sift-mongodb
//!
//! Document-store side of sift: predicate fragments, the query builder seam
//! and the filter composer that narrows a query from request parameters.
//!
//! This crate provides:
//! - [`FilterComposer`], one chainable step per catalog filter
//! - [`FilterBuilder`] for single predicate fragments
//! - The [`QueryBuilder`] seam and an in-crate [`FindQuery`]
//! - Conversions from raw parameter values to BSON
//!
//! Executing the query is left to the caller; a driver-backed builder only
//! has to implement [`QueryBuilder`].
//!
//! ## Example
//!
//! ```rust
//! use sift_mongodb::prelude::*;
//!
//! let params = RawParameters::from_query_str(
//!     "keyword=shirt&size=M&price=%7B%22min%22%3A10%2C%22max%22%3A50%7D",
//! );
//!
//! let query = compose(FindQuery::new("products"), &params)?;
//!
//! assert_eq!(
//!     query.filter_document(),
//!     doc! { "$and": [
//!         { "name": { "$regex": "shirt", "$options": "i" } },
//!         { "colors.sizes.size": { "$in": ["M"] } },
//!         { "price": { "$gte": 10_i64, "$lte": 50_i64 } },
//!     ] }
//! );
//! assert_eq!(query.sort_string().as_deref(), Some("-createdAt"));
//! # Ok::<(), sift_query::FilterError>(())
//! ```

pub mod composer;
pub mod filter;
pub mod query;
pub mod types;

pub use bson::oid::ObjectId;
pub use bson::{Bson, Document, doc};
pub use composer::{FilterComposer, compose};
pub use filter::{FilterBuilder, and_all};
pub use query::{FindQuery, QueryBuilder};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::composer::{FilterComposer, compose};
    pub use crate::filter::FilterBuilder;
    pub use crate::query::{FindQuery, QueryBuilder};
    pub use bson::oid::ObjectId;
    pub use bson::{Document, doc};
    pub use sift_query::{
        FilterConfig, FilterError, FilterKind, FilterOutcome, FilterResult, OrderBy,
        RawParameters,
    };
}
