//! # sift
//!
//! Compose document-store queries from untyped request parameters.
//!
//! A catalog listing endpoint receives parameters such as
//! `keyword=shirt&color=red,blue&price={"min":10,"max":50}&sort=-price`.
//! sift turns them into one AND-ed predicate and an ordering, one
//! independent narrowing step per filter:
//!
//! | Parameter  | Predicate                                         |
//! |------------|---------------------------------------------------|
//! | `keyword`  | case-insensitive regex on `name`                  |
//! | `category` | equality on `category` when a valid object id     |
//! | `color`    | `colors.colorName` in the comma list              |
//! | `size`     | `colors.sizes.size` in the comma list             |
//! | `seamSize` | `colors.seamSizes.seamSize` in the numeric list   |
//! | `price`    | `price` between `min` and `max` inclusive         |
//! | others     | direct field predicate with `gt`/`gte`/`lt`/`lte` |
//! | `sort`     | comma list, `-` for descending, `-createdAt` default |
//!
//! ## Example
//!
//! ```rust
//! use sift::prelude::*;
//!
//! let params = RawParameters::from_query_str("color=red,blue&sort=name,-price");
//!
//! let (query, report) = FilterComposer::new(FindQuery::new("products"), &params)
//!     .apply_all()?
//!     .into_parts();
//!
//! assert_eq!(
//!     query.filter_document(),
//!     doc! { "colors.colorName": { "$in": ["red", "blue"] } }
//! );
//! assert_eq!(query.sort_string().as_deref(), Some("name -price"));
//! assert_eq!(
//!     report.applied().collect::<Vec<_>>(),
//!     vec![FilterKind::Color, FilterKind::Sort]
//! );
//! # Ok::<(), FilterError>(())
//! ```
//!
//! ## Logging
//!
//! Events are emitted with `tracing`. With the `tracing-subscriber` feature,
//! [`logging::init`] installs a subscriber driven by `SIFT_DEBUG`,
//! `SIFT_LOG_LEVEL` and `SIFT_LOG_FORMAT`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Backend-neutral parameters, policies, configuration and errors.
pub mod query {
    pub use sift_query::*;
}

/// Predicate fragments, the query builder seam and the composer.
pub mod mongodb {
    pub use sift_mongodb::*;
}

/// Logging setup.
pub mod logging {
    pub use sift_query::logging::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use sift_mongodb::prelude::*;
    pub use sift_query::{CompositionReport, InvalidInputPolicy, RawValue};
}

// Re-export key types at the crate root
pub use sift_mongodb::{FilterComposer, FindQuery, QueryBuilder, compose};
pub use sift_query::{FilterConfig, FilterError, FilterResult, RawParameters};
