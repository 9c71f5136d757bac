//! # sift-query
//!
//! Backend-neutral building blocks for composing queries out of untyped
//! request parameters.
//!
//! This crate provides:
//! - [`RawParameters`], the stringly typed input as it came off the query string
//! - Shared list parsers used by every multi-value filter
//! - Bracket-key expansion and comparison operator rewriting
//! - Sort specifications
//! - Per-filter invalid-input policies and composition reports
//! - Configuration, errors and logging setup
//!
//! The document-store side (predicate fragments, the query builder and the
//! composer itself) lives in `sift-mongodb`.
//!
//! ## Parameters
//!
//! ```rust
//! use sift_query::{RawParameters, comma_list};
//!
//! let params = RawParameters::from_query_str("color=red,blue&page=2");
//! assert_eq!(comma_list(params.get("color").unwrap()), vec!["red", "blue"]);
//! ```
//!
//! ## Policies
//!
//! ```rust
//! use sift_query::{FilterKind, InvalidInputPolicy};
//!
//! assert_eq!(FilterKind::Category.policy(), InvalidInputPolicy::Degrade);
//! assert_eq!(FilterKind::Price.policy(), InvalidInputPolicy::Reject);
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod operators;
pub mod params;
pub mod policy;
pub mod types;

pub use config::{FilterConfig, FilterConfigBuilder};
pub use error::{FilterError, FilterResult};
pub use operators::{ComparisonOp, expand_brackets, rewrite_operator_keys};
pub use params::{RawParameters, RawValue, comma_list, numeric_list};
pub use policy::{CompositionReport, FilterKind, FilterOutcome, InvalidInputPolicy};
pub use types::{OrderBy, OrderByField, SortOrder};
