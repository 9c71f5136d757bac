//! Composition of a query from raw request parameters.
//!
//! A [`FilterComposer`] is created per request with a base query and the
//! raw parameters. Each narrowing step reads its parameter, intersects the
//! query with one predicate fragment when the input is usable, and hands
//! the composer back for the next step. Steps are independent; AND is
//! commutative, so the order of the chain does not change the resulting
//! predicate. Running a step twice adds its fragment twice.
//!
//! Unusable input is handled per [`FilterKind::policy`]: the category,
//! list and sort steps degrade to contributing nothing, while the price and
//! generic steps reject malformed input with a [`FilterError`].
//!
//! # Example
//!
//! ```rust
//! use bson::doc;
//! use sift_mongodb::{FilterComposer, FindQuery};
//! use sift_query::RawParameters;
//!
//! let params = RawParameters::from_query_str("color=red,blue&size=M&sort=name,-price");
//!
//! let query = FilterComposer::new(FindQuery::new("products"), &params)
//!     .color()
//!     .size()
//!     .sort()
//!     .finish();
//!
//! assert_eq!(
//!     query.filter_document(),
//!     doc! { "$and": [
//!         { "colors.colorName": { "$in": ["red", "blue"] } },
//!         { "colors.sizes.size": { "$in": ["M"] } },
//!     ] }
//! );
//! assert_eq!(query.sort_string().as_deref(), Some("name -price"));
//! ```

use std::borrow::Cow;

use bson::{Document, oid::ObjectId};
use serde::Deserialize;
use sift_query::{
    CompositionReport, FilterConfig, FilterError, FilterKind, FilterOutcome, FilterResult,
    InvalidInputPolicy, OrderBy, RawParameters, RawValue, comma_list, expand_brackets, numeric_list,
    rewrite_operator_keys,
};
use tracing::{debug, trace};

use crate::filter::FilterBuilder;
use crate::query::{FindQuery, QueryBuilder};
use crate::types::{json_number_to_bson, number_to_bson, raw_map_to_document};

/// The structured form of the `price` parameter.
#[derive(Debug, Deserialize)]
struct PriceRange {
    min: serde_json::Number,
    max: serde_json::Number,
}

/// Narrows a query from raw request parameters.
#[derive(Debug)]
pub struct FilterComposer<'a, Q = FindQuery> {
    query: Q,
    params: &'a RawParameters,
    config: Cow<'a, FilterConfig>,
    report: CompositionReport,
}

impl<'a, Q: QueryBuilder> FilterComposer<'a, Q> {
    /// Create a composer with the default configuration.
    pub fn new(query: Q, params: &'a RawParameters) -> Self {
        Self {
            query,
            params,
            config: Cow::Owned(FilterConfig::default()),
            report: CompositionReport::new(),
        }
    }

    /// Create a composer with a shared configuration.
    pub fn with_config(query: Q, params: &'a RawParameters, config: &'a FilterConfig) -> Self {
        Self {
            query,
            params,
            config: Cow::Borrowed(config),
            report: CompositionReport::new(),
        }
    }

    /// Case-insensitive substring match of `keyword` on the name field.
    ///
    /// The keyword is a regex pattern source; it is only escaped when
    /// [`FilterConfig::escape_keyword`] is set.
    pub fn search(self) -> Self {
        let kind = FilterKind::Keyword;
        let Some(keyword) = self.text(kind) else {
            return self.absent(kind);
        };

        let pattern = if self.config.escape_keyword {
            Cow::Owned(regex_lite::escape(&keyword))
        } else {
            keyword
        };
        let fragment = FilterBuilder::new()
            .regex_with_options(&self.config.keyword_field, &pattern, &self.config.keyword_options)
            .build();
        self.apply(kind, fragment)
    }

    /// Equality on the category field when `category` is a valid object id.
    ///
    /// Anything that does not parse as a 24-character hex id is ignored.
    pub fn category(self) -> Self {
        let kind = FilterKind::Category;
        let Some(raw) = self.text(kind) else {
            return self.absent(kind);
        };

        match ObjectId::parse_str(&*raw) {
            Ok(id) => {
                let fragment = FilterBuilder::new().eq_id(&self.config.category_field, id).build();
                self.apply(kind, fragment)
            }
            Err(err) => {
                let reason = format!("not an object id: {}", err);
                self.degrade(kind, reason)
            }
        }
    }

    /// Membership of `color` values on the color field.
    pub fn color(self) -> Self {
        let field = self.config.color_field.clone();
        self.membership(FilterKind::Color, &field)
    }

    /// Membership of `size` values on the size field.
    pub fn size(self) -> Self {
        let field = self.config.size_field.clone();
        self.membership(FilterKind::Size, &field)
    }

    /// Membership of numeric `seamSize` values on the seam size field.
    ///
    /// Tokens that are not numbers are dropped. When none survive no
    /// fragment is added.
    pub fn seam_size(self) -> Self {
        let kind = FilterKind::SeamSize;
        let Some(value) = self.param(kind) else {
            return self.absent(kind);
        };

        let numbers = numeric_list(value);
        if numbers.is_empty() {
            return self.degrade(kind, "no numeric values");
        }
        let values: Vec<_> = numbers.into_iter().map(number_to_bson).collect();
        let fragment = FilterBuilder::new()
            .in_array(&self.config.seam_size_field, values)
            .build();
        self.apply(kind, fragment)
    }

    /// Inclusive range on the price field from a JSON `{"min": n, "max": n}`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MalformedPrice`] when the value is not a JSON
    /// object with numeric `min` and `max`.
    pub fn price(self) -> FilterResult<Self> {
        let kind = FilterKind::Price;
        let Some(raw) = self.text(kind) else {
            return Ok(self.absent(kind));
        };

        let range: PriceRange = match serde_json::from_str(&raw) {
            Ok(range) => range,
            Err(source) => {
                let err = FilterError::malformed_price(raw.into_owned(), source);
                return Err(self.reject(kind, err));
            }
        };
        let fragment = FilterBuilder::new()
            .between(
                &self.config.price_field,
                json_number_to_bson(&range.min),
                json_number_to_bson(&range.max),
            )
            .build();
        Ok(self.apply(kind, fragment))
    }

    /// Every non-reserved parameter as a direct field predicate.
    ///
    /// Bracket keys are expanded (`age[gt]=5` becomes `{ age: { gt: "5" } }`)
    /// and the bare words `gt`, `gte`, `lt` and `lte` used as keys at any
    /// depth become their operator form. Keys that only contain those words
    /// are left alone. Reserved keys are skipped in bracket form too, so
    /// `page[size]=10` never becomes a predicate.
    ///
    /// Blank values are skipped like every other blank parameter, so
    /// `brand=` adds nothing rather than matching an empty string.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MalformedParameter`] for unbalanced brackets
    /// or a field given both as a value and as an object.
    pub fn filter(self) -> FilterResult<Self> {
        let kind = FilterKind::Generic;
        let params = self.params;
        let residual: Vec<_> = params
            .iter()
            .filter(|(key, value)| !self.config.is_reserved(key) && !value.is_blank())
            .collect();
        if residual.is_empty() {
            return Ok(self.absent(kind));
        }

        let tree = match expand_brackets(residual) {
            Ok(tree) => tree,
            Err(err) => return Err(self.reject(kind, err)),
        };
        let fragment = raw_map_to_document(&rewrite_operator_keys(tree));
        Ok(self.apply(kind, fragment))
    }

    /// Ordering from the comma-separated `sort` list.
    ///
    /// A leading `-` sorts a field descending. Without a usable `sort`
    /// parameter the configured default ordering is applied, so every
    /// composition ends up ordered. The report records the parameter's
    /// outcome, not whether the default was used.
    pub fn sort(mut self) -> Self {
        let kind = FilterKind::Sort;
        let requested = self.text(kind).map(|raw| OrderBy::parse_list(&raw));

        match requested {
            Some(Some(order)) => {
                debug!(filter = %kind, sort = %order, "applied ordering");
                self.query = self.query.sort(&order);
                self.report.record(kind, FilterOutcome::Applied);
                self
            }
            Some(None) => {
                let order = self.config.default_order();
                self.query = self.query.sort(&order);
                self.degrade(kind, "no sort fields")
            }
            None => {
                let order = self.config.default_order();
                trace!(filter = %kind, sort = %order, "applied default ordering");
                self.query = self.query.sort(&order);
                self.absent(kind)
            }
        }
    }

    /// Run every step once, in canonical order.
    ///
    /// # Errors
    ///
    /// Propagates the price and generic parse failures.
    pub fn apply_all(self) -> FilterResult<Self> {
        let composer = self.search().category().color().size().seam_size().price()?.filter()?;
        Ok(composer.sort())
    }

    /// The query composed so far.
    pub fn query(&self) -> &Q {
        &self.query
    }

    /// The outcomes recorded so far.
    pub fn report(&self) -> &CompositionReport {
        &self.report
    }

    /// The configuration in use.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Hand the composed query to the caller.
    pub fn finish(self) -> Q {
        self.query
    }

    /// Hand back the composed query together with the report.
    pub fn into_parts(self) -> (Q, CompositionReport) {
        (self.query, self.report)
    }

    fn param(&self, kind: FilterKind) -> Option<&'a RawValue> {
        let params = self.params;
        kind.param_key().and_then(|key| params.get_present(key))
    }

    fn text(&self, kind: FilterKind) -> Option<Cow<'a, str>> {
        self.param(kind).and_then(RawValue::text)
    }

    fn membership(self, kind: FilterKind, field: &str) -> Self {
        let Some(value) = self.param(kind) else {
            return self.absent(kind);
        };

        let values = comma_list(value);
        if values.is_empty() {
            return self.degrade(kind, "no values");
        }
        let fragment = FilterBuilder::new().in_array(field, values).build();
        self.apply(kind, fragment)
    }

    fn apply(mut self, kind: FilterKind, fragment: Document) -> Self {
        debug!(filter = %kind, "applied filter fragment");
        trace!(filter = %kind, fragment = %fragment, "fragment");
        self.query = self.query.find(fragment);
        self.report.record(kind, FilterOutcome::Applied);
        self
    }

    fn absent(mut self, kind: FilterKind) -> Self {
        self.report.record(kind, FilterOutcome::Absent);
        self
    }

    fn degrade(mut self, kind: FilterKind, reason: impl Into<String>) -> Self {
        debug_assert_eq!(kind.policy(), InvalidInputPolicy::Degrade);
        let reason = reason.into();
        debug!(filter = %kind, reason = %reason, "skipped unusable filter input");
        self.report.record(kind, FilterOutcome::skipped(reason));
        self
    }

    fn reject(&self, kind: FilterKind, err: FilterError) -> FilterError {
        debug_assert_eq!(kind.policy(), InvalidInputPolicy::Reject);
        debug!(filter = %kind, error = %err, "rejected malformed filter input");
        err
    }
}

/// Compose a query from raw parameters with every step and the default
/// configuration.
///
/// # Errors
///
/// Propagates the price and generic parse failures.
pub fn compose<Q: QueryBuilder>(query: Q, params: &RawParameters) -> FilterResult<Q> {
    FilterComposer::new(query, params).apply_all().map(FilterComposer::finish)
}
