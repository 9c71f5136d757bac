//! Composer configuration.
//!
//! The defaults describe a product catalog collection; every field path and
//! the default ordering can be overridden in code or from TOML.
//!
//! ```rust
//! use sift_query::FilterConfig;
//!
//! let config = FilterConfig::from_toml_str(r#"
//!     keyword_field = "title"
//!     default_sort = "-updatedAt"
//! "#).unwrap();
//!
//! assert_eq!(config.keyword_field, "title");
//! assert_eq!(config.color_field, "colors.colorName");
//! ```

use serde::Deserialize;
use smol_str::SmolStr;
use tracing::debug;

use crate::error::{FilterError, FilterResult};
use crate::policy::FilterKind;
use crate::types::OrderBy;

/// Field paths, reserved keys and defaults used while composing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Field matched by the keyword search.
    pub keyword_field: SmolStr,
    /// Regex options for the keyword search.
    pub keyword_options: SmolStr,
    /// Escape regex metacharacters in the keyword before matching.
    pub escape_keyword: bool,
    /// Field compared against the category reference id.
    pub category_field: SmolStr,
    /// Field matched by the color filter.
    pub color_field: SmolStr,
    /// Field matched by the size filter.
    pub size_field: SmolStr,
    /// Field matched by the seam size filter.
    pub seam_size_field: SmolStr,
    /// Field bounded by the price range.
    pub price_field: SmolStr,
    /// Ordering applied when no `sort` parameter is given.
    pub default_sort: SmolStr,
    /// Keys consumed by pagination and never filtered on.
    pub pagination_keys: Vec<SmolStr>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keyword_field: SmolStr::new_static("name"),
            keyword_options: SmolStr::new_static("i"),
            escape_keyword: false,
            category_field: SmolStr::new_static("category"),
            color_field: SmolStr::new_static("colors.colorName"),
            size_field: SmolStr::new_static("colors.sizes.size"),
            seam_size_field: SmolStr::new_static("colors.seamSizes.seamSize"),
            price_field: SmolStr::new_static("price"),
            default_sort: SmolStr::new_static("-createdAt"),
            pagination_keys: vec![SmolStr::new_static("page"), SmolStr::new_static("limit")],
        }
    }
}

impl FilterConfig {
    /// Create a builder for configuration.
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::new()
    }

    /// Parse and validate a TOML table. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> FilterResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        debug!(default_sort = %config.default_sort, "loaded filter configuration");
        Ok(config)
    }

    /// Check that every field path is usable and the default sort parses.
    pub fn validate(&self) -> FilterResult<()> {
        let paths = [
            ("keyword_field", &self.keyword_field),
            ("category_field", &self.category_field),
            ("color_field", &self.color_field),
            ("size_field", &self.size_field),
            ("seam_size_field", &self.seam_size_field),
            ("price_field", &self.price_field),
        ];
        for (name, path) in paths {
            if path.trim().is_empty() {
                return Err(FilterError::config(format!("{} must not be empty", name)));
            }
            if path.starts_with('$') {
                return Err(FilterError::config(format!(
                    "{} must be a field path, not an operator: {}",
                    name, path
                )));
            }
        }
        if OrderBy::parse_list(&self.default_sort).is_none() {
            return Err(FilterError::config(format!(
                "default_sort names no field: {:?}",
                self.default_sort
            )));
        }
        Ok(())
    }

    /// The parsed default ordering.
    pub fn default_order(&self) -> OrderBy {
        OrderBy::parse_list(&self.default_sort).unwrap_or_else(OrderBy::none)
    }

    /// Every key excluded from the generic field predicate.
    pub fn reserved_keys(&self) -> impl Iterator<Item = &str> {
        FilterKind::ALL
            .into_iter()
            .filter_map(|kind| kind.param_key())
            .chain(self.pagination_keys.iter().map(SmolStr::as_str))
    }

    /// Check if a key is excluded from the generic field predicate.
    ///
    /// Bracket keys are judged by their base name, so `page[size]` is as
    /// reserved as `page`.
    pub fn is_reserved(&self, key: &str) -> bool {
        let base = key.find('[').map_or(key, |open| &key[..open]);
        self.reserved_keys().any(|reserved| reserved == base)
    }
}

/// Builder for [`FilterConfig`].
#[derive(Debug, Default)]
pub struct FilterConfigBuilder {
    keyword_field: Option<SmolStr>,
    keyword_options: Option<SmolStr>,
    escape_keyword: Option<bool>,
    category_field: Option<SmolStr>,
    color_field: Option<SmolStr>,
    size_field: Option<SmolStr>,
    seam_size_field: Option<SmolStr>,
    price_field: Option<SmolStr>,
    default_sort: Option<SmolStr>,
    pagination_keys: Option<Vec<SmolStr>>,
}

impl FilterConfigBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the keyword search field.
    pub fn keyword_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.keyword_field = Some(field.into());
        self
    }

    /// Set the keyword regex options.
    pub fn keyword_options(mut self, options: impl Into<SmolStr>) -> Self {
        self.keyword_options = Some(options.into());
        self
    }

    /// Escape regex metacharacters in the keyword.
    pub fn escape_keyword(mut self, enabled: bool) -> Self {
        self.escape_keyword = Some(enabled);
        self
    }

    /// Set the category field.
    pub fn category_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.category_field = Some(field.into());
        self
    }

    /// Set the color field.
    pub fn color_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.color_field = Some(field.into());
        self
    }

    /// Set the size field.
    pub fn size_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.size_field = Some(field.into());
        self
    }

    /// Set the seam size field.
    pub fn seam_size_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.seam_size_field = Some(field.into());
        self
    }

    /// Set the price field.
    pub fn price_field(mut self, field: impl Into<SmolStr>) -> Self {
        self.price_field = Some(field.into());
        self
    }

    /// Set the default ordering, e.g. `-createdAt`.
    pub fn default_sort(mut self, sort: impl Into<SmolStr>) -> Self {
        self.default_sort = Some(sort.into());
        self
    }

    /// Set the pagination keys.
    pub fn pagination_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SmolStr>,
    {
        self.pagination_keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> FilterResult<FilterConfig> {
        let defaults = FilterConfig::default();
        let config = FilterConfig {
            keyword_field: self.keyword_field.unwrap_or(defaults.keyword_field),
            keyword_options: self.keyword_options.unwrap_or(defaults.keyword_options),
            escape_keyword: self.escape_keyword.unwrap_or(defaults.escape_keyword),
            category_field: self.category_field.unwrap_or(defaults.category_field),
            color_field: self.color_field.unwrap_or(defaults.color_field),
            size_field: self.size_field.unwrap_or(defaults.size_field),
            seam_size_field: self.seam_size_field.unwrap_or(defaults.seam_size_field),
            price_field: self.price_field.unwrap_or(defaults.price_field),
            default_sort: self.default_sort.unwrap_or(defaults.default_sort),
            pagination_keys: self.pagination_keys.unwrap_or(defaults.pagination_keys),
        };
        config.validate()?;
        Ok(config)
    }
}
