//! Error types for filter composition.
//!
//! Composition distinguishes two tiers of bad input. Most filters degrade
//! silently and never produce an error; the structured ones (price range and
//! the generic field predicate) reject malformed input with a [`FilterError`]
//! that the caller is expected to surface as a client error.
//!
//! ```rust
//! use sift_query::FilterError;
//!
//! let err = FilterError::malformed_parameter("age[gt", "unclosed bracket");
//! assert!(err.is_client_error());
//! assert_eq!(err.key(), Some("age[gt"));
//! ```

use thiserror::Error;

/// Result type for filter composition.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while composing a query from raw parameters.
#[derive(Error, Debug)]
pub enum FilterError {
    /// The `price` parameter is not a JSON object with numeric `min` and `max`.
    #[error("malformed price range {value:?}: {source}")]
    MalformedPrice {
        /// The raw parameter text.
        value: String,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A residual field-predicate parameter has an unusable structure.
    #[error("malformed parameter '{key}': {reason}")]
    MalformedParameter {
        /// The offending parameter key.
        key: String,
        /// Why it could not be used.
        reason: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl FilterError {
    /// Create a malformed price error.
    pub fn malformed_price(value: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedPrice {
            value: value.into(),
            source,
        }
    }

    /// Create a malformed parameter error.
    pub fn malformed_parameter(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedParameter {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// The parameter key this error is about, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MalformedPrice { .. } => Some("price"),
            Self::MalformedParameter { key, .. } => Some(key),
            Self::Config(_) | Self::ConfigParse(_) => None,
        }
    }

    /// Check if this error was caused by request input rather than setup.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedPrice { .. } | Self::MalformedParameter { .. }
        )
    }

    /// Check if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::ConfigParse(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_price_display() {
        let source = serde_json::from_str::<serde_json::Value>("not-json").unwrap_err();
        let err = FilterError::malformed_price("not-json", source);

        assert!(err.is_client_error());
        assert_eq!(err.key(), Some("price"));
        assert!(err.to_string().starts_with("malformed price range \"not-json\""));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_malformed_parameter_display() {
        let err = FilterError::malformed_parameter("age", "used as both value and object");
        assert_eq!(
            err.to_string(),
            "malformed parameter 'age': used as both value and object"
        );
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_config_error() {
        let err = FilterError::config("default_sort must not be empty");
        assert!(err.is_config_error());
        assert!(!err.is_client_error());
        assert_eq!(err.key(), None);
        assert_eq!(
            err.to_string(),
            "configuration error: default_sort must not be empty"
        );
    }
}
