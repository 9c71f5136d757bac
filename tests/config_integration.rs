//! Integration tests for configuration loading and its effect on composition.

use pretty_assertions::assert_eq;
use sift::prelude::*;

/// Test a catalog whose documents use different field names
#[test]
fn test_config_from_toml_drives_composition() {
    let config = FilterConfig::from_toml_str(
        r#"
        keyword_field = "title"
        keyword_options = "im"
        color_field = "variants.color"
        size_field = "variants.size"
        price_field = "pricing.amount"
        default_sort = "-updatedAt,title"
        pagination_keys = ["page", "per_page"]
        "#,
    )
    .expect("Failed to parse config");

    let params = RawParameters::from_query_str("keyword=polo&size=M&per_page=50&limit=5&sort=");
    let query = FilterComposer::with_config(FindQuery::new("products"), &params, &config)
        .apply_all()
        .unwrap()
        .finish();

    assert_eq!(
        query.clauses(),
        &[
            doc! { "title": { "$regex": "polo", "$options": "im" } },
            doc! { "variants.size": { "$in": ["M"] } },
            doc! { "limit": "5" },
        ]
    );
    assert_eq!(query.sort_document(), Some(doc! { "updatedAt": -1, "title": 1 }));
}

/// Test that an empty file keeps the catalog defaults
#[test]
fn test_config_empty_toml() {
    let config = FilterConfig::from_toml_str("").expect("Failed to parse config");
    assert_eq!(config, FilterConfig::default());
    assert_eq!(config.default_order().to_sort_string(), "-createdAt");
}

/// Test that misspelled keys are rejected
#[test]
fn test_config_unknown_key() {
    let err = FilterConfig::from_toml_str("colour_field = \"tint\"").unwrap_err();
    assert!(matches!(err, FilterError::ConfigParse(_)));
    assert!(!err.is_client_error());
}

/// Test that an operator used as a field path is rejected
#[test]
fn test_config_operator_field() {
    let err = FilterConfig::from_toml_str("category_field = \"$where\"").unwrap_err();
    assert!(err.is_config_error());
}

/// Test that a default sort without fields is rejected
#[test]
fn test_config_empty_default_sort() {
    let err = FilterConfig::from_toml_str("default_sort = \" , \"").unwrap_err();
    assert!(err.is_config_error());
}

/// Test escaping the keyword for literal matching
#[test]
fn test_config_escape_keyword() {
    let config = FilterConfig::from_toml_str("escape_keyword = true").unwrap();
    let params = RawParameters::from_query_str("keyword=1%2B1");

    let query = FilterComposer::with_config(FindQuery::new("products"), &params, &config)
        .search()
        .finish();

    assert_eq!(
        query.filter_document(),
        doc! { "name": { "$regex": "1\\+1", "$options": "i" } }
    );
}

/// Test that one configuration serves many requests
#[test]
fn test_config_shared_across_requests() {
    let config = FilterConfig::builder().size_field("sku.size").build().unwrap();

    for size in ["S", "M", "L"] {
        let params = RawParameters::new().with("size", size);
        let (query, report) = FilterComposer::with_config(FindQuery::new("products"), &params, &config)
            .size()
            .into_parts();
        assert_eq!(query.filter_document(), doc! { "sku.size": { "$in": [size] } });
        assert_eq!(report.outcome(FilterKind::Size), Some(&FilterOutcome::Applied));
    }
}
