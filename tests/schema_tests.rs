//! Schema Tests
//!
//! Tests for structural validation at schema construction time.

use itemforge::attribute::{
    Attribute, BooleanAttribute, BooleanOptions, NumberAttribute, NumberOptions, StringAttribute,
    StringOptions,
};
use itemforge::{ForgeError, Profile, Schema};

fn string_attr(name: &str, options: StringOptions) -> Attribute {
    Attribute::String(StringAttribute::new(name, options, Profile::default()))
}

fn partition(name: &str) -> Attribute {
    string_attr(name, StringOptions::new().partition_key(true))
}

// =============================================================================
// Key Constraint Tests
// =============================================================================

#[test]
fn test_schema_with_one_partition_key_succeeds() {
    let schema = Schema::new(vec![
        partition("pk"),
        string_attr("name", StringOptions::new()),
    ])
    .unwrap();
    assert_eq!(schema.len(), 2);
}

#[test]
fn test_schema_with_partition_and_sort_key_succeeds() {
    let schema = Schema::new(vec![
        partition("pk"),
        string_attr("sk", StringOptions::new().sort_key(true)),
    ])
    .unwrap();
    assert!(schema.get("sk").unwrap().is_sort_key());
}

#[test]
fn test_schema_without_partition_key_fails() {
    let err = Schema::new(vec![string_attr("name", StringOptions::new())]).unwrap_err();
    assert!(matches!(err, ForgeError::Schema(_)));
    assert!(err.to_string().contains("exactly one partition key"));
}

#[test]
fn test_schema_with_two_partition_keys_fails() {
    let err = Schema::new(vec![partition("a"), partition("b")]).unwrap_err();
    assert!(err.to_string().contains("found 2"));
}

#[test]
fn test_schema_with_two_sort_keys_fails() {
    let err = Schema::new(vec![
        partition("pk"),
        string_attr("s1", StringOptions::new().sort_key(true)),
        string_attr("s2", StringOptions::new().sort_key(true)),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("at most one sort key"));
}

#[test]
fn test_schema_rejects_non_string_partition_key() {
    let mut options = BooleanOptions::new();
    options.base.partition_key = true;
    let err = Schema::new(vec![Attribute::Boolean(BooleanAttribute::new(
        "flag",
        options,
        Profile::default(),
    ))])
    .unwrap_err();
    assert!(err.to_string().contains("must be a string attribute"));
}

#[test]
fn test_schema_rejects_non_string_sort_key() {
    let mut options = NumberOptions::new();
    options.base.sort_key = true;
    let err = Schema::new(vec![
        partition("pk"),
        Attribute::Number(NumberAttribute::new("n", options, Profile::default())),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("must be a string attribute"));
}

// =============================================================================
// Field Name Tests
// =============================================================================

#[test]
fn test_schema_rejects_duplicate_effective_field_names() {
    // Different property names resolving to the same storage field.
    let err = Schema::new(vec![
        partition("pk"),
        string_attr("display_name", StringOptions::new().field_name("name")),
        string_attr("name", StringOptions::new()),
    ])
    .unwrap_err();
    assert!(err.to_string().contains("duplicate storage field name \"name\""));
}

#[test]
fn test_schema_allows_distinct_field_names_with_same_property_stub() {
    let schema = Schema::new(vec![
        partition("pk"),
        string_attr("name", StringOptions::new().field_name("n1")),
        string_attr("alias", StringOptions::new().field_name("n2")),
    ])
    .unwrap();
    assert_eq!(schema.get("name").unwrap().field_name(), "n1");
}

#[test]
fn test_schema_rejects_empty_attribute_list() {
    let err = Schema::new(Vec::new()).unwrap_err();
    assert!(matches!(err, ForgeError::Schema(_)));
}
