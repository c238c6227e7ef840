//! Attribute Tests
//!
//! Tests for the attribute kinds: coercion, bounds, change tracking and
//! error-mode behavior.

use itemforge::attribute::{
    BooleanAttribute, BooleanOptions, ListAttribute, ListOptions, MapAttribute, MapOptions,
    NumberAttribute, NumberOptions, NumberSetAttribute, NumberSetOptions, SoftDeleteAttribute,
    SoftDeleteOptions, StringAttribute, StringMode, StringOptions, StringSetAttribute,
    StringSetOptions, TimestampAttribute, TimestampMode, TimestampOn, TimestampOptions,
    UpdateTokenAttribute, UpdateTokenOptions,
};
use itemforge::{Data, ForgeError, Profile, Value};
use std::sync::Arc;

// =============================================================================
// Number Bound Tests
// =============================================================================

#[test]
fn test_number_inclusive_bounds_accept_edges() {
    let mut attr = NumberAttribute::new(
        "age",
        NumberOptions::new().gte(5.0).lte(10.0),
        Profile::default(),
    );
    attr.set(Some(Value::from(5))).unwrap();
    assert_eq!(attr.value(), Some(5.0));
    attr.set(Some(Value::from(10))).unwrap();
    assert_eq!(attr.value(), Some(10.0));
}

#[test]
fn test_number_inclusive_bounds_reject_outside() {
    let mut attr = NumberAttribute::new(
        "age",
        NumberOptions::new().gte(5.0).lte(10.0),
        Profile::default(),
    );

    let err = attr.set(Some(Value::from(4))).unwrap_err();
    let issues = err.issues().expect("validation error");
    let issue = issues.iter().next().unwrap();
    assert_eq!(issue.expected.as_deref(), Some(">=5"));
    assert_eq!(issue.received.as_deref(), Some("4"));

    let err = attr.set(Some(Value::from(11))).unwrap_err();
    let issues = err.issues().expect("validation error");
    let issue = issues.iter().next().unwrap();
    assert_eq!(issue.expected.as_deref(), Some("<=10"));
    assert_eq!(issue.received.as_deref(), Some("11"));

    // Rejected assignments never disturb the stored value.
    assert_eq!(attr.value(), None);
    assert!(!attr.changed());
}

#[test]
fn test_number_multiple_bound_violations_report_independently() {
    let mut attr = NumberAttribute::new(
        "n",
        NumberOptions::new().gt(10.0).gte(20.0),
        Profile::default(),
    );
    let err = attr.set(Some(Value::from(5))).unwrap_err();
    assert_eq!(err.issues().expect("validation error").len(), 2);
}

#[test]
fn test_number_float_and_int_never_flagged_together() {
    let mut attr = NumberAttribute::new(
        "n",
        NumberOptions::new().float(true).int(true),
        Profile::default(),
    );
    let err = attr.set(Some(Value::from(3))).unwrap_err();
    let issues = err.issues().expect("validation error");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues.iter().next().unwrap().expected.as_deref(), Some("float"));
}

#[test]
fn test_number_rejects_wrong_type() {
    let mut attr = NumberAttribute::new("n", NumberOptions::new(), Profile::default());
    let err = attr.set(Some(Value::from("five"))).unwrap_err();
    let issue_message = err.issues().expect("validation error").message();
    assert_eq!(
        issue_message,
        "\"value\" is expected to be \"number\" but received \"string\"."
    );
}

// =============================================================================
// Change Tracking Tests
// =============================================================================

#[test]
fn test_changed_flips_once_for_identical_assignments() {
    let mut attr = NumberAttribute::new("n", NumberOptions::new(), Profile::default());
    assert!(!attr.changed());

    attr.set(Some(Value::from(7))).unwrap();
    assert!(attr.changed());

    // A second identical assignment must not be treated as a new change.
    let mut again = NumberAttribute::new("n", NumberOptions::new(), Profile::default());
    again.set(Some(Value::from(7))).unwrap();
    assert!(again.changed());
    again.set(Some(Value::from(7))).unwrap();
    assert!(again.changed());
    assert_eq!(again.value(), Some(7.0));
}

#[test]
fn test_transform_applies_before_storage() {
    let mut attr = StringAttribute::new(
        "name",
        StringOptions::new().transform(Arc::new(|s: String| s.to_uppercase())),
        Profile::default(),
    );
    attr.set(Some(Value::from("hello"))).unwrap();
    assert_eq!(attr.value(), Some("HELLO"));
}

#[test]
fn test_default_generator_fills_absent_input() {
    let mut attr = StringAttribute::new(
        "status",
        StringOptions::new().default_fn(Arc::new(|| "active".to_string())),
        Profile::default(),
    );
    attr.set(None).unwrap();
    assert_eq!(attr.value(), Some("active"));
    assert!(attr.changed());
}

// =============================================================================
// Boolean Tests
// =============================================================================

#[test]
fn test_boolean_rejects_partition_key_flag() {
    let mut options = BooleanOptions::new();
    options.base.partition_key = true;
    let mut attr = BooleanAttribute::new("flag", options, Profile::default());

    let err = attr.set(Some(Value::from(true))).unwrap_err();
    let issues = err.issues().expect("validation error");
    assert_eq!(issues.message(), "Partition key cannot be a boolean.");
}

#[test]
fn test_boolean_required_rejects_absent_input() {
    let mut attr = BooleanAttribute::new(
        "flag",
        BooleanOptions::new().required(true),
        Profile::default(),
    );
    let err = attr.set(None).unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
}

// =============================================================================
// String Tests
// =============================================================================

#[test]
fn test_string_length_bounds() {
    let mut attr = StringAttribute::new(
        "code",
        StringOptions::new().min(2).max(4),
        Profile::default(),
    );
    attr.set(Some(Value::from("abc"))).unwrap();
    assert_eq!(attr.value(), Some("abc"));

    assert!(attr.set(Some(Value::from("a"))).is_err());
    assert!(attr.set(Some(Value::from("abcde"))).is_err());
    assert_eq!(attr.value(), Some("abc"));
}

#[test]
fn test_string_one_of_membership() {
    let mut attr = StringAttribute::new(
        "color",
        StringOptions::new().one_of(["red", "green", "blue"]),
        Profile::default(),
    );
    attr.set(Some(Value::from("green"))).unwrap();

    let err = attr.set(Some(Value::from("purple"))).unwrap_err();
    let issue = err.issues().expect("validation error").iter().next().cloned().unwrap();
    assert_eq!(issue.expected.as_deref(), Some("\"red\" | \"green\" | \"blue\""));
}

#[test]
fn test_string_ulid_mode() {
    let mut attr = StringAttribute::new(
        "id",
        StringOptions::new().mode(StringMode::Ulid),
        Profile::default(),
    );
    attr.set(Some(Value::from("01ARZ3NDEKTSV4RRFFQ69G5FAV"))).unwrap();
    assert!(attr.set(Some(Value::from("not-a-ulid"))).is_err());
}

#[test]
fn test_string_email_mode() {
    let mut attr = StringAttribute::new(
        "email",
        StringOptions::new().mode(StringMode::Email),
        Profile::default(),
    );
    attr.set(Some(Value::from("user@example.com"))).unwrap();
    assert!(attr.set(Some(Value::from("user-example.com"))).is_err());
}

#[test]
fn test_formatted_string_rejects_scalar_assignment() {
    let mut attr = StringAttribute::new(
        "pk",
        StringOptions::new().format("{tenant}#{id}"),
        Profile::default(),
    );
    let err = attr.set(Some(Value::from("tenant#id"))).unwrap_err();
    assert_eq!(
        err.issues().expect("validation error").message(),
        "\"value\" must be an \"object\" when there is a \"format\"."
    );
}

#[test]
fn test_plain_string_rejects_object_assignment() {
    let mut attr = StringAttribute::new("name", StringOptions::new(), Profile::default());
    let err = attr.set(Some(Value::Map(Data::new()))).unwrap_err();
    assert_eq!(
        err.issues().expect("validation error").message(),
        "\"value\" must be a \"string\" when there is no \"format\"."
    );
}

#[test]
fn test_formatted_string_composite_application() {
    let mut attr = StringAttribute::new(
        "pk",
        StringOptions::new().format("{tenant}#{id}"),
        Profile::default(),
    );
    let mut data = Data::new();
    data.insert("tenant".to_string(), Value::from("acme"));
    data.insert("id".to_string(), Value::from("42"));
    data.insert("unrelated".to_string(), Value::from("ignored"));

    attr.apply(&data).unwrap();
    assert_eq!(attr.value(), Some("acme#42"));
    assert_eq!(attr.composite_attributes(), ["tenant", "id"]);
}

#[test]
fn test_formatted_string_delimiter_segment_mismatch() {
    let mut attr = StringAttribute::new(
        "pk",
        StringOptions::new().format("{tenant}#{id}"),
        Profile::default(),
    );
    // A source value containing the delimiter shifts the segment count.
    let mut data = Data::new();
    data.insert("tenant".to_string(), Value::from("ac#me"));
    data.insert("id".to_string(), Value::from("42"));

    let err = attr.apply(&data).unwrap_err();
    assert_eq!(
        err.issues().expect("validation error").message(),
        "Format does not match."
    );
}

// =============================================================================
// Error Mode Tests
// =============================================================================

#[test]
fn test_silent_mode_accumulates_instead_of_failing() {
    let profile = Profile::silent();
    let mut attr = NumberAttribute::new("n", NumberOptions::new().gte(5.0), profile);

    attr.set(Some(Value::from(1))).unwrap();
    assert!(attr.issues().has_issues());
    assert_eq!(attr.value(), None);

    attr.set(Some(Value::from(2))).unwrap();
    assert_eq!(attr.issues().len(), 2);

    attr.reset_errors();
    assert!(!attr.issues().has_issues());
}

#[test]
fn test_strict_mode_leaves_accumulator_untouched() {
    let mut attr = NumberAttribute::new("n", NumberOptions::new().gte(5.0), Profile::default());
    assert!(attr.set(Some(Value::from(1))).is_err());
    assert!(!attr.issues().has_issues());
}

// =============================================================================
// Timestamp Tests
// =============================================================================

#[test]
fn test_timestamp_on_create_stamps_at_construction() {
    let attr = TimestampAttribute::new(
        "created_at",
        TimestampOptions::new(TimestampOn::Create, TimestampMode::Iso),
        Profile::default(),
    );
    assert!(attr.value().is_some());
    assert!(attr.changed());
    assert!(attr.date().is_some());
}

#[test]
fn test_timestamp_on_update_starts_empty() {
    let attr = TimestampAttribute::new(
        "updated_at",
        TimestampOptions::new(TimestampOn::Update, TimestampMode::Millis),
        Profile::default(),
    );
    assert!(attr.value().is_none());
    assert!(!attr.changed());
}

#[test]
fn test_timestamp_iso_rejects_non_date_string() {
    let mut attr = TimestampAttribute::new(
        "created_at",
        TimestampOptions::new(TimestampOn::Create, TimestampMode::Iso),
        Profile::default(),
    );
    let err = attr.set(Some(Value::from("yesterday"))).unwrap_err();
    let issue = err.issues().expect("validation error").iter().next().cloned().unwrap();
    assert_eq!(issue.expected.as_deref(), Some("ISO_DATE"));
}

#[test]
fn test_timestamp_millis_rejects_string() {
    let mut attr = TimestampAttribute::new(
        "updated_at",
        TimestampOptions::new(TimestampOn::Update, TimestampMode::Seconds),
        Profile::default(),
    );
    assert!(attr.set(Some(Value::from("1700000000"))).is_err());
    attr.set(Some(Value::from(1_700_000_000))).unwrap();
    assert!(attr.date().is_some());
}

// =============================================================================
// Soft-Delete Tests
// =============================================================================

#[test]
fn test_soft_delete_defaults_false() {
    let mut attr = SoftDeleteAttribute::new("deleted", SoftDeleteOptions::new(), Profile::default());
    assert!(!attr.value());
    assert!(!attr.changed());

    attr.set(Some(Value::from(true))).unwrap();
    assert!(attr.value());
    assert!(attr.changed());
}

#[test]
fn test_soft_delete_absent_input_takes_default() {
    let mut attr = SoftDeleteAttribute::new("deleted", SoftDeleteOptions::new(), Profile::default());
    attr.set(None).unwrap();
    assert!(!attr.value());
    assert!(!attr.changed());
}

// =============================================================================
// Update-Token Tests
// =============================================================================

#[test]
fn test_token_generated_at_construction() {
    let attr = UpdateTokenAttribute::new("token", UpdateTokenOptions::new(), Profile::default());
    assert_eq!(attr.value().len(), 6);
    assert!(attr.value().chars().all(|c| c.is_ascii_alphanumeric()));
    assert!(attr.changed());
}

#[test]
fn test_token_honors_configured_length() {
    let attr = UpdateTokenAttribute::new(
        "token",
        UpdateTokenOptions::new().length(12),
        Profile::default(),
    );
    assert_eq!(attr.value().len(), 12);
}

#[test]
fn test_token_reset_always_produces_a_different_token() {
    let mut attr = UpdateTokenAttribute::new("token", UpdateTokenOptions::new(), Profile::default());
    for _ in 0..20 {
        let before = attr.value().to_string();
        attr.reset();
        assert_ne!(attr.value(), before);
    }
}

#[test]
fn test_token_direct_assignment_validates_length() {
    let mut attr = UpdateTokenAttribute::new("token", UpdateTokenOptions::new(), Profile::default());
    attr.set(Some(Value::from("abc123"))).unwrap();
    assert_eq!(attr.value(), "abc123");

    let err = attr.set(Some(Value::from("toolongtoken"))).unwrap_err();
    let issue = err.issues().expect("validation error").iter().next().cloned().unwrap();
    assert_eq!(issue.path, "length");
    assert_eq!(issue.expected.as_deref(), Some("6"));
    assert_eq!(issue.received.as_deref(), Some("12"));
}

// =============================================================================
// Collection Tests
// =============================================================================

#[test]
fn test_list_size_bounds() {
    let mut attr = ListAttribute::new("tags", ListOptions::new().min(1).max(2), Profile::default());
    attr.set(Some(Value::List(vec![Value::from("a")]))).unwrap();

    let err = attr
        .set(Some(Value::List(vec![
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
        ])))
        .unwrap_err();
    let issue = err.issues().expect("validation error").iter().next().cloned().unwrap();
    assert_eq!(issue.path, "size");
    assert_eq!(issue.expected.as_deref(), Some("<=2"));
}

#[test]
fn test_map_rejects_non_object() {
    let mut attr = MapAttribute::new("meta", MapOptions::new(), Profile::default());
    assert!(attr.set(Some(Value::List(vec![]))).is_err());
    assert!(attr.set(Some(Value::from("x"))).is_err());

    let mut meta = Data::new();
    meta.insert("k".to_string(), Value::from("v"));
    attr.set(Some(Value::Map(meta.clone()))).unwrap();
    assert_eq!(attr.value(), Some(&meta));
}

#[test]
fn test_map_cardinality_over_key_count() {
    let mut attr = MapAttribute::new(
        "meta",
        MapOptions::new().min(1).max(2),
        Profile::default(),
    );

    let mut one = Data::new();
    one.insert("k1".to_string(), Value::from("v1"));
    attr.set(Some(Value::Map(one))).unwrap();

    let err = attr.set(Some(Value::Map(Data::new()))).unwrap_err();
    let issue = err.issues().expect("validation error").iter().next().cloned().unwrap();
    assert_eq!(issue.path, "size");
    assert_eq!(issue.expected.as_deref(), Some("1<="));

    let mut three = Data::new();
    three.insert("k1".to_string(), Value::from("v1"));
    three.insert("k2".to_string(), Value::from("v2"));
    three.insert("k3".to_string(), Value::from("v3"));
    let err = attr.set(Some(Value::Map(three))).unwrap_err();
    let issue = err.issues().expect("validation error").iter().next().cloned().unwrap();
    assert_eq!(issue.expected.as_deref(), Some("<=2"));
}

#[test]
fn test_map_exact_size() {
    let mut attr = MapAttribute::new("pair", MapOptions::new().size(2), Profile::default());
    let mut two = Data::new();
    two.insert("a".to_string(), Value::from(1));
    two.insert("b".to_string(), Value::from(2));
    attr.set(Some(Value::Map(two))).unwrap();

    let mut one = Data::new();
    one.insert("a".to_string(), Value::from(1));
    assert!(attr.set(Some(Value::Map(one))).is_err());
}

#[test]
fn test_string_set_sorts_and_deduplicates() {
    let mut attr = StringSetAttribute::new("roles", StringSetOptions::new(), Profile::default());
    attr.set(Some(Value::string_set(["writer", "admin", "writer"])))
        .unwrap();
    assert_eq!(attr.plain(), Some(&["admin".to_string(), "writer".to_string()][..]));
}

#[test]
fn test_number_set_cardinality() {
    let mut attr = NumberSetAttribute::new(
        "scores",
        NumberSetOptions::new().size(2),
        Profile::default(),
    );
    attr.set(Some(Value::number_set([2.0, 1.0]))).unwrap();
    assert_eq!(attr.plain(), Some(&[1.0, 2.0][..]));

    assert!(attr.set(Some(Value::number_set([1.0]))).is_err());
}
