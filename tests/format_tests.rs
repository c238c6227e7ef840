//! Format Engine Tests
//!
//! Tests for composite-template placeholder discovery and substitution.

use itemforge::format::{apply_format, find_composite_attributes};
use itemforge::{Data, Value};

// =============================================================================
// Placeholder Discovery Tests
// =============================================================================

#[test]
fn test_find_placeholders_in_order() {
    let names = find_composite_attributes("{tenant}#{region}#{id}");
    assert_eq!(names, vec!["tenant", "region", "id"]);
}

#[test]
fn test_find_placeholders_deduplicated_by_first_occurrence() {
    let names = find_composite_attributes("{a}#{b}#{a}#{c}#{b}");
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_find_placeholders_none() {
    let names = find_composite_attributes("plain-template-without-placeholders");
    assert!(names.is_empty());
}

#[test]
fn test_find_placeholders_ignores_constant_segments() {
    let names = find_composite_attributes("{a}#Constant#{b}");
    assert_eq!(names, vec!["a", "b"]);
}

// =============================================================================
// Substitution Tests
// =============================================================================

#[test]
fn test_apply_format_full_substitution() {
    let mut data = Data::new();
    data.insert("a".to_string(), Value::from("A"));
    data.insert("b".to_string(), Value::from("B"));
    data.insert("c".to_string(), Value::from("C"));

    let result = apply_format("{a}#{b}#ConstantPart#{c}", &data);
    assert_eq!(result, "A#B#ConstantPart#C");
}

#[test]
fn test_apply_format_unmatched_keys_leave_template_untouched() {
    let mut data = Data::new();
    data.insert("x".to_string(), Value::from(1));

    let result = apply_format("{a}#{b}#ConstantPart#{c}", &data);
    assert_eq!(result, "{a}#{b}#ConstantPart#{c}");
}

#[test]
fn test_apply_format_partial_substitution() {
    let mut data = Data::new();
    data.insert("a".to_string(), Value::from("A"));

    let result = apply_format("{a}#{b}", &data);
    assert_eq!(result, "A#{b}");
}

#[test]
fn test_apply_format_repeated_placeholder() {
    let mut data = Data::new();
    data.insert("a".to_string(), Value::from("X"));

    let result = apply_format("{a}-{a}", &data);
    assert_eq!(result, "X-X");
}

#[test]
fn test_apply_format_stringifies_numbers_without_decimal() {
    let mut data = Data::new();
    data.insert("year".to_string(), Value::from(2024));

    let result = apply_format("archive#{year}", &data);
    assert_eq!(result, "archive#2024");
}
