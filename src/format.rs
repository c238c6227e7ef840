//! Format engine
//!
//! Templates contain `{placeholder}` tokens interleaved with literal text.
//! The placeholder sequence, not the raw template, decides whether an
//! attribute is formatted: zero placeholders means a plain value.

use crate::value::Data;
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{(.+?)\}").expect("placeholder pattern"))
}

/// Extract the placeholder names appearing in `{name}` form
///
/// Names are returned in order of first occurrence, de-duplicated. An empty
/// result means the template is a plain value.
pub fn find_composite_attributes(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for capture in placeholder_pattern().captures_iter(template) {
        let name = capture[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Substitute values from `data` into `template`
///
/// Every occurrence of `{key}` is replaced with the stringified value for
/// each key present in `data`. Placeholders with no matching key are left
/// literally in place, which enables partial application during incremental
/// construction.
pub fn apply_format(template: &str, data: &Data) -> String {
    let mut result = template.to_string();
    for (key, value) in data {
        let token = format!("{{{key}}}");
        if result.contains(&token) {
            result = result.replace(&token, &value.to_string());
        }
    }
    result
}
