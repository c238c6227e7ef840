//! String attribute kind
//!
//! A string attribute is either plain or formatted. A formatted attribute
//! is constructed with a `{placeholder}` template; its value is derived
//! from other attributes via composite application and direct scalar
//! assignment is rejected.

use super::{apply_mode, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::format::{apply_format, find_composite_attributes};
use crate::value::{Data, Value};
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

// =============================================================================
// Built-in Semantic Modes
// =============================================================================

/// Built-in semantic validation modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringMode {
    Email,
    Ulid,
    Url,
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern"))
}

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.-]*://\S+$").expect("url pattern"))
}

fn ulid_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9A-HJKMNP-TV-Z]{26}$").expect("ulid pattern"))
}

// =============================================================================
// Options
// =============================================================================

/// Options for a string attribute
#[derive(Clone, Default)]
pub struct StringOptions {
    pub base: BaseOptions,
    /// Minimum length (inclusive)
    pub min: Option<usize>,
    /// Maximum length (inclusive)
    pub max: Option<usize>,
    /// Exact length
    pub length: Option<usize>,
    /// Regex the value must match
    pub regex: Option<Regex>,
    /// Allowed values; membership is validated
    pub one_of: Option<Vec<String>>,
    /// Built-in semantic mode
    pub mode: Option<StringMode>,
    /// Composite template; a non-empty placeholder set makes the attribute
    /// formatted
    pub format: Option<String>,
    pub validate: Option<Validate<String>>,
    pub transform: Option<Transform<String>>,
    pub default: Option<DefaultFn<String>>,
}

impl StringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
        self
    }

    pub fn partition_key(mut self, flag: bool) -> Self {
        self.base.partition_key = flag;
        self
    }

    pub fn sort_key(mut self, flag: bool) -> Self {
        self.base.sort_key = flag;
        self
    }

    pub fn ignore(mut self, flag: bool) -> Self {
        self.base.ignore = flag;
        self
    }

    pub fn required(mut self, flag: bool) -> Self {
        self.base.required = flag;
        self
    }

    pub fn min(mut self, length: usize) -> Self {
        self.min = Some(length);
        self
    }

    pub fn max(mut self, length: usize) -> Self {
        self.max = Some(length);
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn regex(mut self, pattern: Regex) -> Self {
        self.regex = Some(pattern);
        self
    }

    pub fn one_of<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    pub fn mode(mut self, mode: StringMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn format(mut self, template: impl Into<String>) -> Self {
        self.format = Some(template.into());
        self
    }

    pub fn validate(mut self, f: Validate<String>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<String>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<String>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for StringOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringOptions")
            .field("base", &self.base)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("length", &self.length)
            .field("regex", &self.regex.as_ref().map(Regex::as_str))
            .field("one_of", &self.one_of)
            .field("mode", &self.mode)
            .field("format", &self.format)
            .finish()
    }
}

// =============================================================================
// Attribute
// =============================================================================

/// String value holder, plain or formatted
#[derive(Debug, Clone)]
pub struct StringAttribute {
    property_name: String,
    options: StringOptions,
    profile: Profile,
    composite_attributes: Vec<String>,
    value: Option<String>,
    changed: bool,
    issues: Issues,
}

impl StringAttribute {
    /// Create a string attribute bound to a property name
    ///
    /// When the options carry a template with at least one placeholder the
    /// attribute becomes formatted.
    pub fn new(property_name: impl Into<String>, options: StringOptions, profile: Profile) -> Self {
        let composite_attributes = options
            .format
            .as_deref()
            .map(find_composite_attributes)
            .unwrap_or_default();
        Self {
            property_name: property_name.into(),
            options,
            profile,
            composite_attributes,
            value: None,
            changed: false,
            issues: Issues::new(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn base(&self) -> &BaseOptions {
        &self.options.base
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    pub fn issues(&self) -> &Issues {
        &self.issues
    }

    pub fn reset_errors(&mut self) {
        self.issues.reset();
    }

    pub(crate) fn mark_unchanged(&mut self) {
        self.changed = false;
    }

    /// Placeholder names referenced by the template, in order of first
    /// occurrence
    pub fn composite_attributes(&self) -> &[String] {
        &self.composite_attributes
    }

    /// True when the template references at least one placeholder
    pub fn is_formatted(&self) -> bool {
        !self.composite_attributes.is_empty()
    }

    /// Mode-aware scalar setter; rejected for formatted attributes
    pub fn set(&mut self, input: Option<Value>) -> Result<()> {
        let profile = self.profile;
        let outcome = self.try_set(input);
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-aware composite application: substitutes the placeholder names
    /// present in `data`, then validates the derived value
    pub fn apply(&mut self, data: &Data) -> Result<()> {
        let profile = self.profile;
        let outcome = self.try_apply(data);
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-independent scalar setter
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        if self.is_formatted() {
            return Err(Issue::with_message(
                "value",
                "\"value\" must be an \"object\" when there is a \"format\"",
            )
            .into());
        }
        let value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::String(s)) => Some(s),
            Some(Value::Map(_)) => {
                return Err(Issue::with_message(
                    "value",
                    "\"value\" must be a \"string\" when there is no \"format\"",
                )
                .into());
            }
            Some(other) => {
                return Err(Issue::new("value", "string", other.type_name()).into());
            }
        };
        self.finish(value)
    }

    /// Mode-aware assignment of an already-derived final value
    ///
    /// Used when reconstructing from a stored item, where the input carries
    /// the composed value rather than its sources. The delimiter
    /// segment-count check still applies.
    pub fn accept(&mut self, value: String) -> Result<()> {
        let profile = self.profile;
        let outcome = self.finish(Some(value));
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-independent composite application
    pub fn try_apply(&mut self, data: &Data) -> std::result::Result<(), Issues> {
        let template = match &self.options.format {
            Some(template) if self.is_formatted() => template.clone(),
            _ => {
                return Err(Issue::with_message("format", "attribute has no format template").into())
            }
        };
        // Only placeholder names are substituted; other keys are ignored.
        let sources: Data = data
            .iter()
            .filter(|(key, _)| self.composite_attributes.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        let value = apply_format(&template, &sources);
        self.finish(Some(value))
    }

    /// Shared tail of both assignment paths: transform, parse, store
    fn finish(&mut self, mut value: Option<String>) -> std::result::Result<(), Issues> {
        if let (Some(v), Some(transform)) = (value.clone(), &self.options.transform) {
            value = Some(transform(v));
        }

        let issues = self.parse(value.as_deref());
        if issues.has_issues() {
            return Err(issues);
        }

        if self.value != value {
            self.changed = true;
            self.value = value;
        }
        Ok(())
    }

    fn parse(&self, value: Option<&str>) -> Issues {
        let mut issues = Issues::new();
        let v = match value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "string", "undefined"));
                }
                return issues;
            }
            Some(v) => v,
        };

        let len = v.chars().count();
        if let Some(min) = self.options.min {
            if len < min {
                issues.add_issue(Issue::new("length", format!("{min}<="), len.to_string()));
            }
        }
        if let Some(max) = self.options.max {
            if len > max {
                issues.add_issue(Issue::new("length", format!("<={max}"), len.to_string()));
            }
        }
        if let Some(length) = self.options.length {
            if len != length {
                issues.add_issue(Issue::new("length", length.to_string(), len.to_string()));
            }
        }
        if let Some(regex) = &self.options.regex {
            if !regex.is_match(v) {
                issues.add_issue(Issue::new("regex", regex.as_str(), v));
            }
        }

        match self.options.mode {
            Some(StringMode::Ulid) if !ulid_pattern().is_match(v) => {
                issues.add_issue(Issue::new("mode", "ulid", v));
            }
            Some(StringMode::Email) if !email_pattern().is_match(v) => {
                issues.add_issue(Issue::new("mode", "email", v));
            }
            Some(StringMode::Url) if !url_pattern().is_match(v) => {
                issues.add_issue(Issue::new("mode", "url", v));
            }
            _ => {}
        }

        if let Some(allowed) = &self.options.one_of {
            if !allowed.iter().any(|a| a == v) {
                issues.add_issue(Issue::new("enum", render_allowed(allowed), v));
            }
        }

        // A derived value must keep the template's segment count; a source
        // value containing the delimiter would silently shift segments.
        if let Some(template) = &self.options.format {
            if self.is_formatted() {
                let delimiter = self.profile.delimiter;
                let expected = template.split(delimiter).count();
                let received = v.split(delimiter).count();
                if expected != received {
                    issues.add_issue(Issue::with_message("format", "Format does not match"));
                }
            }
        }

        if let Some(validate) = &self.options.validate {
            if let Some(message) = validate(&v.to_string()) {
                issues.add_issue(Issue::with_message("value", message));
            }
        }
        issues
    }
}

/// Render an allowed-values list: at most the first three, then an ellipsis
fn render_allowed(allowed: &[String]) -> String {
    let shown = allowed
        .iter()
        .take(3)
        .map(|a| format!("\"{a}\""))
        .collect::<Vec<_>>()
        .join(" | ");
    if allowed.len() > 3 {
        format!("{shown} | ...")
    } else {
        shown
    }
}
