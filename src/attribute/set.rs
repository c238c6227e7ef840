//! Set attribute kinds
//!
//! String and number sets with cardinality checks. The underlying
//! mathematical set has no persisted order, so both kinds keep their
//! elements sorted and expose a `plain` accessor producing the ordered
//! sequence used for serialization.

use super::{apply_mode, parse_cardinality, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use std::fmt;

// =============================================================================
// String Set
// =============================================================================

/// Options for a string-set attribute
#[derive(Clone, Default)]
pub struct StringSetOptions {
    pub base: BaseOptions,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub size: Option<usize>,
    pub validate: Option<Validate<Vec<String>>>,
    pub transform: Option<Transform<Vec<String>>>,
    pub default: Option<DefaultFn<Vec<String>>>,
}

impl StringSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
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

    pub fn min(mut self, count: usize) -> Self {
        self.min = Some(count);
        self
    }

    pub fn max(mut self, count: usize) -> Self {
        self.max = Some(count);
        self
    }

    pub fn size(mut self, count: usize) -> Self {
        self.size = Some(count);
        self
    }

    pub fn validate(mut self, f: Validate<Vec<String>>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<Vec<String>>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<Vec<String>>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for StringSetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringSetOptions")
            .field("base", &self.base)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("size", &self.size)
            .finish()
    }
}

/// String-set value holder
#[derive(Debug, Clone)]
pub struct StringSetAttribute {
    property_name: String,
    options: StringSetOptions,
    profile: Profile,
    value: Option<Vec<String>>,
    changed: bool,
    issues: Issues,
}

impl StringSetAttribute {
    /// Create a string-set attribute bound to a property name
    pub fn new(
        property_name: impl Into<String>,
        options: StringSetOptions,
        profile: Profile,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            options,
            profile,
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

    pub fn value(&self) -> Option<&[String]> {
        self.value.as_deref()
    }

    /// Ordered element sequence for serialization
    pub fn plain(&self) -> Option<&[String]> {
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

    /// Mode-aware setter
    pub fn set(&mut self, input: Option<Value>) -> Result<()> {
        let profile = self.profile;
        let outcome = self.try_set(input);
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-independent setter; requires a string-set value
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::StringSet(set)) => Some(set),
            Some(other) => {
                return Err(Issue::new("value", "Set<string>", other.type_name()).into());
            }
        };
        if let (Some(v), Some(transform)) = (value.clone(), &self.options.transform) {
            value = Some(transform(v));
        }
        // Set semantics regardless of how the elements arrived.
        if let Some(set) = &mut value {
            set.sort();
            set.dedup();
        }

        let mut issues = Issues::new();
        match &value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "Set<string>", "undefined"));
                }
            }
            Some(set) => {
                parse_cardinality(
                    &mut issues,
                    set.len(),
                    self.options.min,
                    self.options.max,
                    self.options.size,
                );
                if let Some(validate) = &self.options.validate {
                    if let Some(message) = validate(set) {
                        issues.add_issue(Issue::with_message("value", message));
                    }
                }
            }
        }
        if issues.has_issues() {
            return Err(issues);
        }

        if self.value != value {
            self.changed = true;
            self.value = value;
        }
        Ok(())
    }
}

// =============================================================================
// Number Set
// =============================================================================

/// Options for a number-set attribute
#[derive(Clone, Default)]
pub struct NumberSetOptions {
    pub base: BaseOptions,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub size: Option<usize>,
    pub validate: Option<Validate<Vec<f64>>>,
    pub transform: Option<Transform<Vec<f64>>>,
    pub default: Option<DefaultFn<Vec<f64>>>,
}

impl NumberSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
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

    pub fn min(mut self, count: usize) -> Self {
        self.min = Some(count);
        self
    }

    pub fn max(mut self, count: usize) -> Self {
        self.max = Some(count);
        self
    }

    pub fn size(mut self, count: usize) -> Self {
        self.size = Some(count);
        self
    }

    pub fn validate(mut self, f: Validate<Vec<f64>>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<Vec<f64>>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<Vec<f64>>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for NumberSetOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberSetOptions")
            .field("base", &self.base)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("size", &self.size)
            .finish()
    }
}

/// Number-set value holder
#[derive(Debug, Clone)]
pub struct NumberSetAttribute {
    property_name: String,
    options: NumberSetOptions,
    profile: Profile,
    value: Option<Vec<f64>>,
    changed: bool,
    issues: Issues,
}

impl NumberSetAttribute {
    /// Create a number-set attribute bound to a property name
    pub fn new(
        property_name: impl Into<String>,
        options: NumberSetOptions,
        profile: Profile,
    ) -> Self {
        Self {
            property_name: property_name.into(),
            options,
            profile,
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

    pub fn value(&self) -> Option<&[f64]> {
        self.value.as_deref()
    }

    /// Ordered element sequence for serialization
    pub fn plain(&self) -> Option<&[f64]> {
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

    /// Mode-aware setter
    pub fn set(&mut self, input: Option<Value>) -> Result<()> {
        let profile = self.profile;
        let outcome = self.try_set(input);
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-independent setter; requires a number-set value
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::NumberSet(set)) => Some(set),
            Some(other) => {
                return Err(Issue::new("value", "Set<number>", other.type_name()).into());
            }
        };
        if let (Some(v), Some(transform)) = (value.clone(), &self.options.transform) {
            value = Some(transform(v));
        }
        if let Some(set) = &mut value {
            set.sort_by(f64::total_cmp);
            set.dedup_by(|a, b| a.total_cmp(b).is_eq());
        }

        let mut issues = Issues::new();
        match &value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "Set<number>", "undefined"));
                }
            }
            Some(set) => {
                parse_cardinality(
                    &mut issues,
                    set.len(),
                    self.options.min,
                    self.options.max,
                    self.options.size,
                );
                if let Some(validate) = &self.options.validate {
                    if let Some(message) = validate(set) {
                        issues.add_issue(Issue::with_message("value", message));
                    }
                }
            }
        }
        if issues.has_issues() {
            return Err(issues);
        }

        if self.value != value {
            self.changed = true;
            self.value = value;
        }
        Ok(())
    }
}
