//! List attribute kind
//!
//! An ordered sequence of values with min/max/exact size checks.

use super::{apply_mode, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use std::fmt;

/// Options for a list attribute
#[derive(Clone, Default)]
pub struct ListOptions {
    pub base: BaseOptions,
    /// Minimum element count (inclusive)
    pub min: Option<usize>,
    /// Maximum element count (inclusive)
    pub max: Option<usize>,
    /// Exact element count
    pub size: Option<usize>,
    pub validate: Option<Validate<Vec<Value>>>,
    pub transform: Option<Transform<Vec<Value>>>,
    pub default: Option<DefaultFn<Vec<Value>>>,
}

impl ListOptions {
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

    pub fn validate(mut self, f: Validate<Vec<Value>>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<Vec<Value>>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<Vec<Value>>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for ListOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListOptions")
            .field("base", &self.base)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("size", &self.size)
            .finish()
    }
}

/// List value holder
#[derive(Debug, Clone)]
pub struct ListAttribute {
    property_name: String,
    options: ListOptions,
    profile: Profile,
    value: Option<Vec<Value>>,
    changed: bool,
    issues: Issues,
}

impl ListAttribute {
    /// Create a list attribute bound to a property name
    pub fn new(property_name: impl Into<String>, options: ListOptions, profile: Profile) -> Self {
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

    pub fn value(&self) -> Option<&[Value]> {
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

    /// Mode-independent setter
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::List(items)) => Some(items),
            Some(other) => {
                return Err(Issue::new("value", "array", other.type_name()).into());
            }
        };
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

    fn parse(&self, value: Option<&[Value]>) -> Issues {
        let mut issues = Issues::new();
        let items = match value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "array", "undefined"));
                }
                return issues;
            }
            Some(items) => items,
        };

        let count = items.len();
        if let Some(min) = self.options.min {
            if count < min {
                issues.add_issue(Issue::new("size", format!("{min}<="), count.to_string()));
            }
        }
        if let Some(max) = self.options.max {
            if count > max {
                issues.add_issue(Issue::new("size", format!("<={max}"), count.to_string()));
            }
        }
        if let Some(size) = self.options.size {
            if count != size {
                issues.add_issue(Issue::new("size", size.to_string(), count.to_string()));
            }
        }

        if let Some(validate) = &self.options.validate {
            if let Some(message) = validate(&items.to_vec()) {
                issues.add_issue(Issue::with_message("value", message));
            }
        }
        issues
    }
}
