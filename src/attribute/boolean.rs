//! Boolean attribute kind
//!
//! A boolean can never serve as a key component; the key-flag rejection
//! fires even for a structurally valid boolean value.

use super::{apply_mode, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use std::fmt;

/// Options for a boolean attribute
#[derive(Clone, Default)]
pub struct BooleanOptions {
    pub base: BaseOptions,
    pub validate: Option<Validate<bool>>,
    pub transform: Option<Transform<bool>>,
    pub default: Option<DefaultFn<bool>>,
}

impl BooleanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the storage field name
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
        self
    }

    /// Flag as partition key (always rejected at validation time)
    pub fn partition_key(mut self, flag: bool) -> Self {
        self.base.partition_key = flag;
        self
    }

    /// Flag as sort key (always rejected at validation time)
    pub fn sort_key(mut self, flag: bool) -> Self {
        self.base.sort_key = flag;
        self
    }

    /// Exclude from item serialization
    pub fn ignore(mut self, flag: bool) -> Self {
        self.base.ignore = flag;
        self
    }

    /// Absent input becomes a validation failure
    pub fn required(mut self, flag: bool) -> Self {
        self.base.required = flag;
        self
    }

    /// Custom validator returning a rejection message
    pub fn validate(mut self, f: Validate<bool>) -> Self {
        self.validate = Some(f);
        self
    }

    /// Transform applied after coercion, before validation
    pub fn transform(mut self, f: Transform<bool>) -> Self {
        self.transform = Some(f);
        self
    }

    /// Default generator invoked for absent input
    pub fn default_fn(mut self, f: DefaultFn<bool>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for BooleanOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BooleanOptions")
            .field("base", &self.base)
            .finish()
    }
}

/// Boolean value holder
#[derive(Debug, Clone)]
pub struct BooleanAttribute {
    property_name: String,
    options: BooleanOptions,
    profile: Profile,
    value: Option<bool>,
    changed: bool,
    issues: Issues,
}

impl BooleanAttribute {
    /// Create a boolean attribute bound to a property name
    pub fn new(property_name: impl Into<String>, options: BooleanOptions, profile: Profile) -> Self {
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

    pub fn value(&self) -> Option<bool> {
        self.value
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

    /// Mode-independent setter: validates, stores on success, and returns
    /// the issues on failure without touching the accumulator
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::Bool(b)) => Some(b),
            Some(other) => {
                return Err(Issue::new("value", "boolean", other.type_name()).into());
            }
        };
        if let (Some(v), Some(transform)) = (value, &self.options.transform) {
            value = Some(transform(v));
        }

        let issues = self.parse(value);
        if issues.has_issues() {
            return Err(issues);
        }

        if self.value != value {
            self.changed = true;
            self.value = value;
        }
        Ok(())
    }

    fn parse(&self, value: Option<bool>) -> Issues {
        let mut issues = Issues::new();
        match value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "boolean", "undefined"));
                }
            }
            Some(v) => {
                if self.options.base.partition_key {
                    issues.add_issue(Issue::with_message(
                        "PartitionKey",
                        "Partition key cannot be a boolean",
                    ));
                } else if self.options.base.sort_key {
                    issues.add_issue(Issue::with_message(
                        "SortKey",
                        "Sort key cannot be a boolean",
                    ));
                }
                if let Some(validate) = &self.options.validate {
                    if let Some(message) = validate(&v) {
                        issues.add_issue(Issue::with_message("value", message));
                    }
                }
            }
        }
        issues
    }
}
