//! Map attribute kind
//!
//! A plain string-keyed object with min/max/exact key-count checks; any
//! other shape (array, scalar, set) is a type error.

use super::{apply_mode, parse_cardinality, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::{Data, Value};
use std::fmt;

/// Options for a map attribute
#[derive(Clone, Default)]
pub struct MapOptions {
    pub base: BaseOptions,
    /// Minimum key count (inclusive)
    pub min: Option<usize>,
    /// Maximum key count (inclusive)
    pub max: Option<usize>,
    /// Exact key count
    pub size: Option<usize>,
    pub validate: Option<Validate<Data>>,
    pub transform: Option<Transform<Data>>,
    pub default: Option<DefaultFn<Data>>,
}

impl MapOptions {
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

    pub fn validate(mut self, f: Validate<Data>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<Data>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<Data>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for MapOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapOptions")
            .field("base", &self.base)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("size", &self.size)
            .finish()
    }
}

/// Map value holder
#[derive(Debug, Clone)]
pub struct MapAttribute {
    property_name: String,
    options: MapOptions,
    profile: Profile,
    value: Option<Data>,
    changed: bool,
    issues: Issues,
}

impl MapAttribute {
    /// Create a map attribute bound to a property name
    pub fn new(property_name: impl Into<String>, options: MapOptions, profile: Profile) -> Self {
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

    pub fn value(&self) -> Option<&Data> {
        self.value.as_ref()
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

    /// Mode-independent setter; cardinality runs over the key count
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::Map(map)) => Some(map),
            Some(other) => {
                return Err(Issue::new("value", "object", other.type_name()).into());
            }
        };
        if let (Some(v), Some(transform)) = (value.clone(), &self.options.transform) {
            value = Some(transform(v));
        }

        let mut issues = Issues::new();
        match &value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "map", "undefined"));
                }
            }
            Some(map) => {
                parse_cardinality(
                    &mut issues,
                    map.len(),
                    self.options.min,
                    self.options.max,
                    self.options.size,
                );
                if let Some(validate) = &self.options.validate {
                    if let Some(message) = validate(map) {
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
