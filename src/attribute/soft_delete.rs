//! Soft-delete attribute kind
//!
//! A boolean flag marking a record logically deleted without removing its
//! stored representation. Always required, never a key, defaults to
//! `false`. Mutation happens through the record's mark-deleted and
//! mark-restored operations rather than direct external assignment.

use super::{apply_mode, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Options for a soft-delete attribute
///
/// Key and ignore flags are forced off and `required` forced on at
/// construction.
#[derive(Clone, Default)]
pub struct SoftDeleteOptions {
    pub base: BaseOptions,
    pub validate: Option<Validate<bool>>,
    pub transform: Option<Transform<bool>>,
    pub default: Option<DefaultFn<bool>>,
}

impl SoftDeleteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
        self
    }

    pub fn validate(mut self, f: Validate<bool>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<bool>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<bool>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for SoftDeleteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftDeleteOptions")
            .field("base", &self.base)
            .finish()
    }
}

/// Soft-delete flag holder
#[derive(Debug, Clone)]
pub struct SoftDeleteAttribute {
    property_name: String,
    options: SoftDeleteOptions,
    profile: Profile,
    value: bool,
    changed: bool,
    issues: Issues,
}

impl SoftDeleteAttribute {
    /// Create a soft-delete attribute; the flag starts as `false`
    pub fn new(
        property_name: impl Into<String>,
        mut options: SoftDeleteOptions,
        profile: Profile,
    ) -> Self {
        if options.default.is_none() {
            options.default = Some(Arc::new(|| false));
        }
        options.base.partition_key = false;
        options.base.sort_key = false;
        options.base.ignore = false;
        options.base.required = true;

        Self {
            property_name: property_name.into(),
            options,
            profile,
            value: false,
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

    pub fn value(&self) -> bool {
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

    /// Mode-independent setter; absent input takes the default (`false`
    /// unless overridden)
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => match &self.options.default {
                Some(default) => default(),
                None => false,
            },
            Some(Value::Bool(b)) => b,
            Some(other) => {
                return Err(Issue::new("value", "boolean", other.type_name()).into());
            }
        };
        if let Some(transform) = &self.options.transform {
            value = transform(value);
        }

        if let Some(validate) = &self.options.validate {
            if let Some(message) = validate(&value) {
                return Err(Issue::with_message("value", message).into());
            }
        }

        if self.value != value {
            self.changed = true;
            self.value = value;
        }
        Ok(())
    }
}
