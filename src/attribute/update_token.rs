//! Update-token attribute kind
//!
//! A short random string used as an optimistic-concurrency fencing value.
//! A fresh token is generated at construction and on every reset; the
//! command assembler captures the pre-mutation token as the expected value
//! for the next conditional update.

use super::{apply_mode, BaseOptions};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use rand::distributions::Alphanumeric;
use rand::Rng;

/// Options for an update-token attribute
///
/// Key and ignore flags are forced off and `required` forced on at
/// construction.
#[derive(Debug, Clone, Default)]
pub struct UpdateTokenOptions {
    pub base: BaseOptions,
    /// Token length; falls back to the profile's `token_length`
    pub length: Option<usize>,
}

impl UpdateTokenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
        self
    }

    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }
}

/// Generate a random alphanumeric token
fn generate_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Update-token holder
#[derive(Debug, Clone)]
pub struct UpdateTokenAttribute {
    property_name: String,
    options: UpdateTokenOptions,
    profile: Profile,
    value: String,
    changed: bool,
    issues: Issues,
}

impl UpdateTokenAttribute {
    /// Create an update-token attribute with a freshly generated token
    pub fn new(
        property_name: impl Into<String>,
        mut options: UpdateTokenOptions,
        profile: Profile,
    ) -> Self {
        options.base.partition_key = false;
        options.base.sort_key = false;
        options.base.ignore = false;
        options.base.required = true;

        let length = options.length.unwrap_or(profile.token_length);
        Self {
            property_name: property_name.into(),
            options,
            profile,
            value: generate_token(length),
            changed: true,
            issues: Issues::new(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn base(&self) -> &BaseOptions {
        &self.options.base
    }

    pub fn value(&self) -> &str {
        &self.value
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

    /// Configured token length
    pub fn length(&self) -> usize {
        self.options.length.unwrap_or(self.profile.token_length)
    }

    /// Rotate to a fresh token, guaranteed different from the current one
    pub fn reset(&mut self) {
        let length = self.length();
        loop {
            let token = generate_token(length);
            if token != self.value {
                self.value = token;
                break;
            }
        }
        self.changed = true;
    }

    /// Mode-aware setter; direct assignment validates the configured length
    pub fn set(&mut self, input: Option<Value>) -> Result<()> {
        let profile = self.profile;
        let outcome = self.try_set(input);
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-independent setter
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let value = match input {
            Some(Value::String(s)) => s,
            Some(other) => {
                return Err(Issue::new("value", "string", other.type_name()).into());
            }
            None => {
                return Err(Issue::new("value", "string", "undefined").into());
            }
        };

        let length = self.length();
        if value.chars().count() != length {
            return Err(Issue::new(
                "length",
                length.to_string(),
                value.chars().count().to_string(),
            )
            .into());
        }

        if self.value != value {
            self.changed = true;
            self.value = value;
        }
        Ok(())
    }
}
