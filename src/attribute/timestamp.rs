//! Timestamp attribute kind
//!
//! Holds a point in time under one of three encodings fixed at
//! construction. The trigger decides when the record lifecycle stamps it:
//! on-create stamps immediately at construction, on-update and on-delete
//! are stamped by the owning record's lifecycle operations.

use super::{apply_mode, BaseOptions};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

/// Encoding of the stored point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampMode {
    /// ISO-8601 text
    Iso,
    /// Epoch milliseconds
    Millis,
    /// Epoch seconds
    Seconds,
}

/// Lifecycle trigger that stamps this attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampOn {
    Create,
    Update,
    Delete,
}

/// Options for a timestamp attribute
///
/// Key and ignore flags are forced off and `required` forced on; a
/// timestamp is always machine-managed.
#[derive(Debug, Clone)]
pub struct TimestampOptions {
    pub base: BaseOptions,
    pub on: TimestampOn,
    pub mode: TimestampMode,
}

impl TimestampOptions {
    /// Trigger and encoding are mandatory
    pub fn new(on: TimestampOn, mode: TimestampMode) -> Self {
        Self {
            base: BaseOptions {
                required: true,
                ..BaseOptions::default()
            },
            on,
            mode,
        }
    }

    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.base.field_name = Some(name.into());
        self
    }
}

/// Timestamp value holder
#[derive(Debug, Clone)]
pub struct TimestampAttribute {
    property_name: String,
    options: TimestampOptions,
    profile: Profile,
    value: Option<Value>,
    changed: bool,
    issues: Issues,
}

impl TimestampAttribute {
    /// Create a timestamp attribute; on-create triggers stamp immediately
    pub fn new(
        property_name: impl Into<String>,
        mut options: TimestampOptions,
        profile: Profile,
    ) -> Self {
        options.base.partition_key = false;
        options.base.sort_key = false;
        options.base.ignore = false;
        options.base.required = true;

        let mut attribute = Self {
            property_name: property_name.into(),
            options,
            profile,
            value: None,
            changed: false,
            issues: Issues::new(),
        };
        if attribute.options.on == TimestampOn::Create {
            attribute.stamp();
        }
        attribute
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn base(&self) -> &BaseOptions {
        &self.options.base
    }

    pub fn on(&self) -> TimestampOn {
        self.options.on
    }

    pub fn mode(&self) -> TimestampMode {
        self.options.mode
    }

    pub fn value(&self) -> Option<Value> {
        self.value.clone()
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

    /// The held point in time, decoded
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match (&self.value, self.options.mode) {
            (Some(Value::String(s)), TimestampMode::Iso) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            (Some(Value::Number(n)), TimestampMode::Millis) => {
                Utc.timestamp_millis_opt(*n as i64).single()
            }
            (Some(Value::Number(n)), TimestampMode::Seconds) => {
                Utc.timestamp_opt(*n as i64, 0).single()
            }
            _ => None,
        }
    }

    /// Set the value to "now" rendered in the configured encoding
    pub fn stamp(&mut self) {
        let now = Utc::now();
        let value = match self.options.mode {
            TimestampMode::Iso => {
                Value::String(now.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            TimestampMode::Millis => Value::Number(now.timestamp_millis() as f64),
            TimestampMode::Seconds => Value::Number(now.timestamp() as f64),
        };
        // A freshly rendered "now" always passes its own encoding check.
        let _ = self.try_set(Some(value));
    }

    /// Mode-aware setter
    pub fn set(&mut self, input: Option<Value>) -> Result<()> {
        let profile = self.profile;
        let outcome = self.try_set(input);
        apply_mode(&profile, &mut self.issues, outcome)
    }

    /// Mode-independent setter: the encoding constrains the accepted input
    /// type
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let value = match (input, self.options.mode) {
            (None, TimestampMode::Iso) => {
                return Err(Issue::new("value", "string", "undefined").into());
            }
            (None, _) => {
                return Err(Issue::new("value", "number", "undefined").into());
            }
            (Some(Value::Number(n)), TimestampMode::Millis | TimestampMode::Seconds) => {
                Value::Number(n)
            }
            (Some(Value::String(s)), TimestampMode::Iso) => {
                if DateTime::parse_from_rfc3339(&s).is_err() {
                    return Err(Issue::new("value", "ISO_DATE", s).into());
                }
                Value::String(s)
            }
            (Some(other), TimestampMode::Iso) => {
                return Err(Issue::new("value", "string", other.type_name()).into());
            }
            (Some(other), _) => {
                return Err(Issue::new("value", "number", other.type_name()).into());
            }
        };

        if self.value.as_ref() != Some(&value) {
            self.changed = true;
            self.value = Some(value);
        }
        Ok(())
    }
}
