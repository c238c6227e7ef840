//! Attribute kinds
//!
//! Every attribute is a self-contained value holder owning its validation,
//! transformation, default and change-tracking rules. Kinds share one
//! capability set and are dispatched through the [`Attribute`] union rather
//! than trait objects, so serialization and update-expression logic can
//! special-case a kind where needed (timestamp trigger grouping, token
//! rotation).
//!
//! ## Setter protocol (all kinds, in this order)
//!
//! 1. Absent input with a configured `default` generator: invoke it.
//! 2. Coerce the input value to the kind's native type.
//! 3. Apply the configured `transform`.
//! 4. Run kind-specific `parse` producing zero or more issues.
//! 5. Issues + strict mode: fail the assignment. Issues + silent mode:
//!    merge into the attribute's accumulator, stored value unchanged.
//! 6. Otherwise store; `changed` flips only when the value differs.

pub mod boolean;
pub mod list;
pub mod map;
pub mod number;
pub mod set;
pub mod soft_delete;
pub mod string;
pub mod timestamp;
pub mod update_token;

pub use boolean::{BooleanAttribute, BooleanOptions};
pub use list::{ListAttribute, ListOptions};
pub use map::{MapAttribute, MapOptions};
pub use number::{NumberAttribute, NumberOptions};
pub use set::{NumberSetAttribute, NumberSetOptions, StringSetAttribute, StringSetOptions};
pub use soft_delete::{SoftDeleteAttribute, SoftDeleteOptions};
pub use string::{StringAttribute, StringMode, StringOptions};
pub use timestamp::{TimestampAttribute, TimestampMode, TimestampOn, TimestampOptions};
pub use update_token::{UpdateTokenAttribute, UpdateTokenOptions};

use crate::config::{ErrorMode, Profile};
use crate::error::{ForgeError, Issue, Issues, Result};
use crate::value::{Data, Value};
use std::sync::Arc;

// =============================================================================
// Shared Option Pieces
// =============================================================================

/// Transform callback applied to a successfully coerced value
pub type Transform<T> = Arc<dyn Fn(T) -> T + Send + Sync>;

/// Custom validator; returns a rejection message to fail the value
pub type Validate<T> = Arc<dyn Fn(&T) -> Option<String> + Send + Sync>;

/// Default generator invoked when no input value is supplied
pub type DefaultFn<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Options common to every attribute kind
#[derive(Debug, Clone, Default)]
pub struct BaseOptions {
    /// Identifier used in the stored item; falls back to the property name
    pub field_name: Option<String>,

    /// This attribute is the partition key
    pub partition_key: bool,

    /// This attribute is the sort key
    pub sort_key: bool,

    /// Exclude from the serialized item
    pub ignore: bool,

    /// Absent input is a validation failure
    pub required: bool,
}

// =============================================================================
// Kind Tag
// =============================================================================

/// Tag identifying an attribute kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Boolean,
    Number,
    String,
    Timestamp,
    SoftDelete,
    UpdateToken,
    List,
    Map,
    StringSet,
    NumberSet,
}

impl AttributeKind {
    /// Human-readable kind name
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Boolean => "Boolean",
            AttributeKind::Number => "Number",
            AttributeKind::String => "String",
            AttributeKind::Timestamp => "Timestamp",
            AttributeKind::SoftDelete => "SoftDelete",
            AttributeKind::UpdateToken => "UpdateToken",
            AttributeKind::List => "List",
            AttributeKind::Map => "Map",
            AttributeKind::StringSet => "StringSet",
            AttributeKind::NumberSet => "NumberSet",
        }
    }
}

// =============================================================================
// Mode-aware failure handling
// =============================================================================

/// Apply the profile's error mode to a validation outcome
///
/// Strict mode surfaces the issues immediately without touching the
/// accumulator; silent mode appends them and reports success to the caller,
/// who is expected to consult the accumulator.
pub(crate) fn apply_mode(
    profile: &Profile,
    accumulator: &mut Issues,
    outcome: std::result::Result<(), Issues>,
) -> Result<()> {
    match outcome {
        Ok(()) => Ok(()),
        Err(issues) => match profile.mode {
            ErrorMode::Strict => Err(ForgeError::Validation(issues)),
            ErrorMode::Silent => {
                tracing::debug!("assignment rejected: {}", issues.message());
                accumulator.add_issues(issues);
                Ok(())
            }
        },
    }
}

/// Cardinality checks shared by the collection kinds
///
/// `count` is the element or key count; each configured bound reports
/// independently under the `size` path.
pub(crate) fn parse_cardinality(
    issues: &mut Issues,
    count: usize,
    min: Option<usize>,
    max: Option<usize>,
    size: Option<usize>,
) {
    if let Some(min) = min {
        if count < min {
            issues.add_issue(Issue::new("size", format!("{min}<="), count.to_string()));
        }
    }
    if let Some(max) = max {
        if count > max {
            issues.add_issue(Issue::new("size", format!("<={max}"), count.to_string()));
        }
    }
    if let Some(size) = size {
        if count != size {
            issues.add_issue(Issue::new("size", size.to_string(), count.to_string()));
        }
    }
}

// =============================================================================
// Attribute Union
// =============================================================================

/// A typed, named unit of record state
#[derive(Clone)]
pub enum Attribute {
    Boolean(BooleanAttribute),
    Number(NumberAttribute),
    String(StringAttribute),
    Timestamp(TimestampAttribute),
    SoftDelete(SoftDeleteAttribute),
    UpdateToken(UpdateTokenAttribute),
    List(ListAttribute),
    Map(MapAttribute),
    StringSet(StringSetAttribute),
    NumberSet(NumberSetAttribute),
}

impl Attribute {
    /// Get the attribute kind tag
    pub fn kind(&self) -> AttributeKind {
        match self {
            Attribute::Boolean(_) => AttributeKind::Boolean,
            Attribute::Number(_) => AttributeKind::Number,
            Attribute::String(_) => AttributeKind::String,
            Attribute::Timestamp(_) => AttributeKind::Timestamp,
            Attribute::SoftDelete(_) => AttributeKind::SoftDelete,
            Attribute::UpdateToken(_) => AttributeKind::UpdateToken,
            Attribute::List(_) => AttributeKind::List,
            Attribute::Map(_) => AttributeKind::Map,
            Attribute::StringSet(_) => AttributeKind::StringSet,
            Attribute::NumberSet(_) => AttributeKind::NumberSet,
        }
    }

    /// Identifier used by application code
    pub fn property_name(&self) -> &str {
        match self {
            Attribute::Boolean(a) => a.property_name(),
            Attribute::Number(a) => a.property_name(),
            Attribute::String(a) => a.property_name(),
            Attribute::Timestamp(a) => a.property_name(),
            Attribute::SoftDelete(a) => a.property_name(),
            Attribute::UpdateToken(a) => a.property_name(),
            Attribute::List(a) => a.property_name(),
            Attribute::Map(a) => a.property_name(),
            Attribute::StringSet(a) => a.property_name(),
            Attribute::NumberSet(a) => a.property_name(),
        }
    }

    fn base(&self) -> &BaseOptions {
        match self {
            Attribute::Boolean(a) => a.base(),
            Attribute::Number(a) => a.base(),
            Attribute::String(a) => a.base(),
            Attribute::Timestamp(a) => a.base(),
            Attribute::SoftDelete(a) => a.base(),
            Attribute::UpdateToken(a) => a.base(),
            Attribute::List(a) => a.base(),
            Attribute::Map(a) => a.base(),
            Attribute::StringSet(a) => a.base(),
            Attribute::NumberSet(a) => a.base(),
        }
    }

    /// Effective storage field name: explicit `field_name`, else the
    /// property name
    pub fn field_name(&self) -> &str {
        self.base()
            .field_name
            .as_deref()
            .unwrap_or_else(|| self.property_name())
    }

    /// True when flagged as the partition key
    pub fn is_partition_key(&self) -> bool {
        self.base().partition_key
    }

    /// True when flagged as the sort key
    pub fn is_sort_key(&self) -> bool {
        self.base().sort_key
    }

    /// True when excluded from item serialization
    pub fn is_ignored(&self) -> bool {
        self.base().ignore
    }

    /// True once a successfully validated value differed from the previous
    /// one
    pub fn changed(&self) -> bool {
        match self {
            Attribute::Boolean(a) => a.changed(),
            Attribute::Number(a) => a.changed(),
            Attribute::String(a) => a.changed(),
            Attribute::Timestamp(a) => a.changed(),
            Attribute::SoftDelete(a) => a.changed(),
            Attribute::UpdateToken(a) => a.changed(),
            Attribute::List(a) => a.changed(),
            Attribute::Map(a) => a.changed(),
            Attribute::StringSet(a) => a.changed(),
            Attribute::NumberSet(a) => a.changed(),
        }
    }

    /// Current value in stored form, if set
    pub fn value(&self) -> Option<Value> {
        match self {
            Attribute::Boolean(a) => a.value().map(Value::Bool),
            Attribute::Number(a) => a.value().map(Value::Number),
            Attribute::String(a) => a.value().map(|s| Value::String(s.to_string())),
            Attribute::Timestamp(a) => a.value(),
            Attribute::SoftDelete(a) => Some(Value::Bool(a.value())),
            Attribute::UpdateToken(a) => Some(Value::String(a.value().to_string())),
            Attribute::List(a) => a.value().map(|v| Value::List(v.to_vec())),
            Attribute::Map(a) => a.value().map(|m| Value::Map(m.clone())),
            Attribute::StringSet(a) => a.value().map(|s| Value::StringSet(s.to_vec())),
            Attribute::NumberSet(a) => a.value().map(|s| Value::NumberSet(s.to_vec())),
        }
    }

    /// Assign a value through the kind's normal setter
    ///
    /// A formatted string attribute routes a map input through composite
    /// application; every other kind coerces and validates the input
    /// directly.
    pub fn set(&mut self, input: Option<Value>) -> Result<()> {
        match self {
            Attribute::Boolean(a) => a.set(input),
            Attribute::Number(a) => a.set(input),
            Attribute::String(a) => match input {
                Some(Value::Map(data)) if a.is_formatted() => a.apply(&data),
                other => a.set(other),
            },
            Attribute::Timestamp(a) => a.set(input),
            Attribute::SoftDelete(a) => a.set(input),
            Attribute::UpdateToken(a) => a.set(input),
            Attribute::List(a) => a.set(input),
            Attribute::Map(a) => a.set(input),
            Attribute::StringSet(a) => a.set(input),
            Attribute::NumberSet(a) => a.set(input),
        }
    }

    /// Accumulated validation issues for this attribute
    pub fn issues(&self) -> &Issues {
        match self {
            Attribute::Boolean(a) => a.issues(),
            Attribute::Number(a) => a.issues(),
            Attribute::String(a) => a.issues(),
            Attribute::Timestamp(a) => a.issues(),
            Attribute::SoftDelete(a) => a.issues(),
            Attribute::UpdateToken(a) => a.issues(),
            Attribute::List(a) => a.issues(),
            Attribute::Map(a) => a.issues(),
            Attribute::StringSet(a) => a.issues(),
            Attribute::NumberSet(a) => a.issues(),
        }
    }

    /// True once any validation issue has been recorded
    pub fn has_errors(&self) -> bool {
        self.issues().has_issues()
    }

    /// Explicitly clear the accumulated issues
    pub fn reset_errors(&mut self) {
        match self {
            Attribute::Boolean(a) => a.reset_errors(),
            Attribute::Number(a) => a.reset_errors(),
            Attribute::String(a) => a.reset_errors(),
            Attribute::Timestamp(a) => a.reset_errors(),
            Attribute::SoftDelete(a) => a.reset_errors(),
            Attribute::UpdateToken(a) => a.reset_errors(),
            Attribute::List(a) => a.reset_errors(),
            Attribute::Map(a) => a.reset_errors(),
            Attribute::StringSet(a) => a.reset_errors(),
            Attribute::NumberSet(a) => a.reset_errors(),
        }
    }

    /// Clear the change mark, keeping the stored value
    pub(crate) fn mark_unchanged(&mut self) {
        match self {
            Attribute::Boolean(a) => a.mark_unchanged(),
            Attribute::Number(a) => a.mark_unchanged(),
            Attribute::String(a) => a.mark_unchanged(),
            Attribute::Timestamp(a) => a.mark_unchanged(),
            Attribute::SoftDelete(a) => a.mark_unchanged(),
            Attribute::UpdateToken(a) => a.mark_unchanged(),
            Attribute::List(a) => a.mark_unchanged(),
            Attribute::Map(a) => a.mark_unchanged(),
            Attribute::StringSet(a) => a.mark_unchanged(),
            Attribute::NumberSet(a) => a.mark_unchanged(),
        }
    }

    /// Populate from the raw input object during record construction
    ///
    /// Establishes baseline state: a populated value never counts as a
    /// pending change, so reconstructing a record from its stored item
    /// leaves every change mark where construction put it.
    pub(crate) fn populate(&mut self, data: &Data) -> Result<()> {
        let was_changed = self.changed();
        let outcome = self.assign_from(data);
        if !was_changed {
            self.mark_unchanged();
        }
        outcome
    }

    /// Assignment half of population
    ///
    /// Reads the storage field name first, falling back to the property
    /// name. A formatted string takes a directly-supplied final value when
    /// the input carries one (reconstruction from a stored item), otherwise
    /// it consumes the whole input object as composite sources.
    fn assign_from(&mut self, data: &Data) -> Result<()> {
        if let Attribute::String(a) = self {
            if a.is_formatted() {
                let direct = data
                    .get(a.base().field_name.as_deref().unwrap_or(a.property_name()))
                    .or_else(|| data.get(a.property_name()))
                    .cloned();
                if let Some(Value::String(value)) = direct {
                    return a.accept(value);
                }
                return a.apply(data);
            }
        }
        let input = data
            .get(self.field_name())
            .or_else(|| data.get(self.property_name()))
            .cloned();
        // Timestamps and tokens are machine-managed: leave the stamped or
        // generated value alone unless the input actually carries one.
        if input.is_none()
            && matches!(self, Attribute::Timestamp(_) | Attribute::UpdateToken(_))
        {
            return Ok(());
        }
        self.set(input)
    }
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute")
            .field("kind", &self.kind().as_str())
            .field("property_name", &self.property_name())
            .field("field_name", &self.field_name())
            .field("changed", &self.changed())
            .field("value", &self.value())
            .finish()
    }
}
