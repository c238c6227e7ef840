//! Number attribute kind
//!
//! Supports inclusive/exclusive bound checks plus mutually exclusive
//! integer/float requirements. Bounds all report independently; the
//! float check runs before the integer check and short-circuits it, so
//! the accumulator never flags both at once.

use super::{apply_mode, BaseOptions, DefaultFn, Transform, Validate};
use crate::config::Profile;
use crate::error::{Issue, Issues, Result};
use crate::value::Value;
use std::fmt;

/// Options for a number attribute
#[derive(Clone, Default)]
pub struct NumberOptions {
    pub base: BaseOptions,
    /// Exclusive upper bound: value must be `< lt`
    pub lt: Option<f64>,
    /// Inclusive upper bound: value must be `<= lte`
    pub lte: Option<f64>,
    /// Exclusive lower bound: value must be `> gt`
    pub gt: Option<f64>,
    /// Inclusive lower bound: value must be `>= gte`
    pub gte: Option<f64>,
    /// Require a fractional part
    pub float: bool,
    /// Require an integral value
    pub int: bool,
    pub validate: Option<Validate<f64>>,
    pub transform: Option<Transform<f64>>,
    pub default: Option<DefaultFn<f64>>,
}

impl NumberOptions {
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

    pub fn lt(mut self, bound: f64) -> Self {
        self.lt = Some(bound);
        self
    }

    pub fn lte(mut self, bound: f64) -> Self {
        self.lte = Some(bound);
        self
    }

    pub fn gt(mut self, bound: f64) -> Self {
        self.gt = Some(bound);
        self
    }

    pub fn gte(mut self, bound: f64) -> Self {
        self.gte = Some(bound);
        self
    }

    pub fn float(mut self, flag: bool) -> Self {
        self.float = flag;
        self
    }

    pub fn int(mut self, flag: bool) -> Self {
        self.int = flag;
        self
    }

    pub fn validate(mut self, f: Validate<f64>) -> Self {
        self.validate = Some(f);
        self
    }

    pub fn transform(mut self, f: Transform<f64>) -> Self {
        self.transform = Some(f);
        self
    }

    pub fn default_fn(mut self, f: DefaultFn<f64>) -> Self {
        self.default = Some(f);
        self
    }
}

impl fmt::Debug for NumberOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NumberOptions")
            .field("base", &self.base)
            .field("lt", &self.lt)
            .field("lte", &self.lte)
            .field("gt", &self.gt)
            .field("gte", &self.gte)
            .field("float", &self.float)
            .field("int", &self.int)
            .finish()
    }
}

/// Number value holder
#[derive(Debug, Clone)]
pub struct NumberAttribute {
    property_name: String,
    options: NumberOptions,
    profile: Profile,
    value: Option<f64>,
    changed: bool,
    issues: Issues,
}

impl NumberAttribute {
    /// Create a number attribute bound to a property name
    pub fn new(property_name: impl Into<String>, options: NumberOptions, profile: Profile) -> Self {
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

    pub fn value(&self) -> Option<f64> {
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

    /// Mode-independent setter
    pub fn try_set(&mut self, input: Option<Value>) -> std::result::Result<(), Issues> {
        let mut value = match input {
            None => self.options.default.as_ref().map(|f| f()),
            Some(Value::Number(n)) => Some(n),
            Some(other) => {
                return Err(Issue::new("value", "number", other.type_name()).into());
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

    fn parse(&self, value: Option<f64>) -> Issues {
        let mut issues = Issues::new();
        let v = match value {
            None => {
                if self.options.base.required {
                    issues.add_issue(Issue::new("value", "number", "undefined"));
                }
                return issues;
            }
            Some(v) => v,
        };

        if let Some(lt) = self.options.lt {
            if v >= lt {
                issues.add_issue(Issue::new("value", format!("<{lt}"), v.to_string()));
            }
        }
        if let Some(lte) = self.options.lte {
            if v > lte {
                issues.add_issue(Issue::new("value", format!("<={lte}"), v.to_string()));
            }
        }
        if let Some(gt) = self.options.gt {
            if v <= gt {
                issues.add_issue(Issue::new("value", format!(">{gt}"), v.to_string()));
            }
        }
        if let Some(gte) = self.options.gte {
            if v < gte {
                issues.add_issue(Issue::new("value", format!(">={gte}"), v.to_string()));
            }
        }

        // Float wins over int when both are (mis)configured; never flag both.
        if self.options.float && v.fract() == 0.0 {
            issues.add_issue(Issue::new("value", "float", "integer"));
        } else if self.options.int && v.fract() != 0.0 {
            issues.add_issue(Issue::new("value", "integer", "float"));
        }

        if let Some(validate) = &self.options.validate {
            if let Some(message) = validate(&v) {
                issues.add_issue(Issue::with_message("value", message));
            }
        }
        issues
    }
}
