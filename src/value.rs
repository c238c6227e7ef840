//! Item value union
//!
//! One value type is shared by raw input data and the stored item
//! representation. Sets are kept sorted and de-duplicated so that their
//! serialized form (the "plain" sequence) is deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Raw input object handed to record construction
pub type Data = BTreeMap<String, Value>;

/// Full stored representation of a record
pub type Item = BTreeMap<String, Value>;

/// A single stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<Value>),
    Map(Data),
    StringSet(Vec<String>),
    NumberSet(Vec<f64>),
}

impl Value {
    /// Build a string set: sorted, de-duplicated
    pub fn string_set<I, S>(elements: I) -> Value
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = elements.into_iter().map(Into::into).collect();
        set.sort();
        set.dedup();
        Value::StringSet(set)
    }

    /// Build a number set: sorted by total order, de-duplicated
    pub fn number_set<I>(elements: I) -> Value
    where
        I: IntoIterator<Item = f64>,
    {
        let mut set: Vec<f64> = elements.into_iter().collect();
        set.sort_by(f64::total_cmp);
        set.dedup_by(|a, b| a.total_cmp(b).is_eq());
        Value::NumberSet(set)
    }

    /// Type token used in issue synthesis ("received" side)
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "array",
            Value::Map(_) => "object",
            Value::StringSet(_) => "string-set",
            Value::NumberSet(_) => "number-set",
        }
    }

    /// Borrow as string when this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Extract as number when this is a number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract as boolean when this is a boolean value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Borrow as map when this is a map value
    pub fn as_map(&self) -> Option<&Data> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    /// Stringified form used by the format engine when substituting
    /// placeholders
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Value::String(s) => write!(f, "{s}"),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(","))
            }
            Value::Map(_) => write!(f, "[object]"),
            Value::StringSet(set) => write!(f, "[{}]", set.join(",")),
            Value::NumberSet(set) => {
                let rendered: Vec<String> =
                    set.iter().map(|n| Value::Number(*n).to_string()).collect();
                write!(f, "[{}]", rendered.join(","))
            }
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<Data> for Value {
    fn from(map: Data) -> Self {
        Value::Map(map)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Convert a JSON object into input [`Data`]
///
/// Non-object JSON values produce an empty map.
pub fn data_from_json(json: serde_json::Value) -> Data {
    match Value::from(json) {
        Value::Map(map) => map,
        _ => Data::new(),
    }
}
