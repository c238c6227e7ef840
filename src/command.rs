//! Command assembly
//!
//! Pure builders translating a record's state into the four store request
//! shapes. No I/O happens here; the shapes are plain serializable structs
//! handed to an external store client.
//!
//! Placeholder conventions follow the store's expression syntax: name
//! placeholders are prefixed `#`, value placeholders `:`, and condition
//! placeholders additionally `ce_` so a field can appear in both the SET
//! clause and the condition without collision.

use crate::attribute::Attribute;
use crate::error::{ForgeError, Result};
use crate::record::Record;
use crate::value::{Item, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Caller-supplied store parameters not modeled by the fixed fields
pub type Overrides = BTreeMap<String, Value>;

// =============================================================================
// Command Shapes
// =============================================================================

/// Full-item write request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutCommand {
    pub storage_name: String,
    pub item: Item,
    #[serde(flatten)]
    pub overrides: Overrides,
}

/// Single-item read request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCommand {
    pub storage_name: String,
    pub key: Item,
    #[serde(flatten)]
    pub overrides: Overrides,
}

/// Single-item delete request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCommand {
    pub storage_name: String,
    pub key: Item,
    #[serde(flatten)]
    pub overrides: Overrides,
}

/// Key-condition query request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryCommand {
    pub storage_name: String,
    pub key_condition_expression: String,
    pub expression_attribute_names: BTreeMap<String, String>,
    pub expression_attribute_values: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub overrides: Overrides,
}

/// Conditional partial-update request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommand {
    pub storage_name: String,
    pub key: Item,
    pub update_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
    pub expression_attribute_names: BTreeMap<String, String>,
    pub expression_attribute_values: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub overrides: Overrides,
}

// =============================================================================
// Customization
// =============================================================================

/// Caller augmentation for a query command
#[derive(Debug, Clone, Default)]
pub struct QueryCustomize {
    /// Fragment appended to the assembled key condition with a space
    pub key_condition_expression: Option<String>,
    /// Seeded name placeholders; assembled entries win on collision
    pub expression_attribute_names: BTreeMap<String, String>,
    /// Seeded value placeholders; assembled entries win on collision
    pub expression_attribute_values: BTreeMap<String, Value>,
    pub overrides: Overrides,
}

/// Caller augmentation for an update command
#[derive(Debug, Clone, Default)]
pub struct UpdateCustomize {
    /// Fragment AND-joined onto the assembled condition
    pub condition_expression: Option<String>,
    /// Seeded name placeholders; assembled entries win on collision
    pub expression_attribute_names: BTreeMap<String, String>,
    /// Seeded value placeholders; assembled entries win on collision
    pub expression_attribute_values: BTreeMap<String, Value>,
    pub overrides: Overrides,
}

/// Merge caller overrides into an existing override map
///
/// Per-type rules: booleans and numbers replace, strings concatenate onto
/// an existing string with a space separator, lists extend, maps merge with
/// existing entries winning. Anything else (or a type mismatch) replaces.
pub fn merge_overrides(base: &mut Overrides, extra: Overrides) {
    for (key, incoming) in extra {
        match (base.get_mut(&key), incoming) {
            (Some(Value::String(existing)), Value::String(addition)) => {
                existing.push(' ');
                existing.push_str(&addition);
            }
            (Some(Value::List(existing)), Value::List(addition)) => {
                existing.extend(addition);
            }
            (Some(Value::Map(existing)), Value::Map(addition)) => {
                for (k, v) in addition {
                    existing.entry(k).or_insert(v);
                }
            }
            (Some(existing), incoming) => {
                *existing = incoming;
            }
            (None, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

// =============================================================================
// Assemblers
// =============================================================================

/// Assemble a full-item put request
pub fn put_command(record: &Record, overrides: Overrides) -> PutCommand {
    PutCommand {
        storage_name: record.storage_name().to_string(),
        item: record.item(),
        overrides,
    }
}

/// Assemble a single-item get request
pub fn get_command(record: &Record, overrides: Overrides) -> GetCommand {
    GetCommand {
        storage_name: record.storage_name().to_string(),
        key: record.key(),
        overrides,
    }
}

/// Assemble a single-item delete request
pub fn delete_command(record: &Record, overrides: Overrides) -> DeleteCommand {
    DeleteCommand {
        storage_name: record.storage_name().to_string(),
        key: record.key(),
        overrides,
    }
}

/// Assemble a query seeded with the partition key's equality clause
pub fn query_command(record: &Record, customize: QueryCustomize) -> QueryCommand {
    let partition = record.partition_attribute();
    let field = partition.field_name();

    let mut names = customize.expression_attribute_names;
    let mut values = customize.expression_attribute_values;
    names.insert(format!("#{field}"), field.to_string());
    if let Some(value) = partition.value() {
        values.insert(format!(":{field}"), value);
    }

    let mut expression = format!("#{field} = :{field}");
    if let Some(fragment) = customize.key_condition_expression {
        expression.push(' ');
        expression.push_str(&fragment);
    }

    QueryCommand {
        storage_name: record.storage_name().to_string(),
        key_condition_expression: expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        overrides: customize.overrides,
    }
}

/// Assemble a conditional update covering the record's pending lifecycle
/// changes
///
/// SET entries are written for each changed soft-delete flag (with the
/// aggregate pending state) and each member of the matching timestamp
/// group, which is re-stamped here. Every update token captures its
/// pre-mutation value as an equality condition, then rotates and joins the
/// SET clause. Conditions join with `AND`; a schema without tokens carries
/// no condition and cannot detect concurrent writers.
pub fn update_command(record: &mut Record, customize: UpdateCustomize) -> Result<UpdateCommand> {
    let storage_name = record.storage_name().to_string();
    let key = record.key();

    let mut names = customize.expression_attribute_names;
    let mut values = customize.expression_attribute_values;
    let mut assignments: Vec<String> = Vec::new();
    let mut conditions: Vec<String> = Vec::new();

    // Pending state is the aggregate of the changed flags: marking deleted
    // flips them all true, restoring flips them all false.
    let is_deleted = record
        .soft_delete_indexes()
        .iter()
        .any(|&index| match &record.attributes()[index] {
            Attribute::SoftDelete(flag) => flag.changed() && flag.value(),
            _ => false,
        });

    for &index in record.soft_delete_indexes() {
        let attribute = &record.attributes()[index];
        if !attribute.changed() {
            continue;
        }
        let field = attribute.field_name().to_string();
        assignments.push(format!("#{field} = :{field}"));
        names.insert(format!("#{field}"), field.clone());
        values.insert(format!(":{field}"), Value::Bool(is_deleted));
    }

    let stamp_group: Vec<usize> = if is_deleted {
        record.deleted_at_indexes().to_vec()
    } else {
        record.updated_at_indexes().to_vec()
    };
    for index in stamp_group {
        if let Attribute::Timestamp(t) = &mut record.attributes_mut()[index] {
            t.stamp();
        }
        let attribute = &record.attributes()[index];
        if !attribute.changed() {
            continue;
        }
        let field = attribute.field_name().to_string();
        if let Some(value) = attribute.value() {
            assignments.push(format!("#{field} = :{field}"));
            names.insert(format!("#{field}"), field.clone());
            values.insert(format!(":{field}"), value);
        }
    }

    if assignments.is_empty() && record.update_token_indexes().is_empty() {
        return Err(ForgeError::Usage("nothing to update".to_string()));
    }

    let token_indexes = record.update_token_indexes().to_vec();
    for index in token_indexes {
        let field = record.attributes()[index].field_name().to_string();
        if let Attribute::UpdateToken(token) = &mut record.attributes_mut()[index] {
            let previous = token.value().to_string();
            token.reset();

            conditions.push(format!("#ce_{field} = :ce_{field}"));
            names.insert(format!("#ce_{field}"), field.clone());
            values.insert(format!(":ce_{field}"), Value::String(previous));

            assignments.push(format!("#{field} = :{field}"));
            names.insert(format!("#{field}"), field.clone());
            values.insert(format!(":{field}"), Value::String(token.value().to_string()));
        }
    }

    if let Some(fragment) = customize.condition_expression {
        conditions.push(fragment);
    }
    let condition_expression = if conditions.is_empty() {
        None
    } else {
        Some(conditions.join(" AND "))
    };

    tracing::debug!(
        storage_name = %storage_name,
        assignments = assignments.len(),
        conditions = condition_expression.is_some(),
        "assembled update command"
    );

    Ok(UpdateCommand {
        storage_name,
        key,
        update_expression: format!("SET {}", assignments.join(", ")),
        condition_expression,
        expression_attribute_names: names,
        expression_attribute_values: values,
        overrides: customize.overrides,
    })
}
