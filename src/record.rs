//! Record lifecycle
//!
//! A record binds a schema to one stored item's in-memory state. It
//! populates attributes from raw input, indexes the lifecycle-managed
//! attribute groups, and exposes the key/item projections and the
//! soft-delete transitions consumed by the command assembler.

use crate::attribute::{Attribute, TimestampOn};
use crate::error::{ForgeError, Issues, Result};
use crate::schema::Schema;
use crate::value::{Data, Item, Value};

/// One stored item's typed in-memory snapshot
///
/// Two records built from the same stored item are independent; freshness
/// requires re-fetching and constructing a new record.
#[derive(Debug, Clone)]
pub struct Record {
    storage_name: String,
    schema: Schema,
    partition_key: usize,
    sort_key: Option<usize>,
    soft_delete: Vec<usize>,
    update_token: Vec<usize>,
    created_at: Vec<usize>,
    updated_at: Vec<usize>,
    deleted_at: Vec<usize>,
}

impl Record {
    /// Build a record from raw input data
    ///
    /// The partition key populates first (a formatted key consumes the
    /// whole input object), then every remaining attribute through its
    /// normal setter. All attributes get a chance to validate: in strict
    /// mode the failures are aggregated into one validation error instead
    /// of aborting at the first one.
    pub fn new(storage_name: impl Into<String>, schema: Schema, data: &Data) -> Result<Self> {
        let mut record = Self {
            storage_name: storage_name.into(),
            schema,
            partition_key: 0,
            sort_key: None,
            soft_delete: Vec::new(),
            update_token: Vec::new(),
            created_at: Vec::new(),
            updated_at: Vec::new(),
            deleted_at: Vec::new(),
        };
        record.reindex()?;

        let mut failures = Issues::new();
        let pk = record.partition_key;
        record.collect(&mut failures, pk, data);
        for index in 0..record.schema.len() {
            if index != pk {
                record.collect(&mut failures, index, data);
            }
        }
        if failures.has_issues() {
            tracing::debug!(
                storage_name = %record.storage_name,
                "record construction rejected: {}",
                failures.message()
            );
            return Err(ForgeError::Validation(failures));
        }
        Ok(record)
    }

    /// Populate one attribute, folding a strict-mode rejection into the
    /// shared failure list with the property name as path prefix
    fn collect(&mut self, failures: &mut Issues, index: usize, data: &Data) {
        let attribute = &mut self.schema.attributes_mut()[index];
        let property_name = attribute.property_name().to_string();
        if let Err(ForgeError::Validation(issues)) = attribute.populate(data) {
            failures.add_issues(issues.prefixed(&property_name));
        }
    }

    /// Re-derive the key and lifecycle-group indexes from the schema
    fn reindex(&mut self) -> Result<()> {
        self.sort_key = None;
        self.soft_delete.clear();
        self.update_token.clear();
        self.created_at.clear();
        self.updated_at.clear();
        self.deleted_at.clear();

        let mut partition_key = None;
        for (index, attribute) in self.schema.iter().enumerate() {
            if attribute.is_partition_key() && partition_key.is_none() {
                partition_key = Some(index);
            }
            if attribute.is_sort_key() && self.sort_key.is_none() {
                self.sort_key = Some(index);
            }
            match attribute {
                Attribute::SoftDelete(_) => self.soft_delete.push(index),
                Attribute::UpdateToken(_) => self.update_token.push(index),
                Attribute::Timestamp(t) => match t.on() {
                    TimestampOn::Create => self.created_at.push(index),
                    TimestampOn::Update => self.updated_at.push(index),
                    TimestampOn::Delete => self.deleted_at.push(index),
                },
                _ => {}
            }
        }
        self.partition_key = partition_key.ok_or_else(|| {
            ForgeError::Schema("record requires a partition key attribute".to_string())
        })?;
        Ok(())
    }

    /// Name of the stored collection this record belongs to
    pub fn storage_name(&self) -> &str {
        &self.storage_name
    }

    /// The schema backing this record
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Look up an attribute by property name
    pub fn attribute(&self, property_name: &str) -> Option<&Attribute> {
        self.schema.get(property_name)
    }

    /// Mutable lookup by property name
    pub fn attribute_mut(&mut self, property_name: &str) -> Option<&mut Attribute> {
        self.schema.get_mut(property_name)
    }

    /// Insert an attribute after the named sibling and re-derive the
    /// lifecycle indexes
    pub fn add_attribute(&mut self, attribute: Attribute, after: Option<&str>) -> Result<()> {
        self.schema.insert_after(attribute, after);
        self.reindex()
    }

    /// Remove an attribute by property name and re-derive the lifecycle
    /// indexes
    pub fn remove_attribute(&mut self, property_name: &str) -> Result<()> {
        self.schema.remove(property_name);
        self.reindex()
    }

    // =========================================================================
    // Projections
    // =========================================================================

    /// The minimal item identity: partition field and sort field only
    pub fn key(&self) -> Item {
        let mut key = Item::new();
        let attributes = self.schema.attributes();
        let pk = &attributes[self.partition_key];
        if let Some(value) = pk.value() {
            key.insert(pk.field_name().to_string(), value);
        }
        if let Some(index) = self.sort_key {
            let sk = &attributes[index];
            if let Some(value) = sk.value() {
                key.insert(sk.field_name().to_string(), value);
            }
        }
        key
    }

    /// The full stored representation
    ///
    /// Layered so that earlier layers are never overwritten: key fields,
    /// update tokens, soft-delete flags, create timestamps, then every
    /// remaining non-ignored attribute. Unset values are omitted.
    pub fn item(&self) -> Item {
        let mut item = self.key();
        let attributes = self.schema.attributes();

        let layers = [
            self.update_token.as_slice(),
            self.soft_delete.as_slice(),
            self.created_at.as_slice(),
        ];
        for layer in layers {
            for &index in layer {
                let attribute = &attributes[index];
                if let Some(value) = attribute.value() {
                    item.entry(attribute.field_name().to_string()).or_insert(value);
                }
            }
        }
        for attribute in attributes {
            if attribute.is_ignored() {
                continue;
            }
            if let Some(value) = attribute.value() {
                item.entry(attribute.field_name().to_string()).or_insert(value);
            }
        }
        item
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Assign writable fields from an input object
    ///
    /// Routes each present field through the attribute's normal setter by
    /// storage field name (falling back to the property name). Key
    /// attributes identify the item and are never reassigned here;
    /// soft-delete flags, tokens and timestamps are lifecycle-managed and
    /// skipped.
    pub fn update_data(&mut self, data: &Data) -> Result<()> {
        for attribute in self.schema.attributes_mut() {
            if attribute.is_partition_key() || attribute.is_sort_key() {
                continue;
            }
            if matches!(
                attribute,
                Attribute::SoftDelete(_) | Attribute::UpdateToken(_) | Attribute::Timestamp(_)
            ) {
                continue;
            }
            if let Attribute::String(s) = &mut *attribute {
                if s.is_formatted() {
                    if s.composite_attributes().iter().any(|n| data.contains_key(n)) {
                        s.apply(data)?;
                    }
                    continue;
                }
            }
            let input = data
                .get(attribute.field_name())
                .or_else(|| data.get(attribute.property_name()))
                .cloned();
            if input.is_some() {
                attribute.set(input)?;
            }
        }
        Ok(())
    }

    /// Flip every soft-delete flag to true and stamp every delete-triggered
    /// timestamp
    pub fn mark_as_deleted(&mut self) -> Result<()> {
        self.set_deleted(true)
    }

    /// Flip every soft-delete flag to false and stamp every update-triggered
    /// timestamp
    pub fn mark_as_restored(&mut self) -> Result<()> {
        self.set_deleted(false)
    }

    fn set_deleted(&mut self, deleted: bool) -> Result<()> {
        let flags = self.soft_delete.clone();
        let stamps = if deleted {
            self.deleted_at.clone()
        } else {
            self.updated_at.clone()
        };
        let attributes = self.schema.attributes_mut();
        for index in flags {
            attributes[index].set(Some(Value::Bool(deleted)))?;
        }
        for index in stamps {
            if let Attribute::Timestamp(t) = &mut attributes[index] {
                t.stamp();
            }
        }
        Ok(())
    }

    // =========================================================================
    // Errors
    // =========================================================================

    /// True when any attribute holds accumulated issues
    pub fn has_errors(&self) -> bool {
        self.schema.iter().any(|a| a.has_errors())
    }

    /// All accumulated issues, with paths prefixed by the owning property
    /// name
    pub fn errors(&self) -> Issues {
        let mut all = Issues::new();
        for attribute in self.schema.iter() {
            if attribute.has_errors() {
                all.add_issues(attribute.issues().prefixed(attribute.property_name()));
            }
        }
        all
    }

    // =========================================================================
    // Command-assembler access
    // =========================================================================

    pub(crate) fn partition_attribute(&self) -> &Attribute {
        &self.schema.attributes()[self.partition_key]
    }

    pub(crate) fn soft_delete_indexes(&self) -> &[usize] {
        &self.soft_delete
    }

    pub(crate) fn update_token_indexes(&self) -> &[usize] {
        &self.update_token
    }

    pub(crate) fn updated_at_indexes(&self) -> &[usize] {
        &self.updated_at
    }

    pub(crate) fn deleted_at_indexes(&self) -> &[usize] {
        &self.deleted_at
    }

    pub(crate) fn attributes(&self) -> &[Attribute] {
        self.schema.attributes()
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut [Attribute] {
        self.schema.attributes_mut()
    }
}
