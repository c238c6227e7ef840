//! Schema configuration
//!
//! An ordered collection of attribute instances validated as a whole.
//! Structural violations fail schema construction permanently; they are
//! never per-value errors.

use crate::attribute::{Attribute, AttributeKind};
use crate::error::{ForgeError, Result};
use std::collections::BTreeSet;

/// Ordered attribute collection with construction-time validation
///
/// Invariants enforced here:
/// - storage field names are pairwise distinct (comparing the effective
///   name: explicit `field_name`, else the property name)
/// - exactly one attribute is flagged as partition key
/// - zero or one attribute is flagged as sort key
/// - key attributes are string attributes
#[derive(Debug, Clone)]
pub struct Schema {
    attributes: Vec<Attribute>,
}

impl Schema {
    /// Validate and build a schema from an ordered attribute list
    pub fn new(attributes: Vec<Attribute>) -> Result<Self> {
        if attributes.is_empty() {
            return Err(ForgeError::Schema(
                "schema requires at least one attribute".to_string(),
            ));
        }

        let mut field_names: BTreeSet<&str> = BTreeSet::new();
        for attribute in &attributes {
            if !field_names.insert(attribute.field_name()) {
                return Err(ForgeError::Schema(format!(
                    "duplicate storage field name \"{}\"",
                    attribute.field_name()
                )));
            }
        }

        let partition_keys: Vec<&Attribute> =
            attributes.iter().filter(|a| a.is_partition_key()).collect();
        let sort_keys: Vec<&Attribute> = attributes.iter().filter(|a| a.is_sort_key()).collect();

        if partition_keys.len() != 1 {
            return Err(ForgeError::Schema(format!(
                "exactly one partition key is required, found {}",
                partition_keys.len()
            )));
        }
        if sort_keys.len() > 1 {
            return Err(ForgeError::Schema(format!(
                "at most one sort key is allowed, found {}",
                sort_keys.len()
            )));
        }

        if partition_keys[0].kind() != AttributeKind::String {
            return Err(ForgeError::Schema(format!(
                "partition key \"{}\" must be a string attribute",
                partition_keys[0].property_name()
            )));
        }
        if let Some(sort_key) = sort_keys.first() {
            if sort_key.kind() != AttributeKind::String {
                return Err(ForgeError::Schema(format!(
                    "sort key \"{}\" must be a string attribute",
                    sort_key.property_name()
                )));
            }
        }

        Ok(Self { attributes })
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// True when the schema holds no attributes (only possible after
    /// removals)
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Iterate the attributes in schema order
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    /// Look up an attribute by property name
    pub fn get(&self, property_name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.property_name() == property_name)
    }

    /// Mutable lookup by property name
    pub fn get_mut(&mut self, property_name: &str) -> Option<&mut Attribute> {
        self.attributes
            .iter_mut()
            .find(|a| a.property_name() == property_name)
    }

    pub(crate) fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub(crate) fn attributes_mut(&mut self) -> &mut [Attribute] {
        &mut self.attributes
    }

    /// Insert an attribute after the named sibling
    ///
    /// A duplicate property name is silently ignored; a missing anchor (or
    /// none given) appends at the end. Ordering is semantically meaningful
    /// only for this positioning, not for item serialization.
    pub(crate) fn insert_after(&mut self, attribute: Attribute, after: Option<&str>) {
        if self
            .attributes
            .iter()
            .any(|a| a.property_name() == attribute.property_name())
        {
            tracing::debug!(
                "ignoring insert of duplicate attribute \"{}\"",
                attribute.property_name()
            );
            return;
        }
        let position = after
            .and_then(|name| self.attributes.iter().position(|a| a.property_name() == name))
            .map(|index| index + 1)
            .unwrap_or(self.attributes.len());
        self.attributes.insert(position, attribute);
    }

    /// Remove an attribute by property name; absent names are a no-op
    pub(crate) fn remove(&mut self, property_name: &str) {
        if let Some(index) = self
            .attributes
            .iter()
            .position(|a| a.property_name() == property_name)
        {
            self.attributes.remove(index);
        }
    }
}
