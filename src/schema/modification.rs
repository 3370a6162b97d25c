//! Applies modify requests to a copy of an entry.
//!
//! Modifications are applied in request order to a clone; the result is what
//! gets validated, so a request is judged by the state it produces rather than
//! by each edit on its own.

use super::registry::SchemaRegistry;
use super::syntax::{INTEGER_SYNTAX, SyntaxChecker};
use super::types::AttributeType;
use crate::entry::{Attribute, Entry, Modification, ModificationOperation, Value};
use crate::error::{SchemaResult, SchemaViolation};
use log::trace;

/// Simulates ADD/REMOVE/REPLACE/INCREMENT modifications.
#[derive(Debug, Clone, Copy)]
pub struct ModificationApplier<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> ModificationApplier<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Apply `modifications` to a clone of `entry`.
    ///
    /// Incremented values must stay within the 32-bit signed integer range.
    pub fn apply(&self, entry: &Entry, modifications: &[Modification]) -> SchemaResult<Entry> {
        let mut modified = entry.clone();
        self.registry.merge_aliases(&mut modified);
        for modification in modifications {
            let attribute_type = self
                .registry
                .lookup_attribute_type(modification.attribute.id())
                .ok_or_else(|| SchemaViolation::unrecognized(modification.attribute.id()))?;
            trace!(
                "Applying {:?} of '{}' to {}",
                modification.operation,
                modification.attribute.id(),
                entry.dn()
            );
            match modification.operation {
                ModificationOperation::Add => {
                    self.add(&mut modified, attribute_type, &modification.attribute)?
                }
                ModificationOperation::Remove => {
                    self.remove(&mut modified, attribute_type, &modification.attribute)?
                }
                ModificationOperation::Replace => {
                    self.replace(&mut modified, &modification.attribute)
                }
                ModificationOperation::Increment => {
                    self.increment(&mut modified, attribute_type, &modification.attribute)?
                }
            }
        }
        Ok(modified)
    }

    fn add(
        &self,
        entry: &mut Entry,
        attribute_type: &AttributeType,
        change: &Attribute,
    ) -> SchemaResult<()> {
        let index = match self.registry.position_of(entry, change.id()) {
            Some(index) => index,
            None if change.is_empty() => return Ok(()),
            None => {
                entry.attributes_mut().push(Attribute::empty(change.id()));
                entry.attributes().len() - 1
            }
        };

        let target = &mut entry.attributes_mut()[index];
        for value in change.values() {
            let in_use = target
                .values()
                .iter()
                .any(|existing| self.registry.values_match(attribute_type, existing, value));
            if in_use {
                return Err(SchemaViolation::AttributeInUse {
                    attribute: change.id().to_string(),
                    value: value.canonical_string(),
                });
            }
            target.push(value.clone());
        }
        Ok(())
    }

    fn remove(
        &self,
        entry: &mut Entry,
        attribute_type: &AttributeType,
        change: &Attribute,
    ) -> SchemaResult<()> {
        let index = self
            .registry
            .position_of(entry, change.id())
            .ok_or_else(|| SchemaViolation::no_such_attribute(change.id()))?;

        if change.is_empty() {
            entry.attributes_mut().remove(index);
            return Ok(());
        }

        let target = &mut entry.attributes_mut()[index];
        for value in change.values() {
            let position = target
                .values()
                .iter()
                .position(|existing| self.registry.values_match(attribute_type, existing, value))
                .ok_or_else(|| SchemaViolation::NoSuchAttribute {
                    attribute: change.id().to_string(),
                    value: Some(value.canonical_string()),
                })?;
            target.values_mut().remove(position);
        }
        if target.is_empty() {
            entry.attributes_mut().remove(index);
        }
        Ok(())
    }

    fn replace(&self, entry: &mut Entry, change: &Attribute) {
        match (self.registry.position_of(entry, change.id()), change.is_empty()) {
            (None, true) => {}
            (None, false) => entry.attributes_mut().push(change.clone()),
            (Some(index), true) => {
                entry.attributes_mut().remove(index);
            }
            (Some(index), false) => entry.attributes_mut()[index] = change.clone(),
        }
    }

    fn increment(
        &self,
        entry: &mut Entry,
        attribute_type: &AttributeType,
        change: &Attribute,
    ) -> SchemaResult<()> {
        let id = change.id();
        let index = self
            .registry
            .position_of(entry, id)
            .ok_or_else(|| SchemaViolation::no_such_attribute(id))?;

        if !self.is_integer(attribute_type) {
            return Err(SchemaViolation::illegal_modification(
                id,
                "increment requires an integer attribute",
            ));
        }

        let increment = match change.values() {
            [] => 1,
            [operand] => parse_integer(operand).ok_or_else(|| {
                SchemaViolation::illegal_modification(id, "increment value is not an integer")
            })?,
            _ => {
                return Err(SchemaViolation::illegal_modification(
                    id,
                    "increment takes at most one value",
                ));
            }
        };

        for value in entry.attributes_mut()[index].values_mut() {
            let current = parse_integer(value).ok_or_else(|| {
                SchemaViolation::illegal_modification(id, "current value is not an integer")
            })?;
            let next = current
                .checked_add(increment)
                .filter(|next| i32::try_from(*next).is_ok())
                .ok_or_else(|| SchemaViolation::IncrementOverflow {
                    attribute: id.to_string(),
                    increment,
                })?;
            *value = Value::from(next);
        }
        Ok(())
    }

    fn is_integer(&self, attribute_type: &AttributeType) -> bool {
        attribute_type.syntax == INTEGER_SYNTAX
            || self
                .registry
                .syntax_of(attribute_type)
                .is_some_and(|syntax| syntax.checker == SyntaxChecker::Integer)
    }
}

fn parse_integer(value: &Value) -> Option<i64> {
    value.canonical_string().trim().parse().ok()
}
