//! Entry validation against the directory schema.
//!
//! [`EntryValidator::check`] runs the full set of schema rules over an entry
//! and returns a normalized copy: the objectClass attribute closed over `top`
//! and every inherited superior, and values coerced to the representation
//! their syntax expects. The caller's entry is never touched.

use super::closure::{ClosureEntry, ObjectClassClosure};
use super::registry::{EXTENSIBLE_OBJECT_OID, OBJECT_CLASS_OID, SchemaRegistry, TOP_OID};
use super::syntax::OCTET_STRING_SYNTAX;
use super::types::{AttributeType, ObjectClass};
use crate::entry::{Attribute, Entry, OBJECT_CLASS, Value};
use crate::error::{SchemaResult, SchemaViolation};
use log::{debug, trace};
use std::collections::{BTreeSet, HashSet};

/// Validates entries against a registry and its object class closure.
#[derive(Debug, Clone, Copy)]
pub struct EntryValidator<'a> {
    registry: &'a SchemaRegistry,
    closure: &'a ObjectClassClosure,
    check_rdn: bool,
}

impl<'a> EntryValidator<'a> {
    pub fn new(registry: &'a SchemaRegistry, closure: &'a ObjectClassClosure) -> Self {
        Self {
            registry,
            closure,
            check_rdn: true,
        }
    }

    /// Enable or disable the RDN consistency check.
    pub fn with_rdn_check(mut self, check_rdn: bool) -> Self {
        self.check_rdn = check_rdn;
        self
    }

    /// Validate an entry, returning its normalized form.
    pub fn check(&self, entry: &Entry) -> SchemaResult<Entry> {
        let dn = entry.dn().to_string();

        for attribute in entry.attributes() {
            self.attribute_type(attribute.id())?;
        }

        let mut normalized = self.normalize_object_classes(entry)?;
        let classes = self.present_classes(&normalized)?;

        let mut must = BTreeSet::new();
        let mut allowed = BTreeSet::new();
        for (_, closure) in &classes {
            must.extend(closure.must.iter().cloned());
            allowed.extend(closure.allowed.iter().cloned());
        }
        allowed.insert(OBJECT_CLASS_OID.to_string());

        let extensible = classes
            .iter()
            .any(|(class, _)| class.oid == EXTENSIBLE_OBJECT_OID);

        self.check_structural(&dn, &classes)?;
        self.check_must(&dn, &normalized, &must)?;
        self.check_cardinality(&normalized)?;
        if extensible {
            trace!("{} is an extensibleObject, skipping allowed-attribute check", dn);
        } else {
            self.check_allowed(&dn, &normalized, &allowed)?;
        }
        self.coerce_values(&mut normalized)?;
        self.check_syntax(&normalized)?;
        if self.check_rdn {
            self.check_rdn_values(&normalized)?;
        }

        debug!("Entry {} passed schema validation", dn);
        Ok(normalized)
    }

    /// Close the objectClass attribute over `top` and all inherited superiors.
    ///
    /// Values become primary names, ordered `top` first and then each listed
    /// class followed by its superiors, without duplicates. Attributes with no
    /// values are dropped, and attributes naming the same type through
    /// different aliases or the oid are merged.
    pub fn normalize_object_classes(&self, entry: &Entry) -> SchemaResult<Entry> {
        let mut normalized = entry.clone();
        self.registry.merge_aliases(&mut normalized);
        normalized
            .attributes_mut()
            .retain(|attribute| !attribute.is_empty() || self.is_object_class(attribute.id()));

        let listed: Vec<String> = self
            .registry
            .find_attribute(&normalized, OBJECT_CLASS)
            .map(|attribute| attribute.values().iter().map(Value::canonical_string).collect())
            .unwrap_or_default();

        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut push = |class: &ObjectClass| {
            let name = class.name().to_string();
            if seen.insert(name.to_lowercase()) {
                names.push(name);
            }
        };

        let top = self.object_class(TOP_OID)?;
        push(top);
        for value in &listed {
            let class = self.object_class(value)?;
            push(class);
            if let Some(closure) = self.closure.get(&class.oid) {
                for superior in &closure.superiors {
                    push(self.object_class(superior)?);
                }
            }
        }

        let object_class = Attribute::new(OBJECT_CLASS, names);
        match self.registry.position_of(&normalized, OBJECT_CLASS) {
            Some(index) => normalized.attributes_mut()[index] = object_class,
            None => normalized.put(object_class),
        }
        Ok(normalized)
    }

    fn attribute_type(&self, id: &str) -> SchemaResult<&'a AttributeType> {
        self.registry
            .lookup_attribute_type(id)
            .ok_or_else(|| SchemaViolation::unrecognized(id))
    }

    fn object_class(&self, name: &str) -> SchemaResult<&'a ObjectClass> {
        self.registry
            .lookup_object_class(name)
            .ok_or_else(|| SchemaViolation::UnknownObjectClass {
                object_class: name.to_string(),
            })
    }

    fn is_object_class(&self, id: &str) -> bool {
        self.registry.attribute_oid(id) == Some(OBJECT_CLASS_OID)
    }

    /// Every object class on the normalized entry except `top`, with its closure.
    fn present_classes(&self, entry: &Entry) -> SchemaResult<Vec<(&'a ObjectClass, &'a ClosureEntry)>> {
        let names = self
            .registry
            .find_attribute(entry, OBJECT_CLASS)
            .map(|attribute| attribute.texts().collect::<Vec<_>>())
            .unwrap_or_default();
        let mut classes = Vec::new();
        for name in names {
            let class = self.object_class(name)?;
            if class.oid == TOP_OID {
                continue;
            }
            let closure = self.closure.get(&class.oid).ok_or_else(|| {
                SchemaViolation::UnknownObjectClass {
                    object_class: name.to_string(),
                }
            })?;
            classes.push((class, closure));
        }
        Ok(classes)
    }

    fn check_structural(
        &self,
        dn: &str,
        classes: &[(&ObjectClass, &ClosureEntry)],
    ) -> SchemaResult<()> {
        let structural: Vec<_> = classes
            .iter()
            .filter(|(class, _)| class.is_structural())
            .collect();

        // Drop every structural class that is an ancestor of another one.
        let remaining: Vec<&str> = structural
            .iter()
            .filter(|(class, _)| {
                !structural
                    .iter()
                    .any(|(_, closure)| closure.has_superior(&class.oid))
            })
            .map(|(class, _)| class.name())
            .collect();

        match remaining.len() {
            0 => Err(SchemaViolation::MissingStructuralObjectClass { dn: dn.to_string() }),
            1 => Ok(()),
            _ => Err(SchemaViolation::ConflictingStructuralObjectClasses {
                dn: dn.to_string(),
                object_classes: remaining.into_iter().map(str::to_string).collect(),
            }),
        }
    }

    fn check_must(&self, dn: &str, entry: &Entry, must: &BTreeSet<String>) -> SchemaResult<()> {
        let missing: Vec<String> = must
            .iter()
            .filter(|oid| self.registry.find_attribute(entry, oid).is_none_or(Attribute::is_empty))
            .map(|oid| {
                self.registry
                    .lookup_attribute_type(oid)
                    .map_or_else(|| oid.to_string(), |at| at.name().to_string())
            })
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SchemaViolation::MissingMandatoryAttribute {
                dn: dn.to_string(),
                attributes: missing,
            })
        }
    }

    fn check_cardinality(&self, entry: &Entry) -> SchemaResult<()> {
        for attribute in entry.attributes() {
            let attribute_type = self.attribute_type(attribute.id())?;
            if attribute_type.single_valued && attribute.len() > 1 {
                return Err(SchemaViolation::MultiValuedSingleValueAttribute {
                    attribute: attribute.id().to_string(),
                    count: attribute.len(),
                });
            }
        }
        Ok(())
    }

    fn check_allowed(&self, dn: &str, entry: &Entry, allowed: &BTreeSet<String>) -> SchemaResult<()> {
        for attribute in entry.attributes() {
            let attribute_type = self.attribute_type(attribute.id())?;
            if attribute_type.is_operational() || attribute_type.collective {
                continue;
            }
            if !allowed.contains(&attribute_type.oid) {
                return Err(SchemaViolation::AttributeNotAllowed {
                    dn: dn.to_string(),
                    attribute: attribute.id().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Re-encode values whose representation disagrees with their syntax.
    fn coerce_values(&self, entry: &mut Entry) -> SchemaResult<()> {
        for attribute in entry.attributes_mut() {
            let attribute_type = self.attribute_type(attribute.id())?;
            let Some(syntax) = self.registry.syntax_of(attribute_type) else {
                continue;
            };
            let id = attribute.id().to_string();
            for value in attribute.values_mut() {
                let current = std::mem::replace(value, Value::Binary(Vec::new()));
                *value = if syntax.human_readable {
                    current.into_text().map_err(|bytes| SchemaViolation::InvalidAttributeSyntax {
                        attribute: id.clone(),
                        syntax: syntax.oid.clone(),
                        value: Value::Binary(bytes).canonical_string(),
                    })?
                } else {
                    current.into_binary()
                };
            }
        }
        Ok(())
    }

    fn check_syntax(&self, entry: &Entry) -> SchemaResult<()> {
        for attribute in entry.attributes() {
            let attribute_type = self.attribute_type(attribute.id())?;
            if attribute_type.syntax == OCTET_STRING_SYNTAX {
                continue;
            }
            let Some(syntax) = self.registry.syntax_of(attribute_type) else {
                continue;
            };
            if let Some(invalid) = attribute.values().iter().find(|v| !syntax.checker.is_valid(v)) {
                return Err(SchemaViolation::InvalidAttributeSyntax {
                    attribute: attribute.id().to_string(),
                    syntax: syntax.oid.clone(),
                    value: invalid.canonical_string(),
                });
            }
        }
        Ok(())
    }

    fn check_rdn_values(&self, entry: &Entry) -> SchemaResult<()> {
        let Some(rdn) = entry.dn().rdn() else {
            return Ok(());
        };
        for ava in rdn.avas() {
            let attribute_type = self.attribute_type(ava.attribute())?;
            let expected = Value::text(ava.value());
            let present = self
                .registry
                .find_attribute(entry, ava.attribute())
                .is_some_and(|attribute| {
                    attribute
                        .values()
                        .iter()
                        .any(|value| self.registry.values_match(attribute_type, value, &expected))
                });
            if !present {
                return Err(SchemaViolation::RdnAttributeMissing {
                    dn: entry.dn().to_string(),
                    attribute: ava.attribute().to_string(),
                    value: ava.value().to_string(),
                });
            }
        }
        Ok(())
    }
}
