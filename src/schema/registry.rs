//! Schema registry for loading, managing, and looking up schema elements.
//!
//! This module provides the SchemaRegistry which loads schema documents (the
//! embedded sets or caller-supplied JSON), checks their cross references, and
//! answers attribute type, object class and syntax lookups by name or oid.

use super::embedded;
use super::types::{AttributeType, ObjectClass, SchemaDocument, Syntax};
use crate::entry::{Attribute, Entry, Value, dn::normalize_value};
use crate::error::{BuildError, BuildResult};
use log::{debug, info, trace};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Oid of the objectClass attribute type.
pub const OBJECT_CLASS_OID: &str = "2.5.4.0";
/// Oid of the `top` object class.
pub const TOP_OID: &str = "2.5.6.0";
/// Oid of the `extensibleObject` object class.
pub const EXTENSIBLE_OBJECT_OID: &str = "1.3.6.1.4.1.1466.101.120.111";

/// Registry of attribute types, object classes and syntaxes.
///
/// Elements are keyed by oid; every name and the oid itself map to that key
/// case-insensitively. Object classes keep their registration order so
/// iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    syntaxes: HashMap<String, Syntax>,
    attribute_types: HashMap<String, AttributeType>,
    attribute_names: HashMap<String, String>,
    object_classes: HashMap<String, ObjectClass>,
    object_class_names: HashMap<String, String>,
    object_class_order: Vec<String>,
    loaded: Vec<String>,
}

impl SchemaRegistry {
    /// Create a registry with the default embedded schema sets.
    pub fn new() -> BuildResult<Self> {
        Self::with_embedded_schemas(embedded::DEFAULT_SCHEMAS)
    }

    /// Create a registry with no schema elements at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a registry with the named embedded schema sets.
    ///
    /// Dependencies of each set are loaded first, so `["inetorgperson"]` also
    /// brings in `system`, `core` and `cosine`.
    pub fn with_embedded_schemas<S: AsRef<str>>(names: &[S]) -> BuildResult<Self> {
        let mut registry = Self::empty();
        for name in names {
            registry.load_embedded(name.as_ref())?;
        }
        Ok(registry)
    }

    /// Load an embedded schema set and its dependencies.
    pub fn load_embedded(&mut self, name: &str) -> BuildResult<()> {
        if self.is_schema_loaded(name) {
            return Ok(());
        }
        let content = embedded::schema_set(name).ok_or_else(|| BuildError::UnknownSchema {
            schema: name.to_string(),
        })?;
        let document = Self::parse_document(name, content)?;
        for dependency in &document.dependencies {
            self.load_embedded(dependency)?;
        }
        self.load_document(document)
    }

    /// Load a schema document from a JSON file.
    pub fn load_schema_file<P: AsRef<Path>>(&mut self, path: P) -> BuildResult<()> {
        let display = path.as_ref().display().to_string();
        let content = fs::read_to_string(&path).map_err(|e| BuildError::InvalidConfiguration {
            message: format!("cannot read schema file {}: {}", display, e),
        })?;
        self.load_schema_str(&content)
    }

    /// Load a schema document from a JSON string.
    ///
    /// Dependencies named by the document must already be loaded.
    pub fn load_schema_str(&mut self, content: &str) -> BuildResult<()> {
        let document = Self::parse_document("<inline>", content)?;
        self.load_document(document)
    }

    fn parse_document(name: &str, content: &str) -> BuildResult<SchemaDocument> {
        serde_json::from_str(content).map_err(|source| BuildError::SchemaLoad {
            schema: name.to_string(),
            source,
        })
    }

    /// Register every element of a parsed schema document.
    ///
    /// Elements are inserted first and cross references checked afterwards, so
    /// a document may reference its own elements in any order. On failure the
    /// registry is left unchanged.
    pub fn load_document(&mut self, document: SchemaDocument) -> BuildResult<()> {
        for dependency in &document.dependencies {
            if !self.is_schema_loaded(dependency) {
                return Err(BuildError::UndefinedReference {
                    element: document.name.clone(),
                    kind: "schema",
                    reference: dependency.clone(),
                });
            }
        }

        let mut staged = self.clone();
        for syntax in document.syntaxes {
            staged.insert_syntax(syntax)?;
        }
        for attribute_type in document.attribute_types {
            staged.insert_attribute_type(attribute_type)?;
        }
        let mut class_oids = Vec::with_capacity(document.object_classes.len());
        for object_class in document.object_classes {
            class_oids.push(object_class.oid.clone());
            staged.insert_object_class(object_class)?;
        }

        for attribute_type in staged.attribute_types.values() {
            staged.check_attribute_type(attribute_type)?;
        }
        for oid in &class_oids {
            staged.check_object_class(&staged.object_classes[oid])?;
        }

        if !document.name.is_empty() {
            staged.loaded.push(document.name.clone());
        }
        info!(
            "Loaded schema '{}': {} attribute types, {} object classes in registry",
            document.name,
            staged.attribute_types.len(),
            staged.object_classes.len()
        );
        *self = staged;
        Ok(())
    }

    /// Add a syntax at runtime.
    pub fn add_syntax(&mut self, syntax: Syntax) -> BuildResult<()> {
        self.insert_syntax(syntax)
    }

    /// Add an attribute type at runtime. Its syntax must be registered.
    pub fn add_attribute_type(&mut self, attribute_type: AttributeType) -> BuildResult<()> {
        self.check_attribute_type(&attribute_type)?;
        self.insert_attribute_type(attribute_type)
    }

    /// Add an object class at runtime.
    ///
    /// Superiors, MUST and MAY attributes must be registered. Callers holding
    /// an [`super::ObjectClassClosure`] must rebuild it afterwards.
    pub fn add_object_class(&mut self, object_class: ObjectClass) -> BuildResult<()> {
        self.check_object_class(&object_class)?;
        self.insert_object_class(object_class)
    }

    fn insert_syntax(&mut self, syntax: Syntax) -> BuildResult<()> {
        if self.syntaxes.contains_key(&syntax.oid) {
            return Err(BuildError::DuplicateElement { name: syntax.oid });
        }
        self.syntaxes.insert(syntax.oid.clone(), syntax);
        Ok(())
    }

    fn insert_attribute_type(&mut self, attribute_type: AttributeType) -> BuildResult<()> {
        let oid = attribute_type.oid.clone();
        let keys = element_keys(&oid, &attribute_type.names);
        if let Some(taken) = keys.iter().find(|k| self.attribute_names.contains_key(*k)) {
            return Err(BuildError::DuplicateElement {
                name: taken.clone(),
            });
        }
        for key in keys {
            self.attribute_names.insert(key, oid.clone());
        }
        debug!("Registered attribute type {} ({})", attribute_type.name(), oid);
        self.attribute_types.insert(oid, attribute_type);
        Ok(())
    }

    fn insert_object_class(&mut self, object_class: ObjectClass) -> BuildResult<()> {
        let oid = object_class.oid.clone();
        let keys = element_keys(&oid, &object_class.names);
        if let Some(taken) = keys.iter().find(|k| self.object_class_names.contains_key(*k)) {
            return Err(BuildError::DuplicateElement {
                name: taken.clone(),
            });
        }
        for key in keys {
            self.object_class_names.insert(key, oid.clone());
        }
        debug!("Registered object class {} ({})", object_class.name(), oid);
        self.object_class_order.push(oid.clone());
        self.object_classes.insert(oid, object_class);
        Ok(())
    }

    fn check_attribute_type(&self, attribute_type: &AttributeType) -> BuildResult<()> {
        if !self.syntaxes.contains_key(&attribute_type.syntax) {
            return Err(BuildError::UndefinedReference {
                element: attribute_type.name().to_string(),
                kind: "syntax",
                reference: attribute_type.syntax.clone(),
            });
        }
        Ok(())
    }

    fn check_object_class(&self, object_class: &ObjectClass) -> BuildResult<()> {
        for superior in &object_class.superiors {
            if self.lookup_object_class(superior).is_none() {
                return Err(BuildError::UndefinedReference {
                    element: object_class.name().to_string(),
                    kind: "object class",
                    reference: superior.clone(),
                });
            }
        }
        for attribute in object_class.must.iter().chain(&object_class.may) {
            if self.lookup_attribute_type(attribute).is_none() {
                return Err(BuildError::UndefinedReference {
                    element: object_class.name().to_string(),
                    kind: "attribute type",
                    reference: attribute.clone(),
                });
            }
        }
        Ok(())
    }

    /// Look up an attribute type by name or oid.
    pub fn lookup_attribute_type(&self, name: &str) -> Option<&AttributeType> {
        let oid = self.attribute_names.get(&key(name))?;
        self.attribute_types.get(oid)
    }

    /// Look up an object class by name or oid.
    pub fn lookup_object_class(&self, name: &str) -> Option<&ObjectClass> {
        let oid = self.object_class_names.get(&key(name))?;
        self.object_classes.get(oid)
    }

    /// Look up a syntax by oid.
    pub fn lookup_syntax(&self, oid: &str) -> Option<&Syntax> {
        self.syntaxes.get(oid)
    }

    /// The syntax of an attribute type.
    pub fn syntax_of(&self, attribute_type: &AttributeType) -> Option<&Syntax> {
        self.syntaxes.get(&attribute_type.syntax)
    }

    /// Resolve a name or oid to the attribute type's oid.
    pub fn attribute_oid(&self, name: &str) -> Option<&str> {
        self.attribute_names.get(&key(name)).map(String::as_str)
    }

    /// Object classes in registration order.
    pub fn object_classes(&self) -> impl Iterator<Item = &ObjectClass> {
        self.object_class_order
            .iter()
            .filter_map(|oid| self.object_classes.get(oid))
    }

    pub fn attribute_types(&self) -> impl Iterator<Item = &AttributeType> {
        self.attribute_types.values()
    }

    pub fn syntaxes(&self) -> impl Iterator<Item = &Syntax> {
        self.syntaxes.values()
    }

    /// Whether the named schema set has been loaded.
    pub fn is_schema_loaded(&self, name: &str) -> bool {
        self.loaded.iter().any(|loaded| loaded.eq_ignore_ascii_case(name))
    }

    pub fn loaded_schemas(&self) -> &[String] {
        &self.loaded
    }

    /// Find an entry attribute by any of its type's names or its oid.
    ///
    /// Unknown ids fall back to a case-insensitive id comparison.
    pub fn find_attribute<'e>(&self, entry: &'e Entry, id: &str) -> Option<&'e Attribute> {
        self.position_of(entry, id)
            .map(|index| &entry.attributes()[index])
    }

    /// Index of the entry attribute matching `id`, see [`Self::find_attribute`].
    pub fn position_of(&self, entry: &Entry, id: &str) -> Option<usize> {
        match self.attribute_oid(id) {
            Some(oid) => entry
                .attributes()
                .iter()
                .position(|attribute| self.attribute_oid(attribute.id()) == Some(oid)),
            None => entry.attributes().iter().position(|a| a.is(id)),
        }
    }

    /// Fold attributes that name the same type into the first of them.
    ///
    /// Values already present under the type's equality rule are dropped.
    /// Unknown ids are left alone.
    pub fn merge_aliases(&self, entry: &mut Entry) {
        let attributes = std::mem::take(entry.attributes_mut());
        let mut merged: Vec<Attribute> = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            let attribute_type = self.lookup_attribute_type(attribute.id());
            let existing = attribute_type.and_then(|attribute_type| {
                merged
                    .iter()
                    .position(|m| self.attribute_oid(m.id()) == Some(attribute_type.oid.as_str()))
            });
            match (existing, attribute_type) {
                (Some(index), Some(attribute_type)) => {
                    trace!("Merging '{}' into '{}'", attribute.id(), merged[index].id());
                    let target = &mut merged[index];
                    for value in attribute.values() {
                        let present = target
                            .values()
                            .iter()
                            .any(|existing| self.values_match(attribute_type, existing, value));
                        if !present {
                            target.push(value.clone());
                        }
                    }
                }
                _ => merged.push(attribute),
            }
        }
        *entry.attributes_mut() = merged;
    }

    /// Whether two values are equal under the attribute type's equality rule.
    pub fn values_match(&self, attribute_type: &AttributeType, left: &Value, right: &Value) -> bool {
        if attribute_type.is_case_ignore() {
            if let (Some(left), Some(right)) = (left.as_text(), right.as_text()) {
                return normalize_value(left) == normalize_value(right);
            }
        }
        if attribute_type.oid == OBJECT_CLASS_OID {
            return self.same_object_class(left, right);
        }
        left.as_bytes() == right.as_bytes()
    }

    fn same_object_class(&self, left: &Value, right: &Value) -> bool {
        match (left.as_text(), right.as_text()) {
            (Some(left), Some(right)) => {
                match (self.lookup_object_class(left), self.lookup_object_class(right)) {
                    (Some(left), Some(right)) => left.oid == right.oid,
                    _ => left.eq_ignore_ascii_case(right),
                }
            }
            _ => left.as_bytes() == right.as_bytes(),
        }
    }
}

fn key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn element_keys(oid: &str, names: &[String]) -> Vec<String> {
    let mut keys = vec![key(oid)];
    for name in names {
        let k = key(name);
        if !keys.contains(&k) {
            keys.push(k);
        }
    }
    keys
}
