//! Directory entries, attributes and modifications.
//!
//! An [`Entry`] is a DN plus an ordered list of [`Attribute`]s. Attribute ids
//! are kept as the user supplied them; resolving aliases (`cn` vs `commonName`)
//! and oids is the schema registry's job, so lookups here are plain
//! case-insensitive id comparisons. Schema-aware lookups live in
//! [`crate::schema::SchemaRegistry::find_attribute`].
//!
//! # Examples
//!
//! ```rust
//! use directory_core::entry::{Dn, Entry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let entry = Entry::new(Dn::parse("cn=Alice,dc=example,dc=com")?)
//!     .with_attribute("objectClass", ["person"])
//!     .with_attribute("cn", ["Alice"])
//!     .with_attribute("sn", ["Smith"]);
//!
//! assert_eq!(entry.get("CN").map(|a| a.len()), Some(1));
//! # Ok(())
//! # }
//! ```

pub mod dn;
pub mod value;

pub use dn::{Ava, Dn, Rdn};
use dn::normalize_value;
pub use value::Value;

use serde::{Deserialize, Serialize};

/// Id of the attribute holding an entry's object classes.
pub const OBJECT_CLASS: &str = "objectClass";

/// An attribute: an id plus an ordered collection of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    id: String,
    #[serde(default)]
    values: Vec<Value>,
}

impl Attribute {
    /// Create an attribute with the given values.
    pub fn new<I, V>(id: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            id: id.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an attribute without values.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            values: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this attribute's id matches `id`, ignoring case.
    pub fn is(&self, id: &str) -> bool {
        self.id.eq_ignore_ascii_case(id)
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut Vec<Value> {
        &mut self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: impl Into<Value>) {
        self.values.push(value.into());
    }

    /// Iterate over the values that are text.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(Value::as_text)
    }
}

/// A directory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    dn: Dn,
    #[serde(default)]
    attributes: Vec<Attribute>,
}

impl Entry {
    /// Create an entry with no attributes.
    pub fn new(dn: Dn) -> Self {
        Self {
            dn,
            attributes: Vec::new(),
        }
    }

    /// Builder-style helper adding an attribute.
    pub fn with_attribute<I, V>(mut self, id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.put(Attribute::new(id, values));
        self
    }

    pub fn dn(&self) -> &Dn {
        &self.dn
    }

    pub fn set_dn(&mut self, dn: Dn) {
        self.dn = dn;
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut Vec<Attribute> {
        &mut self.attributes
    }

    /// The attribute whose id matches `id`, ignoring case.
    pub fn get(&self, id: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|attribute| attribute.is(id))
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Attribute> {
        self.attributes.iter_mut().find(|attribute| attribute.is(id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Insert an attribute, replacing any attribute with the same id.
    pub fn put(&mut self, attribute: Attribute) {
        match self.attributes.iter_mut().find(|a| a.is(attribute.id())) {
            Some(existing) => *existing = attribute,
            None => self.attributes.push(attribute),
        }
    }

    /// Remove the attribute with the given id.
    pub fn remove(&mut self, id: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|a| a.is(id))?;
        Some(self.attributes.remove(index))
    }

    /// Text values of the objectClass attribute.
    pub fn object_classes(&self) -> Vec<&str> {
        self.get(OBJECT_CLASS)
            .map(|attribute| attribute.texts().collect())
            .unwrap_or_default()
    }

    /// Whether the entry lists the given object class, ignoring case.
    pub fn has_object_class(&self, name: &str) -> bool {
        self.object_classes()
            .iter()
            .any(|oc| oc.eq_ignore_ascii_case(name))
    }

    /// The entry as it looks after a rename to `new_dn`.
    ///
    /// Values of the new RDN are added when missing. With `delete_old_rdn` the
    /// old RDN values are dropped unless the new RDN repeats them; attributes
    /// left without values are removed.
    pub fn renamed(&self, new_dn: Dn, delete_old_rdn: bool) -> Entry {
        let mut renamed = self.clone();
        let old_rdn = self.dn.rdn().cloned();
        let new_rdn = new_dn.rdn().cloned();
        renamed.dn = new_dn;

        let same = |a: &Value, b: &str| {
            a.as_text()
                .is_some_and(|text| normalize_value(text) == normalize_value(b))
        };

        if let (true, Some(old_rdn)) = (delete_old_rdn, &old_rdn) {
            for ava in old_rdn.avas() {
                let kept = new_rdn
                    .as_ref()
                    .is_some_and(|rdn| rdn.avas().iter().any(|new| new == ava));
                if kept {
                    continue;
                }
                if let Some(attribute) = renamed.get_mut(ava.attribute()) {
                    attribute.values_mut().retain(|value| !same(value, ava.value()));
                }
            }
            renamed.attributes.retain(|attribute| !attribute.is_empty());
        }

        if let Some(new_rdn) = &new_rdn {
            for ava in new_rdn.avas() {
                match renamed.get_mut(ava.attribute()) {
                    Some(attribute) => {
                        if !attribute.values().iter().any(|value| same(value, ava.value())) {
                            attribute.push(ava.value());
                        }
                    }
                    None => renamed.put(Attribute::new(ava.attribute(), [ava.value()])),
                }
            }
        }
        renamed
    }
}

/// The kind of change a [`Modification`] applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModificationOperation {
    /// Add values, creating the attribute if needed
    Add,
    /// Remove listed values, or the whole attribute when none are listed
    Remove,
    /// Replace all values, removing the attribute when none are listed
    Replace,
    /// Add an integer to every value of an integer attribute
    Increment,
}

/// A single attribute modification of a modify request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modification {
    pub operation: ModificationOperation,
    pub attribute: Attribute,
}

impl Modification {
    pub fn new(operation: ModificationOperation, attribute: Attribute) -> Self {
        Self {
            operation,
            attribute,
        }
    }

    pub fn add<I, V>(id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(ModificationOperation::Add, Attribute::new(id, values))
    }

    pub fn remove<I, V>(id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(ModificationOperation::Remove, Attribute::new(id, values))
    }

    /// Remove the whole attribute.
    pub fn remove_all(id: &str) -> Self {
        Self::new(ModificationOperation::Remove, Attribute::empty(id))
    }

    pub fn replace<I, V>(id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(ModificationOperation::Replace, Attribute::new(id, values))
    }

    /// Increment by `by`.
    pub fn increment(id: &str, by: i64) -> Self {
        Self::new(ModificationOperation::Increment, Attribute::new(id, [by]))
    }

    /// Increment by the default step of one.
    pub fn increment_by_one(id: &str) -> Self {
        Self::new(ModificationOperation::Increment, Attribute::empty(id))
    }
}
