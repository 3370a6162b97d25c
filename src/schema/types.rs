//! Core schema type definitions.
//!
//! This module contains the schema elements the registry serves: attribute
//! types, object classes and syntaxes, in the shape of the JSON schema
//! documents they are loaded from.

use super::syntax::SyntaxChecker;
use serde::{Deserialize, Serialize};

/// A named schema document, e.g. `core` or `inetorgperson`.
///
/// Documents list the documents they depend on; the registry loads them in
/// dependency order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    /// Schema set name
    pub name: String,
    /// Schema sets that must be loaded first
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub syntaxes: Vec<Syntax>,
    #[serde(default)]
    pub attribute_types: Vec<AttributeType>,
    #[serde(default)]
    pub object_classes: Vec<ObjectClass>,
}

/// An LDAP syntax: how values of an attribute are represented and checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Syntax {
    pub oid: String,
    #[serde(default)]
    pub description: String,
    /// Whether values are human-readable text rather than raw bytes
    #[serde(default = "default_true")]
    pub human_readable: bool,
    /// Predicate applied to each value
    pub checker: SyntaxChecker,
}

/// Definition of an attribute type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeType {
    /// Globally unique object identifier
    pub oid: String,
    /// Short names, the first being the primary name
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Syntax oid
    pub syntax: String,
    /// Equality matching rule name
    #[serde(default)]
    pub equality: Option<String>,
    #[serde(default)]
    pub single_valued: bool,
    #[serde(default)]
    pub usage: AttributeUsage,
    #[serde(default)]
    pub collective: bool,
    #[serde(default = "default_true")]
    pub user_modifiable: bool,
}

impl AttributeType {
    /// Primary name, falling back to the oid.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.oid)
    }

    /// Whether `name` is the oid or one of the names, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.oid == name || self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn is_operational(&self) -> bool {
        self.usage != AttributeUsage::UserApplications
    }

    /// Whether values compare case-insensitively.
    pub fn is_case_ignore(&self) -> bool {
        self.equality
            .as_deref()
            .is_some_and(|rule| rule.starts_with("caseIgnore"))
    }
}

/// Attribute usage classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeUsage {
    /// Regular user attribute
    #[default]
    UserApplications,
    /// Operational attribute maintained by the server
    DirectoryOperation,
    /// Operational attribute shared across servers
    DistributedOperation,
    /// Operational attribute local to one server
    DsaOperation,
}

/// Definition of an object class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectClass {
    pub oid: String,
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: ObjectClassKind,
    /// Direct superiors, by name or oid
    #[serde(default)]
    pub superiors: Vec<String>,
    /// Mandatory attributes, by name or oid
    #[serde(default)]
    pub must: Vec<String>,
    /// Optional attributes, by name or oid
    #[serde(default)]
    pub may: Vec<String>,
}

impl ObjectClass {
    /// Primary name, falling back to the oid.
    pub fn name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or(&self.oid)
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.oid == name || self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    pub fn is_structural(&self) -> bool {
        self.kind == ObjectClassKind::Structural
    }
}

/// Object class kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObjectClassKind {
    #[default]
    Structural,
    Abstract,
    Auxiliary,
}

fn default_true() -> bool {
    true
}
