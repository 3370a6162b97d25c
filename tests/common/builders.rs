//! Test data builders for directory entries and schema elements.
//!
//! Builders start from a valid entry so tests can break exactly one thing.

use directory_core::entry::{Attribute, Dn, Entry, Value};
use directory_core::schema::{AttributeType, AttributeUsage, ObjectClass, ObjectClassKind};

pub const SUFFIX: &str = "dc=example,dc=com";
pub const PEOPLE: &str = "ou=people,dc=example,dc=com";

/// Syntax oids used by test schema elements
pub mod syntaxes {
    pub const DIRECTORY_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.15";
    pub const INTEGER: &str = "1.3.6.1.4.1.1466.115.121.1.27";
    pub const OCTET_STRING: &str = "1.3.6.1.4.1.1466.115.121.1.40";
}

/// Builder for entries with a fluent API
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    entry: Entry,
}

impl EntryBuilder {
    /// An entry with the given DN and no attributes
    pub fn new(dn: &str) -> Self {
        Self {
            entry: Entry::new(Dn::parse(dn).expect("test DN must parse")),
        }
    }

    /// A valid `person` named `cn` under `ou=people`
    pub fn person(cn: &str) -> Self {
        Self::new(&format!("cn={},{}", cn, PEOPLE))
            .object_classes(["person"])
            .with("cn", [cn])
            .with("sn", ["Tester"])
    }

    /// A valid `inetOrgPerson` with `uid` as RDN
    pub fn inet_org_person(uid: &str) -> Self {
        Self::new(&format!("uid={},{}", uid, PEOPLE))
            .object_classes(["inetOrgPerson"])
            .with("uid", [uid])
            .with("cn", [uid])
            .with("sn", ["Tester"])
    }

    /// An `inetOrgPerson` that is also a `posixAccount`
    pub fn posix_user(uid: &str, uid_number: i64) -> Self {
        Self::inet_org_person(uid)
            .object_classes(["inetOrgPerson", "posixAccount"])
            .with("uidNumber", [uid_number.to_string()])
            .with("gidNumber", ["100"])
            .with("homeDirectory", [format!("/home/{}", uid)])
    }

    /// An `organizationalUnit` directly below the suffix
    pub fn organizational_unit(ou: &str) -> Self {
        Self::new(&format!("ou={},{}", ou, SUFFIX))
            .object_classes(["organizationalUnit"])
            .with("ou", [ou])
    }

    /// The naming context entry
    pub fn domain() -> Self {
        Self::new(SUFFIX).object_classes(["domain"]).with("dc", ["example"])
    }

    pub fn object_classes<const N: usize>(self, classes: [&str; N]) -> Self {
        self.with("objectClass", classes)
    }

    /// Set an attribute, replacing any attribute with the same id
    pub fn with<I, V>(mut self, id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.entry.put(Attribute::new(id, values));
        self
    }

    pub fn with_binary(self, id: &str, bytes: &[u8]) -> Self {
        self.with(id, [Value::binary(bytes.to_vec())])
    }

    pub fn without(mut self, id: &str) -> Self {
        self.entry.remove(id);
        self
    }

    pub fn dn(&self) -> Dn {
        self.entry.dn().clone()
    }

    pub fn build(self) -> Entry {
        self.entry
    }
}

/// Builder for attribute types
#[derive(Debug, Clone)]
pub struct AttributeTypeBuilder {
    attribute_type: AttributeType,
}

impl AttributeTypeBuilder {
    pub fn new(oid: &str, name: &str) -> Self {
        Self {
            attribute_type: AttributeType {
                oid: oid.to_string(),
                names: vec![name.to_string()],
                description: String::new(),
                syntax: syntaxes::DIRECTORY_STRING.to_string(),
                equality: Some("caseIgnoreMatch".to_string()),
                single_valued: false,
                usage: AttributeUsage::UserApplications,
                collective: false,
                user_modifiable: true,
            },
        }
    }

    pub fn syntax(mut self, oid: &str) -> Self {
        self.attribute_type.syntax = oid.to_string();
        self
    }

    pub fn integer(self) -> Self {
        let mut builder = self.syntax(syntaxes::INTEGER);
        builder.attribute_type.equality = Some("integerMatch".to_string());
        builder
    }

    pub fn single_valued(mut self) -> Self {
        self.attribute_type.single_valued = true;
        self
    }

    pub fn build(self) -> AttributeType {
        self.attribute_type
    }
}

/// Builder for object classes
#[derive(Debug, Clone)]
pub struct ObjectClassBuilder {
    object_class: ObjectClass,
}

impl ObjectClassBuilder {
    pub fn new(oid: &str, name: &str) -> Self {
        Self {
            object_class: ObjectClass {
                oid: oid.to_string(),
                names: vec![name.to_string()],
                description: String::new(),
                kind: ObjectClassKind::Structural,
                superiors: vec!["top".to_string()],
                must: Vec::new(),
                may: Vec::new(),
            },
        }
    }

    pub fn kind(mut self, kind: ObjectClassKind) -> Self {
        self.object_class.kind = kind;
        self
    }

    pub fn superiors<const N: usize>(mut self, superiors: [&str; N]) -> Self {
        self.object_class.superiors = superiors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn must<const N: usize>(mut self, must: [&str; N]) -> Self {
        self.object_class.must = must.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn may<const N: usize>(mut self, may: [&str; N]) -> Self {
        self.object_class.may = may.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> ObjectClass {
        self.object_class
    }
}
