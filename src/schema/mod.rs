//! Schema definitions and enforcement for directory entries.
//!
//! This module provides the schema registry, the object class closure computed
//! from it, and the validation engine that checks entries and modify requests.
//!
//! # Key Types
//!
//! - [`SchemaRegistry`] - Attribute types, object classes and syntaxes by name or oid
//! - [`ObjectClassClosure`] - Transitive superiors and MUST/MAY sets per class
//! - [`EntryValidator`] - Full schema check of an entry
//! - [`ModificationApplier`] - Applies modify requests to a copy of an entry
//! - [`SharedSchema`] - Atomically swapped registry + closure snapshot
//!
//! # Examples
//!
//! ```rust
//! use directory_core::entry::{Dn, Entry};
//! use directory_core::schema::SchemaSnapshot;
//! use directory_core::schema::SchemaRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let snapshot = SchemaSnapshot::new(SchemaRegistry::new()?);
//! let entry = Entry::new(Dn::parse("cn=Alice,dc=example,dc=com")?)
//!     .with_attribute("objectClass", ["person"])
//!     .with_attribute("cn", ["Alice"])
//!     .with_attribute("sn", ["Smith"]);
//!
//! let normalized = snapshot.check_entry(&entry)?;
//! assert_eq!(normalized.object_classes(), vec!["top", "person"]);
//! # Ok(())
//! # }
//! ```

pub mod closure;
pub mod embedded;
pub mod modification;
pub mod registry;
pub mod snapshot;
pub mod syntax;
pub mod types;
pub mod validation;


// Re-export the main types for convenience
pub use closure::{ClosureEntry, ObjectClassClosure};
pub use modification::ModificationApplier;
pub use registry::SchemaRegistry;
pub use snapshot::{SchemaSnapshot, SharedSchema};
pub use syntax::SyntaxChecker;
pub use types::{
    AttributeType, AttributeUsage, ObjectClass, ObjectClassKind, SchemaDocument, Syntax,
};
pub use validation::EntryValidator;
