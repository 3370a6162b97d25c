//! Published schema state shared by concurrent operations.
//!
//! A [`SchemaSnapshot`] pairs a registry with the closure computed from it and
//! is never mutated once built. [`SharedSchema`] holds the current snapshot;
//! schema changes build a new snapshot off to the side and publish it with a
//! single swap, so readers see either the old schema or the new one.

use super::closure::ObjectClassClosure;
use super::modification::ModificationApplier;
use super::registry::SchemaRegistry;
use super::validation::EntryValidator;
use crate::entry::{Entry, Modification};
use crate::error::{BuildResult, SchemaResult};
use log::info;
use std::sync::{Arc, Mutex, RwLock};

/// An immutable registry and its object class closure.
#[derive(Debug, Clone)]
pub struct SchemaSnapshot {
    registry: SchemaRegistry,
    closure: ObjectClassClosure,
    check_rdn: bool,
}

impl SchemaSnapshot {
    pub fn new(registry: SchemaRegistry) -> Self {
        let closure = ObjectClassClosure::build(&registry);
        Self {
            registry,
            closure,
            check_rdn: true,
        }
    }

    /// Enable or disable the RDN consistency check for this snapshot.
    pub fn with_rdn_check(mut self, check_rdn: bool) -> Self {
        self.check_rdn = check_rdn;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn closure(&self) -> &ObjectClassClosure {
        &self.closure
    }

    pub fn validator(&self) -> EntryValidator<'_> {
        EntryValidator::new(&self.registry, &self.closure).with_rdn_check(self.check_rdn)
    }

    pub fn applier(&self) -> ModificationApplier<'_> {
        ModificationApplier::new(&self.registry)
    }

    /// Validate an entry, returning its normalized form.
    pub fn check_entry(&self, entry: &Entry) -> SchemaResult<Entry> {
        self.validator().check(entry)
    }

    /// Apply modifications to a copy of `entry` and validate the result.
    pub fn check_modifications(
        &self,
        entry: &Entry,
        modifications: &[Modification],
    ) -> SchemaResult<Entry> {
        let modified = self.applier().apply(entry, modifications)?;
        self.validator().check(&modified)
    }
}

/// The current schema snapshot, swapped atomically on change.
#[derive(Debug)]
pub struct SharedSchema {
    current: RwLock<Arc<SchemaSnapshot>>,
    // Serializes writers so concurrent schema changes are not lost.
    writer: Mutex<()>,
}

impl SharedSchema {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<SchemaSnapshot> {
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Change the registry and publish a snapshot with a rebuilt closure.
    ///
    /// `change` runs against a copy of the registry; if it fails nothing is
    /// published.
    pub fn update<F>(&self, change: F) -> BuildResult<Arc<SchemaSnapshot>>
    where
        F: FnOnce(&mut SchemaRegistry) -> BuildResult<()>,
    {
        let _writer = match self.writer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let base = self.current();
        let mut registry = base.registry.clone();
        change(&mut registry)?;

        let snapshot = Arc::new(SchemaSnapshot::new(registry).with_rdn_check(base.check_rdn));
        info!(
            "Publishing schema snapshot with {} object classes",
            snapshot.closure.len()
        );
        match self.current.write() {
            Ok(mut guard) => *guard = Arc::clone(&snapshot),
            Err(poisoned) => *poisoned.into_inner() = Arc::clone(&snapshot),
        }
        Ok(snapshot)
    }
}
