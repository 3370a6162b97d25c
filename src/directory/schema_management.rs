//! Runtime schema changes.
//!
//! Each change is applied to a copy of the current registry, the object class
//! closure is rebuilt, and the new snapshot is published in one swap.
//! Operations already in flight finish against the snapshot they started with.

use super::core::DirectoryCore;
use crate::error::BuildResult;
use crate::nexus::Nexus;
use crate::schema::{AttributeType, ObjectClass, SchemaSnapshot, SharedSchema, Syntax};
use log::info;
use std::sync::Arc;

impl<N: Nexus + 'static> DirectoryCore<N> {
    /// The schema snapshot in effect right now.
    pub fn schema(&self) -> Arc<SchemaSnapshot> {
        self.schema.current()
    }

    pub fn shared_schema(&self) -> &Arc<SharedSchema> {
        &self.schema
    }

    pub fn add_syntax(&self, syntax: Syntax) -> BuildResult<()> {
        let oid = syntax.oid.clone();
        self.schema.update(|registry| registry.add_syntax(syntax))?;
        info!("Added syntax {}", oid);
        Ok(())
    }

    /// Register an attribute type; its syntax must already be known.
    pub fn add_attribute_type(&self, attribute_type: AttributeType) -> BuildResult<()> {
        let name = attribute_type.name().to_string();
        self.schema
            .update(|registry| registry.add_attribute_type(attribute_type))?;
        info!("Added attribute type {}", name);
        Ok(())
    }

    /// Register an object class; its superiors and MUST/MAY attributes must
    /// already be known.
    pub fn add_object_class(&self, object_class: ObjectClass) -> BuildResult<()> {
        let name = object_class.name().to_string();
        self.schema
            .update(|registry| registry.add_object_class(object_class))?;
        info!("Added object class {}", name);
        Ok(())
    }

    /// Load a whole schema document (JSON) into the running directory.
    pub fn load_schema_json(&self, document: &str) -> BuildResult<()> {
        self.schema
            .update(|registry| registry.load_schema_str(document))?;
        Ok(())
    }
}
