//! Schema enforcement as a pipeline stage.
//!
//! Adds are validated as submitted. Modify, rename and move requests are
//! applied to the current entry (loaded into the operation context by an
//! earlier stage) and the resulting entry is validated; on success it replaces
//! the context's entry so the backend stores exactly what was checked. Search
//! filters get their assertion values re-encoded to match attribute syntaxes.

use crate::entry::{Entry, Modification, ModificationOperation, Value};
use crate::error::{DirectoryError, DirectoryResult, SchemaResult, SchemaViolation};
use crate::filter::Filter;
use crate::interceptor::{Invocation, Stage};
use crate::operation::Operation;
use crate::schema::registry::OBJECT_CLASS_OID;
use crate::schema::{SchemaRegistry, SchemaSnapshot, SharedSchema};
use async_trait::async_trait;
use log::{debug, trace};
use std::sync::Arc;

/// Validates entries and modifications against the current schema snapshot.
#[derive(Debug, Clone)]
pub struct SchemaStage {
    schema: Arc<SharedSchema>,
}

impl SchemaStage {
    pub fn new(schema: Arc<SharedSchema>) -> Self {
        Self { schema }
    }

    fn check_add(&self, snapshot: &SchemaSnapshot, entry: &Entry) -> SchemaResult<Entry> {
        for attribute in entry.attributes() {
            let attribute_type = snapshot
                .registry()
                .lookup_attribute_type(attribute.id())
                .ok_or_else(|| SchemaViolation::unrecognized(attribute.id()))?;
            if !attribute_type.user_modifiable {
                return Err(SchemaViolation::NoPermissionOnOperationalAttribute {
                    attribute: attribute.id().to_string(),
                });
            }
        }
        snapshot.check_entry(entry)
    }

    fn check_modify(
        &self,
        snapshot: &SchemaSnapshot,
        current: &Entry,
        modifications: &[Modification],
    ) -> SchemaResult<Entry> {
        let registry = snapshot.registry();
        for modification in modifications {
            let id = modification.attribute.id();
            let attribute_type = registry
                .lookup_attribute_type(id)
                .ok_or_else(|| SchemaViolation::unrecognized(id))?;
            if !attribute_type.user_modifiable {
                return Err(SchemaViolation::NoPermissionOnOperationalAttribute {
                    attribute: id.to_string(),
                });
            }
            if attribute_type.oid == OBJECT_CLASS_OID {
                check_object_class_modification(modification)?;
            }
            check_rdn_preserved(registry, current, modification)?;
        }
        snapshot.check_modifications(current, modifications)
    }

    fn coerce_filter(&self, registry: &SchemaRegistry, filter: &mut Filter) {
        filter.for_each_value_mut(|attribute, value| {
            let Some(syntax) = registry
                .lookup_attribute_type(attribute)
                .and_then(|attribute_type| registry.syntax_of(attribute_type))
            else {
                return;
            };
            let current = std::mem::replace(value, Value::Binary(Vec::new()));
            *value = if syntax.human_readable {
                // Undecodable bytes stay binary; the backend just won't match them
                current.into_text().unwrap_or_else(Value::Binary)
            } else {
                current.into_binary()
            };
        });
    }
}

fn check_object_class_modification(modification: &Modification) -> SchemaResult<()> {
    let strips_all = match modification.operation {
        ModificationOperation::Remove | ModificationOperation::Replace => {
            modification.attribute.is_empty()
        }
        ModificationOperation::Increment => {
            return Err(SchemaViolation::illegal_modification(
                modification.attribute.id(),
                "objectClass cannot be incremented",
            ));
        }
        ModificationOperation::Add => false,
    };
    if strips_all {
        return Err(SchemaViolation::ObjectClassModification {
            reason: "an entry cannot lose all of its object classes".to_string(),
        });
    }
    Ok(())
}

/// A modification may not drop a value that names the entry.
fn check_rdn_preserved(
    registry: &SchemaRegistry,
    current: &Entry,
    modification: &Modification,
) -> SchemaResult<()> {
    let Some(rdn) = current.dn().rdn() else {
        return Ok(());
    };
    let Some(attribute_type) = registry.lookup_attribute_type(modification.attribute.id()) else {
        return Ok(());
    };

    for ava in rdn.avas() {
        if !attribute_type.is_named(ava.attribute())
            && registry.attribute_oid(ava.attribute()) != Some(attribute_type.oid.as_str())
        {
            continue;
        }
        let rdn_value = Value::text(ava.value());
        let listed = modification
            .attribute
            .values()
            .iter()
            .any(|value| registry.values_match(attribute_type, value, &rdn_value));
        let removes_rdn_value = match modification.operation {
            ModificationOperation::Remove => modification.attribute.is_empty() || listed,
            ModificationOperation::Replace => !listed,
            ModificationOperation::Increment => true,
            ModificationOperation::Add => false,
        };
        if removes_rdn_value {
            return Err(SchemaViolation::NotAllowedOnRdn {
                attribute: ava.attribute().to_string(),
                value: ava.value().to_string(),
            });
        }
    }
    Ok(())
}

fn current_entry(entry: &Option<Entry>, invocation_dn: &crate::entry::Dn) -> DirectoryResult<Entry> {
    entry.clone().ok_or_else(|| {
        DirectoryError::internal(format!(
            "current entry of {} was not loaded before schema checking",
            invocation_dn
        ))
    })
}

#[async_trait]
impl Stage for SchemaStage {
    fn name(&self) -> &str {
        "schema"
    }

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        let snapshot = self.schema.current();
        let kind = invocation.kind();

        match invocation.operation_mut() {
            Operation::Add(ctx) => {
                ctx.entry.set_dn(ctx.dn.clone());
                ctx.entry = self.check_add(&snapshot, &ctx.entry)?;
            }
            Operation::Modify(ctx) => {
                let current = current_entry(&ctx.entry, &ctx.dn)?;
                ctx.entry = Some(self.check_modify(&snapshot, &current, &ctx.modifications)?);
            }
            Operation::Rename(ctx) => {
                let current = current_entry(&ctx.entry, &ctx.dn)?;
                let renamed = current.renamed(ctx.new_dn(), ctx.delete_old_rdn);
                ctx.entry = Some(snapshot.check_entry(&renamed)?);
            }
            Operation::Move(ctx) => {
                let current = current_entry(&ctx.entry, &ctx.dn)?;
                let moved = current.renamed(ctx.new_dn(), false);
                ctx.entry = Some(snapshot.check_entry(&moved)?);
            }
            Operation::MoveAndRename(ctx) => {
                let current = current_entry(&ctx.entry, &ctx.dn)?;
                let renamed = current.renamed(ctx.new_dn(), ctx.delete_old_rdn);
                ctx.entry = Some(snapshot.check_entry(&renamed)?);
            }
            Operation::Search(ctx) => {
                self.coerce_filter(snapshot.registry(), &mut ctx.filter);
                trace!("Search filter after coercion: {}", ctx.filter);
            }
            Operation::Delete(_) | Operation::Lookup(_) | Operation::HasEntry(_) => return Ok(()),
        }

        debug!(
            "Schema check passed for {} (invocation: '{}')",
            kind,
            invocation.id()
        );
        Ok(())
    }
}
