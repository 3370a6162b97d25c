//! Operational attribute stamping.
//!
//! Adds record who created an entry and when, with a fresh `entryUUID`;
//! updates record who last modified it and when.

use crate::entry::{Attribute, Entry};
use crate::error::DirectoryResult;
use crate::interceptor::{Invocation, Stage};
use crate::operation::Operation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::trace;
use uuid::Uuid;

pub const CREATE_TIMESTAMP: &str = "createTimestamp";
pub const CREATORS_NAME: &str = "creatorsName";
pub const MODIFY_TIMESTAMP: &str = "modifyTimestamp";
pub const MODIFIERS_NAME: &str = "modifiersName";
pub const ENTRY_UUID: &str = "entryUUID";

/// Generalized time as stored in timestamp attributes.
pub fn generalized_time(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d%H%M%SZ").to_string()
}

/// Stamps server-maintained attributes on entries about to be written.
///
/// Runs after schema checking, so the attributes it adds are never subject to
/// the user-modifiable restriction.
#[derive(Debug, Clone, Default)]
pub struct OperationalAttributeStage;

impl OperationalAttributeStage {
    pub fn new() -> Self {
        Self
    }

    fn stamp_creation(entry: &mut Entry, principal: Option<String>, now: &str) {
        entry.put(Attribute::new(CREATE_TIMESTAMP, [now]));
        entry.put(Attribute::new(ENTRY_UUID, [Uuid::new_v4().to_string()]));
        if let Some(principal) = principal {
            entry.put(Attribute::new(CREATORS_NAME, [principal]));
        }
    }

    fn stamp_modification(entry: &mut Entry, principal: Option<String>, now: &str) {
        entry.put(Attribute::new(MODIFY_TIMESTAMP, [now]));
        if let Some(principal) = principal {
            entry.put(Attribute::new(MODIFIERS_NAME, [principal]));
        }
    }
}

#[async_trait]
impl Stage for OperationalAttributeStage {
    fn name(&self) -> &str {
        "operationalAttribute"
    }

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        let principal = invocation.request().principal.as_ref().map(|dn| dn.to_string());
        let now = generalized_time(Utc::now());
        trace!("Stamping operational attributes at {} (invocation: '{}')", now, invocation.id());

        match invocation.operation_mut() {
            Operation::Add(ctx) => Self::stamp_creation(&mut ctx.entry, principal, &now),
            operation => {
                if let Some(Some(entry)) = operation.entry_slot() {
                    Self::stamp_modification(entry, principal, &now);
                }
            }
        }
        Ok(())
    }
}
