//! Existence checks ahead of the backend.

use crate::entry::Dn;
use crate::error::{DirectoryError, DirectoryResult};
use crate::interceptor::{Invocation, Stage};
use crate::nexus::Nexus;
use crate::operation::{LookupContext, OperationKind};
use async_trait::async_trait;
use log::trace;
use std::sync::Arc;

/// Translates missing or clashing names into directory errors before the
/// backend sees the operation, and loads the current entry for operations
/// that change an existing one.
pub struct ExceptionStage<N> {
    nexus: Arc<N>,
}

impl<N: Nexus> ExceptionStage<N> {
    pub fn new(nexus: Arc<N>) -> Self {
        Self { nexus }
    }

    async fn require(&self, dn: &Dn) -> DirectoryResult<()> {
        if dn.is_root() || self.nexus.has_entry(dn).await? {
            Ok(())
        } else {
            Err(DirectoryError::no_such_entry(dn))
        }
    }

    async fn require_absent(&self, dn: &Dn) -> DirectoryResult<()> {
        if self.nexus.has_entry(dn).await? {
            Err(DirectoryError::already_exists(dn))
        } else {
            Ok(())
        }
    }

    async fn require_parent(&self, dn: &Dn) -> DirectoryResult<()> {
        if self.nexus.is_suffix(dn) {
            return Ok(());
        }
        match dn.parent() {
            Some(parent) => self.require(&parent).await,
            None => Err(DirectoryError::no_such_entry(dn)),
        }
    }

    /// Checks for operations that give an existing entry a new DN.
    async fn check_relocation(&self, dn: &Dn, new_dn: &Dn) -> DirectoryResult<()> {
        if new_dn != dn {
            self.require_absent(new_dn).await?;
        }
        self.require_parent(new_dn).await
    }
}

#[async_trait]
impl<N: Nexus + 'static> Stage for ExceptionStage<N> {
    fn name(&self) -> &str {
        "exception"
    }

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        let dn = invocation.operation().dn().clone();
        let new_dn = invocation.operation().new_dn();
        trace!("Checking existence constraints for {} of {}", invocation.kind(), dn);

        match invocation.kind() {
            OperationKind::Add => {
                self.require_absent(&dn).await?;
                self.require_parent(&dn).await?;
            }
            OperationKind::Delete | OperationKind::Search => self.require(&dn).await?,
            OperationKind::Lookup | OperationKind::HasEntry => {}
            OperationKind::Modify
            | OperationKind::Rename
            | OperationKind::Move
            | OperationKind::MoveAndRename => {
                let current = self
                    .nexus
                    .lookup(&LookupContext::new(dn.clone()))
                    .await?
                    .ok_or_else(|| DirectoryError::no_such_entry(&dn))?;
                if let Some(new_dn) = &new_dn {
                    self.check_relocation(&dn, new_dn).await?;
                }
                invocation.operation_mut().load_current(current);
            }
        }
        Ok(())
    }
}
