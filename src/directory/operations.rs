//! Directory operations.
//!
//! Every operation is wrapped in an [`Invocation`] and dispatched through the
//! interceptor chain; none of them reaches the backend directly.

use super::core::DirectoryCore;
use crate::entry::{Dn, Entry, Modification, Rdn};
use crate::error::{DirectoryError, DirectoryResult};
use crate::filter::Filter;
use crate::interceptor::Invocation;
use crate::nexus::Nexus;
use crate::operation::{
    AddContext, Cursor, DeleteContext, HasEntryContext, LookupContext, ModifyContext,
    MoveAndRenameContext, MoveContext, Operation, OperationKind, OperationResult, RenameContext,
    RequestContext, SearchContext, SearchScope,
};
use log::debug;

/// Attempts an update makes before a concurrent-write conflict is returned.
const MAX_UPDATE_ATTEMPTS: usize = 8;

impl<N: Nexus + 'static> DirectoryCore<N> {
    /// Run any operation through the interceptor chain.
    ///
    /// An update whose entry changed after it was read is dispatched again
    /// from the start, against the newly stored entry.
    pub async fn execute(
        &self,
        operation: Operation,
        context: &RequestContext,
    ) -> DirectoryResult<OperationResult> {
        let mut attempt = 1;
        loop {
            let invocation = Invocation::new(context.clone(), operation.clone());
            match self.chain.dispatch(self.nexus.as_ref(), invocation).await {
                Err(DirectoryError::Conflict { dn }) if attempt < MAX_UPDATE_ATTEMPTS => {
                    debug!(
                        "Retrying {} of {} after a concurrent update (attempt {})",
                        operation.kind(),
                        dn,
                        attempt
                    );
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    /// Add an entry. The stored entry carries the normalized objectClass set.
    pub async fn add(&self, entry: Entry, context: &RequestContext) -> DirectoryResult<()> {
        let result = self.execute(Operation::Add(AddContext::new(entry)), context).await?;
        expect_done(OperationKind::Add, result)
    }

    /// Delete a leaf entry.
    pub async fn delete(&self, dn: Dn, context: &RequestContext) -> DirectoryResult<()> {
        let result = self.execute(Operation::Delete(DeleteContext { dn }), context).await?;
        expect_done(OperationKind::Delete, result)
    }

    /// Apply modifications atomically; either all of them take effect or none.
    pub async fn modify(
        &self,
        dn: Dn,
        modifications: Vec<Modification>,
        context: &RequestContext,
    ) -> DirectoryResult<()> {
        let operation = Operation::Modify(ModifyContext::new(dn, modifications));
        let result = self.execute(operation, context).await?;
        expect_done(OperationKind::Modify, result)
    }

    pub async fn rename(
        &self,
        dn: Dn,
        new_rdn: Rdn,
        delete_old_rdn: bool,
        context: &RequestContext,
    ) -> DirectoryResult<()> {
        let operation = Operation::Rename(RenameContext::new(dn, new_rdn, delete_old_rdn));
        let result = self.execute(operation, context).await?;
        expect_done(OperationKind::Rename, result)
    }

    /// Move an entry and its subtree under `new_superior`.
    pub async fn move_entry(
        &self,
        dn: Dn,
        new_superior: Dn,
        context: &RequestContext,
    ) -> DirectoryResult<()> {
        let operation = Operation::Move(MoveContext::new(dn, new_superior));
        let result = self.execute(operation, context).await?;
        expect_done(OperationKind::Move, result)
    }

    pub async fn move_and_rename(
        &self,
        dn: Dn,
        new_superior: Dn,
        new_rdn: Rdn,
        delete_old_rdn: bool,
        context: &RequestContext,
    ) -> DirectoryResult<()> {
        let operation = Operation::MoveAndRename(MoveAndRenameContext::new(
            dn,
            new_superior,
            new_rdn,
            delete_old_rdn,
        ));
        let result = self.execute(operation, context).await?;
        expect_done(OperationKind::MoveAndRename, result)
    }

    /// Search beneath `base` and return a cursor over matching entries.
    pub async fn search(
        &self,
        base: Dn,
        scope: SearchScope,
        filter: Filter,
        context: &RequestContext,
    ) -> DirectoryResult<Cursor> {
        self.search_with(SearchContext::new(base, scope, filter), context)
            .await
    }

    /// Search with a fully specified context (attribute selection, size limit).
    pub async fn search_with(
        &self,
        search: SearchContext,
        context: &RequestContext,
    ) -> DirectoryResult<Cursor> {
        match self.execute(Operation::Search(search), context).await? {
            OperationResult::Entries(cursor) => Ok(cursor),
            other => Err(unexpected(OperationKind::Search, &other)),
        }
    }

    pub async fn lookup(&self, dn: Dn, context: &RequestContext) -> DirectoryResult<Option<Entry>> {
        self.lookup_with(LookupContext::new(dn), context).await
    }

    /// Look up an entry returning only the requested attributes.
    pub async fn lookup_with(
        &self,
        lookup: LookupContext,
        context: &RequestContext,
    ) -> DirectoryResult<Option<Entry>> {
        match self.execute(Operation::Lookup(lookup), context).await? {
            OperationResult::Entry(entry) => Ok(entry),
            other => Err(unexpected(OperationKind::Lookup, &other)),
        }
    }

    pub async fn has_entry(&self, dn: Dn, context: &RequestContext) -> DirectoryResult<bool> {
        match self
            .execute(Operation::HasEntry(HasEntryContext { dn }), context)
            .await?
        {
            OperationResult::Exists(exists) => Ok(exists),
            other => Err(unexpected(OperationKind::HasEntry, &other)),
        }
    }
}

fn expect_done(kind: OperationKind, result: OperationResult) -> DirectoryResult<()> {
    match result {
        OperationResult::Done => Ok(()),
        other => Err(unexpected(kind, &other)),
    }
}

fn unexpected(kind: OperationKind, result: &OperationResult) -> DirectoryError {
    DirectoryError::internal(format!("backend returned {:?} for {}", result, kind))
}
