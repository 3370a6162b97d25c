//! Backend nexus: the storage side of the directory core.
//!
//! This module separates storage from the schema and pipeline logic. The
//! `Nexus` trait defines what the core needs from a backend once every "before"
//! stage has accepted an operation: store, remove, relocate and read entries.
//!
//! # Architecture
//!
//! The nexus is responsible for:
//! - Keeping entries keyed by DN under one or more naming contexts (suffixes)
//! - Tree integrity: parents exist, only leaves are deleted, subtrees move together
//! - Evaluating search scopes and filters
//!
//! The nexus is NOT responsible for:
//! - Schema validation or objectClass normalization
//! - Operational attributes (timestamps, creator names, entry UUIDs)
//! - Access control
//!
//! Write operations receive the entry to store already computed: the add entry
//! and the modify post-state are the ones the schema stage validated. Updates
//! also carry the entry they were computed from; a backend rejects the write
//! with [`DirectoryError::Conflict`](crate::error::DirectoryError::Conflict)
//! when the stored entry no longer matches it.
//!
//! # Example Usage
//!
//! ```rust
//! use directory_core::entry::{Dn, Entry};
//! use directory_core::nexus::{InMemoryPartition, Nexus};
//! use directory_core::operation::AddContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let partition = InMemoryPartition::with_suffix(Dn::parse("dc=example,dc=com")?);
//! let root = Entry::new(Dn::parse("dc=example,dc=com")?)
//!     .with_attribute("objectClass", ["top", "domain"])
//!     .with_attribute("dc", ["example"]);
//!
//! partition.add(&AddContext::new(root)).await?;
//! assert!(partition.has_entry(&Dn::parse("DC=Example,DC=Com")?).await?);
//! # Ok(())
//! # }
//! ```

pub mod in_memory;

pub use in_memory::{InMemoryPartition, PartitionStats};

use crate::entry::{Dn, Entry};
use crate::error::DirectoryResult;
use crate::operation::{
    AddContext, Cursor, LookupContext, ModifyContext, MoveAndRenameContext, MoveContext,
    Operation, OperationResult, RenameContext, SearchContext,
};
use std::future::Future;

/// Storage backend invoked after the "before" stages succeed.
pub trait Nexus: Send + Sync {
    /// Store a new entry.
    fn add(&self, ctx: &AddContext) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Remove a leaf entry.
    fn delete(&self, dn: &Dn) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Replace an entry with the modify post-state in `ctx.entry`, provided
    /// it still equals `ctx.base`.
    fn modify(&self, ctx: &ModifyContext) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Give an entry a new RDN, relocating its subtree.
    fn rename(&self, ctx: &RenameContext) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Move an entry and its subtree under a new superior.
    fn move_entry(&self, ctx: &MoveContext) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Move an entry under a new superior and rename it in one step.
    fn move_and_rename(
        &self,
        ctx: &MoveAndRenameContext,
    ) -> impl Future<Output = DirectoryResult<()>> + Send;

    /// Entries under `ctx.base` within scope that match the filter.
    fn search(
        &self,
        ctx: &SearchContext,
    ) -> impl Future<Output = DirectoryResult<Vec<Entry>>> + Send;

    /// A single entry, `None` if absent.
    fn lookup(
        &self,
        ctx: &LookupContext,
    ) -> impl Future<Output = DirectoryResult<Option<Entry>>> + Send;

    fn has_entry(&self, dn: &Dn) -> impl Future<Output = DirectoryResult<bool>> + Send;

    /// Whether `dn` is one of the naming contexts this backend serves.
    fn is_suffix(&self, dn: &Dn) -> bool;

    /// Execute an operation, dispatching on its kind.
    fn execute(
        &self,
        operation: &Operation,
    ) -> impl Future<Output = DirectoryResult<OperationResult>> + Send {
        async move {
            match operation {
                Operation::Add(ctx) => self.add(ctx).await.map(|_| OperationResult::Done),
                Operation::Delete(ctx) => self.delete(&ctx.dn).await.map(|_| OperationResult::Done),
                Operation::Modify(ctx) => self.modify(ctx).await.map(|_| OperationResult::Done),
                Operation::Rename(ctx) => self.rename(ctx).await.map(|_| OperationResult::Done),
                Operation::Move(ctx) => self.move_entry(ctx).await.map(|_| OperationResult::Done),
                Operation::MoveAndRename(ctx) => {
                    self.move_and_rename(ctx).await.map(|_| OperationResult::Done)
                }
                Operation::Search(ctx) => self
                    .search(ctx)
                    .await
                    .map(|entries| OperationResult::Entries(Cursor::new(entries))),
                Operation::Lookup(ctx) => self.lookup(ctx).await.map(OperationResult::Entry),
                Operation::HasEntry(ctx) => self.has_entry(&ctx.dn).await.map(OperationResult::Exists),
            }
        }
    }
}
