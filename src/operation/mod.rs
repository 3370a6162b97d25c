//! Directory operations as typed values.
//!
//! Every call into the directory core becomes an [`Operation`] carrying its
//! context. Stages inspect the operation with a `match` and the nexus executes
//! it; there is no dynamic method dispatch.

pub mod context;

pub use context::{
    AddContext, DeleteContext, HasEntryContext, LookupContext, ModifyContext,
    MoveAndRenameContext, MoveContext, RenameContext, RequestContext, SearchContext, SearchScope,
};

use crate::entry::{Dn, Entry};
use std::fmt;

/// A directory operation and its context.
#[derive(Debug, Clone)]
pub enum Operation {
    Add(AddContext),
    Delete(DeleteContext),
    Modify(ModifyContext),
    Rename(RenameContext),
    Move(MoveContext),
    MoveAndRename(MoveAndRenameContext),
    Search(SearchContext),
    Lookup(LookupContext),
    HasEntry(HasEntryContext),
}

/// Operation kinds, for logging and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Add,
    Delete,
    Modify,
    Rename,
    Move,
    MoveAndRename,
    Search,
    Lookup,
    HasEntry,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Delete => "delete",
            Self::Modify => "modify",
            Self::Rename => "rename",
            Self::Move => "move",
            Self::MoveAndRename => "moveAndRename",
            Self::Search => "search",
            Self::Lookup => "lookup",
            Self::HasEntry => "hasEntry",
        }
    }

    /// Whether the operation changes directory content.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Self::Add | Self::Delete | Self::Modify | Self::Rename | Self::Move | Self::MoveAndRename
        )
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add(_) => OperationKind::Add,
            Self::Delete(_) => OperationKind::Delete,
            Self::Modify(_) => OperationKind::Modify,
            Self::Rename(_) => OperationKind::Rename,
            Self::Move(_) => OperationKind::Move,
            Self::MoveAndRename(_) => OperationKind::MoveAndRename,
            Self::Search(_) => OperationKind::Search,
            Self::Lookup(_) => OperationKind::Lookup,
            Self::HasEntry(_) => OperationKind::HasEntry,
        }
    }

    /// The DN the operation targets; the search base for searches.
    pub fn dn(&self) -> &Dn {
        match self {
            Self::Add(ctx) => &ctx.dn,
            Self::Delete(ctx) => &ctx.dn,
            Self::Modify(ctx) => &ctx.dn,
            Self::Rename(ctx) => &ctx.dn,
            Self::Move(ctx) => &ctx.dn,
            Self::MoveAndRename(ctx) => &ctx.dn,
            Self::Search(ctx) => &ctx.base,
            Self::Lookup(ctx) => &ctx.dn,
            Self::HasEntry(ctx) => &ctx.dn,
        }
    }

    /// The DN the entry ends up at, for operations that change it.
    pub fn new_dn(&self) -> Option<Dn> {
        match self {
            Self::Rename(ctx) => Some(ctx.new_dn()),
            Self::Move(ctx) => Some(ctx.new_dn()),
            Self::MoveAndRename(ctx) => Some(ctx.new_dn()),
            _ => None,
        }
    }

    /// Record the stored entry an update starts from, as both the working
    /// entry and the base the backend compares against when writing.
    pub fn load_current(&mut self, current: Entry) {
        let base = match self {
            Self::Modify(ctx) => &mut ctx.base,
            Self::Rename(ctx) => &mut ctx.base,
            Self::Move(ctx) => &mut ctx.base,
            Self::MoveAndRename(ctx) => &mut ctx.base,
            _ => return,
        };
        *base = Some(current.clone());
        if let Some(slot) = self.entry_slot() {
            *slot = Some(current);
        }
    }

    /// The current-entry slot of operations that modify an existing entry.
    pub fn entry_slot(&mut self) -> Option<&mut Option<Entry>> {
        match self {
            Self::Modify(ctx) => Some(&mut ctx.entry),
            Self::Rename(ctx) => Some(&mut ctx.entry),
            Self::Move(ctx) => Some(&mut ctx.entry),
            Self::MoveAndRename(ctx) => Some(&mut ctx.entry),
            _ => None,
        }
    }
}

/// The value an operation hands back to the caller.
#[derive(Debug)]
pub enum OperationResult {
    /// Write operations complete without a value
    Done,
    /// Lookup result
    Entry(Option<Entry>),
    /// Search results
    Entries(Cursor),
    /// hasEntry result
    Exists(bool),
}

/// Search results in backend order.
#[derive(Debug, Default)]
pub struct Cursor {
    entries: std::vec::IntoIter<Entry>,
}

impl Cursor {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self {
            entries: entries.into_iter(),
        }
    }

    /// Entries not yet consumed.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl Iterator for Cursor {
    type Item = Entry;

    fn next(&mut self) -> Option<Entry> {
        self.entries.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for Cursor {}
