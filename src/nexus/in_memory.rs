//! In-memory partition implementing the [`Nexus`] trait.
//!
//! Entries live in a `HashMap` keyed by normalized DN behind a tokio `RwLock`.
//! It is meant for tests, embedding, and anywhere persistence is not required.
//!
//! # Performance Characteristics
//!
//! * add/delete/lookup/hasEntry: O(1) average case (delete scans for children)
//! * rename/move: O(n), descendants are re-keyed
//! * search: O(n) over all entries with per-entry filter evaluation

use super::Nexus;
use crate::entry::dn::normalize_value;
use crate::entry::{Dn, Entry, Value};
use crate::error::{DirectoryError, DirectoryResult};
use crate::filter::{Assertion, Filter};
use crate::operation::{
    AddContext, LookupContext, ModifyContext, MoveAndRenameContext, MoveContext, RenameContext,
    SearchContext, SearchScope,
};
use log::{debug, trace};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Thread-safe in-memory directory partition.
///
/// Serves one or more naming contexts. An entry can be added when it is a
/// naming context itself or its parent already exists.
#[derive(Clone)]
pub struct InMemoryPartition {
    suffixes: Arc<Vec<Dn>>,
    // normalized DN -> entry
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryPartition {
    /// Create a partition serving the given naming contexts.
    pub fn new(suffixes: Vec<Dn>) -> Self {
        Self {
            suffixes: Arc::new(suffixes),
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_suffix(suffix: Dn) -> Self {
        Self::new(vec![suffix])
    }

    pub fn suffixes(&self) -> &[Dn] {
        &self.suffixes
    }

    /// Get partition statistics for debugging and monitoring.
    pub async fn stats(&self) -> PartitionStats {
        let entries = self.entries.read().await;
        PartitionStats {
            suffix_count: self.suffixes.len(),
            entry_count: entries.len(),
            max_depth: entries.values().map(|e| e.dn().len()).max().unwrap_or(0),
        }
    }

    /// Remove every entry (useful for testing).
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    fn within_suffix(&self, dn: &Dn) -> bool {
        self.suffixes.iter().any(|suffix| dn.is_descendant_of(suffix))
    }

    fn check_parent(&self, entries: &HashMap<String, Entry>, dn: &Dn) -> DirectoryResult<()> {
        if !self.within_suffix(dn) {
            return Err(DirectoryError::no_such_entry(dn));
        }
        if self.is_suffix(dn) {
            return Ok(());
        }
        match dn.parent() {
            Some(parent) if entries.contains_key(&parent.normalized()) => Ok(()),
            Some(parent) => Err(DirectoryError::no_such_entry(parent)),
            None => Err(DirectoryError::no_such_entry(dn)),
        }
    }

    async fn relocate(
        &self,
        dn: &Dn,
        new_dn: Dn,
        entry: Option<&Entry>,
        base: Option<&Entry>,
        delete_old_rdn: bool,
    ) -> DirectoryResult<()> {
        let mut entries = self.entries.write().await;
        let old_key = dn.normalized();
        let new_key = new_dn.normalized();

        let current = entries
            .get(&old_key)
            .ok_or_else(|| DirectoryError::no_such_entry(dn))?;
        check_unchanged(dn, current, base)?;
        if new_key != old_key && entries.contains_key(&new_key) {
            return Err(DirectoryError::already_exists(&new_dn));
        }
        if new_dn.is_descendant_of(dn) && new_key != old_key {
            return Err(DirectoryError::InvalidDn {
                dn: new_dn.to_string(),
                reason: "an entry cannot be moved beneath itself".to_string(),
            });
        }
        self.check_parent(&entries, &new_dn)?;

        let mut moved = match entry {
            Some(entry) => entry.clone(),
            None => current.renamed(new_dn.clone(), delete_old_rdn),
        };
        moved.set_dn(new_dn.clone());

        let descendants: Vec<String> = entries
            .iter()
            .filter(|(key, e)| **key != old_key && e.dn().is_descendant_of(dn))
            .map(|(key, _)| key.clone())
            .collect();
        for key in descendants {
            if let Some(mut child) = entries.remove(&key) {
                if let Some(rebased) = child.dn().rebase(dn, &new_dn) {
                    child.set_dn(rebased);
                }
                trace!("Re-keyed {} under {}", child.dn(), new_dn);
                entries.insert(child.dn().normalized(), child);
            }
        }

        entries.remove(&old_key);
        entries.insert(new_key, moved);
        debug!("Relocated {} to {}", dn, new_dn);
        Ok(())
    }
}

impl Default for InMemoryPartition {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Nexus for InMemoryPartition {
    async fn add(&self, ctx: &AddContext) -> DirectoryResult<()> {
        let mut entries = self.entries.write().await;
        let key = ctx.dn.normalized();
        if entries.contains_key(&key) {
            return Err(DirectoryError::already_exists(&ctx.dn));
        }
        self.check_parent(&entries, &ctx.dn)?;

        let mut entry = ctx.entry.clone();
        entry.set_dn(ctx.dn.clone());
        entries.insert(key, entry);
        debug!("Stored {}", ctx.dn);
        Ok(())
    }

    async fn delete(&self, dn: &Dn) -> DirectoryResult<()> {
        let mut entries = self.entries.write().await;
        let key = dn.normalized();
        if !entries.contains_key(&key) {
            return Err(DirectoryError::no_such_entry(dn));
        }
        let has_children = entries
            .values()
            .any(|entry| entry.dn().parent().as_ref() == Some(dn));
        if has_children {
            return Err(DirectoryError::NotAllowedOnNonLeaf { dn: dn.to_string() });
        }
        entries.remove(&key);
        debug!("Deleted {}", dn);
        Ok(())
    }

    async fn modify(&self, ctx: &ModifyContext) -> DirectoryResult<()> {
        let Some(updated) = &ctx.entry else {
            return Err(DirectoryError::internal(format!(
                "modify of {} reached the backend without a resolved entry",
                ctx.dn
            )));
        };
        let mut entries = self.entries.write().await;
        let stored = entries
            .get_mut(&ctx.dn.normalized())
            .ok_or_else(|| DirectoryError::no_such_entry(&ctx.dn))?;
        check_unchanged(&ctx.dn, stored, ctx.base.as_ref())?;
        *stored = updated.clone();
        stored.set_dn(ctx.dn.clone());
        Ok(())
    }

    async fn rename(&self, ctx: &RenameContext) -> DirectoryResult<()> {
        self.relocate(
            &ctx.dn,
            ctx.new_dn(),
            ctx.entry.as_ref(),
            ctx.base.as_ref(),
            ctx.delete_old_rdn,
        )
        .await
    }

    async fn move_entry(&self, ctx: &MoveContext) -> DirectoryResult<()> {
        self.relocate(&ctx.dn, ctx.new_dn(), ctx.entry.as_ref(), ctx.base.as_ref(), false)
            .await
    }

    async fn move_and_rename(&self, ctx: &MoveAndRenameContext) -> DirectoryResult<()> {
        self.relocate(
            &ctx.dn,
            ctx.new_dn(),
            ctx.entry.as_ref(),
            ctx.base.as_ref(),
            ctx.delete_old_rdn,
        )
        .await
    }

    async fn search(&self, ctx: &SearchContext) -> DirectoryResult<Vec<Entry>> {
        let entries = self.entries.read().await;
        if !entries.contains_key(&ctx.base.normalized()) {
            return Err(DirectoryError::no_such_entry(&ctx.base));
        }

        let mut results: Vec<Entry> = entries
            .values()
            .filter(|entry| in_scope(entry.dn(), &ctx.base, ctx.scope))
            .filter(|entry| matches(&ctx.filter, entry))
            .map(|entry| project(entry, &ctx.attributes))
            .collect();

        // Parents before children, then by name, for consistent ordering
        results.sort_by(|a, b| match a.dn().len().cmp(&b.dn().len()) {
            Ordering::Equal => a.dn().normalized().cmp(&b.dn().normalized()),
            other => other,
        });
        if let Some(limit) = ctx.size_limit {
            results.truncate(limit);
        }
        trace!("Search under {} for {} matched {}", ctx.base, ctx.filter, results.len());
        Ok(results)
    }

    async fn lookup(&self, ctx: &LookupContext) -> DirectoryResult<Option<Entry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&ctx.dn.normalized())
            .map(|entry| project(entry, &ctx.attributes)))
    }

    async fn has_entry(&self, dn: &Dn) -> DirectoryResult<bool> {
        let entries = self.entries.read().await;
        Ok(entries.contains_key(&dn.normalized()))
    }

    fn is_suffix(&self, dn: &Dn) -> bool {
        self.suffixes.iter().any(|suffix| suffix == dn)
    }
}

/// Statistics about the current state of a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionStats {
    pub suffix_count: usize,
    pub entry_count: usize,
    /// Number of RDNs in the deepest DN
    pub max_depth: usize,
}

/// An update computed from `base` may only replace that exact entry.
fn check_unchanged(dn: &Dn, stored: &Entry, base: Option<&Entry>) -> DirectoryResult<()> {
    match base {
        Some(base) if base != stored => {
            debug!("Stale write to {} rejected", dn);
            Err(DirectoryError::conflict(dn))
        }
        _ => Ok(()),
    }
}

fn in_scope(dn: &Dn, base: &Dn, scope: SearchScope) -> bool {
    match scope {
        SearchScope::Base => dn == base,
        SearchScope::OneLevel => dn.parent().as_ref() == Some(base),
        SearchScope::Subtree => dn.is_descendant_of(base),
    }
}

fn project(entry: &Entry, attributes: &[String]) -> Entry {
    if attributes.is_empty() || attributes.iter().any(|a| a == "*") {
        return entry.clone();
    }
    let mut projected = Entry::new(entry.dn().clone());
    for attribute in entry.attributes() {
        if attributes.iter().any(|wanted| attribute.is(wanted)) {
            projected.put(attribute.clone());
        }
    }
    projected
}

fn values<'e>(entry: &'e Entry, attribute: &str) -> &'e [Value] {
    entry.get(attribute).map(|a| a.values()).unwrap_or_default()
}

fn text_key(value: &Value) -> Option<String> {
    value.as_text().map(normalize_value)
}

fn equal(left: &Value, right: &Value) -> bool {
    match (text_key(left), text_key(right)) {
        (Some(left), Some(right)) => left == right,
        _ => left.as_bytes() == right.as_bytes(),
    }
}

fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    let (left, right) = (text_key(left)?, text_key(right)?);
    match (left.parse::<i64>(), right.parse::<i64>()) {
        (Ok(left), Ok(right)) => Some(left.cmp(&right)),
        _ => Some(left.cmp(&right)),
    }
}

fn any_value(entry: &Entry, assertion: &Assertion, test: impl Fn(&Value) -> bool) -> bool {
    values(entry, &assertion.attribute).iter().any(test)
}

fn matches_substring(value: &Value, initial: Option<&Value>, any: &[Value], final_: Option<&Value>) -> bool {
    let Some(text) = text_key(value) else {
        return false;
    };
    let mut rest = text.as_str();
    if let Some(initial) = initial.and_then(text_key) {
        match rest.strip_prefix(initial.as_str()) {
            Some(stripped) => rest = stripped,
            None => return false,
        }
    }
    for part in any.iter().filter_map(text_key) {
        match rest.find(part.as_str()) {
            Some(index) => rest = &rest[index + part.len()..],
            None => return false,
        }
    }
    match final_.and_then(text_key) {
        Some(final_) => rest.ends_with(final_.as_str()),
        None => true,
    }
}

/// Evaluate a filter against an entry using case-insensitive text comparison.
fn matches(filter: &Filter, entry: &Entry) -> bool {
    match filter {
        Filter::Equality(a) | Filter::Approximate(a) => any_value(entry, a, |v| equal(v, &a.value)),
        Filter::GreaterOrEqual(a) => any_value(entry, a, |v| {
            compare(v, &a.value).is_some_and(|o| o != Ordering::Less)
        }),
        Filter::LessOrEqual(a) => any_value(entry, a, |v| {
            compare(v, &a.value).is_some_and(|o| o != Ordering::Greater)
        }),
        Filter::Extensible {
            attribute, value, ..
        } => match attribute {
            Some(attribute) => values(entry, attribute).iter().any(|v| equal(v, value)),
            None => entry
                .attributes()
                .iter()
                .flat_map(|a| a.values())
                .any(|v| equal(v, value)),
        },
        Filter::Substring {
            attribute,
            initial,
            any,
            final_,
        } => values(entry, attribute)
            .iter()
            .any(|v| matches_substring(v, initial.as_ref(), any, final_.as_ref())),
        Filter::Presence { attribute } => {
            attribute.eq_ignore_ascii_case(crate::entry::OBJECT_CLASS)
                || entry.get(attribute).is_some_and(|a| !a.is_empty())
        }
        Filter::And(children) => children.iter().all(|child| matches(child, entry)),
        Filter::Or(children) => children.iter().any(|child| matches(child, entry)),
        Filter::Not(child) => !matches(child, entry),
    }
}
