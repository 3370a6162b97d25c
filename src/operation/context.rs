//! Request and operation contexts.
//!
//! Each directory operation carries a typed context value: the target DN plus
//! whatever the operation needs (entry, modifications, new RDN, filter). Write
//! contexts also hold an `entry` slot that pipeline stages fill in: the current
//! entry is loaded before the schema stage runs, and the schema stage replaces
//! it with the validated post-state the backend should store.

use crate::entry::{Dn, Entry, Modification, Rdn};
use crate::filter::Filter;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request context for directory operations.
///
/// Provides request tracking for logging and auditing, and the identity of the
/// session issuing the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique identifier for this request
    pub request_id: String,
    /// Bound identity, `None` for anonymous sessions
    pub principal: Option<Dn>,
}

impl RequestContext {
    /// Create an anonymous request context with a specific request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            principal: None,
        }
    }

    /// Create an anonymous request context with a generated request ID.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }

    /// Create a request context bound as `principal`.
    pub fn authenticated(principal: Dn) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            principal: Some(principal),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.principal.is_none()
    }

    /// The principal's DN as a string, empty for anonymous sessions.
    pub fn principal_name(&self) -> String {
        self.principal
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::with_generated_id()
    }
}

#[derive(Debug, Clone)]
pub struct AddContext {
    pub dn: Dn,
    pub entry: Entry,
}

impl AddContext {
    /// The entry's own DN is the target.
    pub fn new(entry: Entry) -> Self {
        Self {
            dn: entry.dn().clone(),
            entry,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeleteContext {
    pub dn: Dn,
}

#[derive(Debug, Clone)]
pub struct ModifyContext {
    pub dn: Dn,
    pub modifications: Vec<Modification>,
    /// Current entry, then the validated post-state
    pub entry: Option<Entry>,
    /// The stored entry the post-state was computed from
    pub base: Option<Entry>,
}

impl ModifyContext {
    pub fn new(dn: Dn, modifications: Vec<Modification>) -> Self {
        Self {
            dn,
            modifications,
            entry: None,
            base: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenameContext {
    pub dn: Dn,
    pub new_rdn: Rdn,
    pub delete_old_rdn: bool,
    pub entry: Option<Entry>,
    pub base: Option<Entry>,
}

impl RenameContext {
    pub fn new(dn: Dn, new_rdn: Rdn, delete_old_rdn: bool) -> Self {
        Self {
            dn,
            new_rdn,
            delete_old_rdn,
            entry: None,
            base: None,
        }
    }

    /// DN of the entry after the rename.
    pub fn new_dn(&self) -> Dn {
        self.dn.parent().unwrap_or_default().child(self.new_rdn.clone())
    }
}

#[derive(Debug, Clone)]
pub struct MoveContext {
    pub dn: Dn,
    pub new_superior: Dn,
    pub entry: Option<Entry>,
    pub base: Option<Entry>,
}

impl MoveContext {
    pub fn new(dn: Dn, new_superior: Dn) -> Self {
        Self {
            dn,
            new_superior,
            entry: None,
            base: None,
        }
    }

    /// DN of the entry after the move.
    pub fn new_dn(&self) -> Dn {
        match self.dn.rdn() {
            Some(rdn) => self.new_superior.child(rdn.clone()),
            None => self.new_superior.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MoveAndRenameContext {
    pub dn: Dn,
    pub new_superior: Dn,
    pub new_rdn: Rdn,
    pub delete_old_rdn: bool,
    pub entry: Option<Entry>,
    pub base: Option<Entry>,
}

impl MoveAndRenameContext {
    pub fn new(dn: Dn, new_superior: Dn, new_rdn: Rdn, delete_old_rdn: bool) -> Self {
        Self {
            dn,
            new_superior,
            new_rdn,
            delete_old_rdn,
            entry: None,
            base: None,
        }
    }

    pub fn new_dn(&self) -> Dn {
        self.new_superior.child(self.new_rdn.clone())
    }
}

/// How far below the base a search reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    /// The base entry only
    Base,
    /// Immediate children of the base
    OneLevel,
    /// The base and everything beneath it
    #[default]
    Subtree,
}

#[derive(Debug, Clone)]
pub struct SearchContext {
    pub base: Dn,
    pub scope: SearchScope,
    pub filter: Filter,
    /// Attributes to return, all user attributes when empty
    pub attributes: Vec<String>,
    pub size_limit: Option<usize>,
}

impl SearchContext {
    pub fn new(base: Dn, scope: SearchScope, filter: Filter) -> Self {
        Self {
            base,
            scope,
            filter,
            attributes: Vec::new(),
            size_limit: None,
        }
    }

    pub fn with_attributes<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes = attributes.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_size_limit(mut self, size_limit: usize) -> Self {
        self.size_limit = Some(size_limit);
        self
    }
}

#[derive(Debug, Clone)]
pub struct LookupContext {
    pub dn: Dn,
    /// Attributes to return, all when empty
    pub attributes: Vec<String>,
}

impl LookupContext {
    pub fn new(dn: Dn) -> Self {
        Self {
            dn,
            attributes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HasEntryContext {
    pub dn: Dn,
}
