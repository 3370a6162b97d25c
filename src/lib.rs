//! Schema-enforcing directory server core.
//!
//! Provides LDAP-style schema enforcement (object class closure, entry
//! validation, modification semantics) hosted inside an ordered interceptor
//! pipeline that wraps every backend operation.
//!
//! # Core Components
//!
//! - [`DirectoryCore`] - Entry point running operations through the pipelines
//! - [`Nexus`] - Trait for implementing storage backends
//! - [`SchemaRegistry`] - Attribute types, object classes and syntaxes
//! - [`InterceptorChain`] - Before, target, after and failure phases
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use directory_core::DirectoryCore;
//! use directory_core::entry::{Dn, Entry};
//! use directory_core::nexus::InMemoryPartition;
//! use directory_core::operation::RequestContext;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let suffix = Dn::parse("dc=example,dc=com")?;
//! let core = DirectoryCore::new(InMemoryPartition::with_suffix(suffix.clone()))?;
//! let admin = RequestContext::authenticated(Dn::parse("cn=admin,dc=example,dc=com")?);
//!
//! core.add(
//!     Entry::new(suffix)
//!         .with_attribute("objectClass", ["domain"])
//!         .with_attribute("dc", ["example"]),
//!     &admin,
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod entry;
pub mod error;
pub mod filter;
pub mod interceptor;
pub mod nexus;
pub mod operation;
pub mod schema;

// Re-export commonly used types for convenience
pub use directory::{DirectoryConfig, DirectoryCore, DirectoryCoreBuilder};
pub use entry::{Attribute, Dn, Entry, Modification, ModificationOperation, Rdn, Value};
pub use error::{
    BuildError, BuildResult, DirectoryError, DirectoryResult, InterceptorFailure, SchemaResult,
    SchemaViolation,
};
pub use filter::Filter;
pub use interceptor::{InterceptorChain, Invocation, InvocationState, Pipeline, Stage};
pub use nexus::{InMemoryPartition, Nexus};
pub use operation::{Cursor, Operation, OperationKind, OperationResult, RequestContext, SearchScope};
pub use schema::{ObjectClassClosure, SchemaRegistry, SchemaSnapshot, SharedSchema};
