//! Interceptor pipeline around the backend nexus.
//!
//! Every operation is wrapped in an [`Invocation`] and run through an
//! [`InterceptorChain`]: a fail-fast "before" [`Pipeline`], the target call on
//! the nexus, a fail-fast "after" pipeline, and, when anything fails, a
//! collect-all failure pipeline. Each [`Stage`] handles one cross-cutting
//! concern; the stock ones live in [`stages`].
//!
//! # Examples
//!
//! ```rust
//! use async_trait::async_trait;
//! use directory_core::error::DirectoryResult;
//! use directory_core::interceptor::{Invocation, Pipeline, Stage};
//!
//! struct Deny;
//!
//! #[async_trait]
//! impl Stage for Deny {
//!     fn name(&self) -> &str {
//!         "deny"
//!     }
//!
//!     async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
//!         Err(directory_core::DirectoryError::InsufficientAccessRights {
//!             operation: invocation.kind().to_string(),
//!             reason: "read-only replica".to_string(),
//!         })
//!     }
//! }
//!
//! let before = Pipeline::fail_fast("before").with_stage(Deny);
//! assert_eq!(before.stage_names(), vec!["deny"]);
//! ```

pub mod chain;
pub mod invocation;
pub mod pipeline;
pub mod stages;


pub use chain::InterceptorChain;
pub use invocation::{Invocation, InvocationState, Outcome};
pub use pipeline::{FailurePolicy, Pipeline};

use crate::error::DirectoryResult;
use async_trait::async_trait;

/// One unit of cross-cutting logic invoked around directory operations.
///
/// Stages run in registration order and may rewrite the invocation's operation
/// context. A stage must not assume that any other stage ran or succeeded.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Name used in logs and in wrapped failures.
    fn name(&self) -> &str;

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()>;
}
