//! Write authorization for anonymous sessions.

use crate::error::{DirectoryError, DirectoryResult};
use crate::interceptor::{Invocation, Stage};
use async_trait::async_trait;
use log::debug;

/// Rejects writes from anonymous sessions.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationStage {
    allow_anonymous_writes: bool,
}

impl AuthenticationStage {
    pub fn new(allow_anonymous_writes: bool) -> Self {
        Self {
            allow_anonymous_writes,
        }
    }
}

#[async_trait]
impl Stage for AuthenticationStage {
    fn name(&self) -> &str {
        "authentication"
    }

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        let kind = invocation.kind();
        if !kind.is_write() || !invocation.request().is_anonymous() || self.allow_anonymous_writes {
            return Ok(());
        }
        debug!(
            "Rejecting anonymous {} (request: '{}')",
            kind,
            invocation.request().request_id
        );
        Err(DirectoryError::InsufficientAccessRights {
            operation: kind.to_string(),
            reason: "anonymous sessions may not modify the directory".to_string(),
        })
    }
}
