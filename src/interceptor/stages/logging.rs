//! Audit and failure logging stages.

use crate::error::DirectoryResult;
use crate::interceptor::{Invocation, Stage};
use async_trait::async_trait;
use log::{info, warn};

/// Logs every completed operation with its requesting principal.
#[derive(Debug, Clone, Default)]
pub struct AuditStage;

#[async_trait]
impl Stage for AuditStage {
    fn name(&self) -> &str {
        "audit"
    }

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        let request = invocation.request();
        info!(
            "{} {} by '{}' completed (invocation: '{}', request: '{}')",
            invocation.kind(),
            invocation.operation().dn(),
            request.principal_name(),
            invocation.id(),
            request.request_id
        );
        Ok(())
    }
}

/// Logs the error that sent an invocation into failure handling.
#[derive(Debug, Clone, Default)]
pub struct FailureLogStage;

#[async_trait]
impl Stage for FailureLogStage {
    fn name(&self) -> &str {
        "failureLog"
    }

    async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        if let Some(error) = invocation.failure() {
            warn!(
                "{} {} failed{}: {} (invocation: '{}', request: '{}')",
                invocation.kind(),
                invocation.operation().dn(),
                if invocation.is_complete() { " after the backend call" } else { "" },
                error,
                invocation.id(),
                invocation.request().request_id
            );
        }
        Ok(())
    }
}
