//! Runs an invocation through the before, target, after and failure phases.

use super::invocation::{Invocation, InvocationState};
use super::pipeline::Pipeline;
use crate::error::DirectoryResult;
use crate::nexus::Nexus;
use crate::operation::OperationResult;
use log::{debug, info, warn};

/// The three pipelines wrapped around every backend call.
///
/// `before` and `after` are fail-fast; `failure` is collect-all and runs only
/// once the invocation is in failure handling.
#[derive(Debug, Clone)]
pub struct InterceptorChain {
    before: Pipeline,
    after: Pipeline,
    failure: Pipeline,
}

impl InterceptorChain {
    pub fn new(before: Pipeline, after: Pipeline, failure: Pipeline) -> Self {
        Self {
            before,
            after,
            failure,
        }
    }

    pub fn before(&self) -> &Pipeline {
        &self.before
    }

    pub fn after(&self) -> &Pipeline {
        &self.after
    }

    pub fn failure(&self) -> &Pipeline {
        &self.failure
    }

    /// Run `invocation` to completion against `nexus`.
    ///
    /// The target is only invoked when every before stage succeeds. On any
    /// failure the failure pipeline runs in full and then the original error is
    /// raised; errors of the failure pipeline itself stay on the invocation.
    pub async fn dispatch<N: Nexus>(
        &self,
        nexus: &N,
        mut invocation: Invocation,
    ) -> DirectoryResult<OperationResult> {
        info!(
            "Dispatching {} of {} (invocation: '{}', request: '{}')",
            invocation.kind(),
            invocation.operation().dn(),
            invocation.id(),
            invocation.request().request_id
        );

        match self.before.invoke(&mut invocation).await {
            Err(error) => invocation.before_failed(error),
            Ok(()) => {
                invocation.before_succeeded();
                match nexus.execute(invocation.operation()).await {
                    Err(error) => invocation.target_failed(error),
                    Ok(result) => {
                        invocation.target_succeeded(result);
                        match self.after.invoke(&mut invocation).await {
                            Ok(()) => invocation.after_succeeded(),
                            Err(error) => invocation.after_failed(error),
                        }
                    }
                }
            }
        }

        if invocation.state() == InvocationState::FailureHandling {
            debug!(
                "Invocation '{}' entered failure handling: {:?}",
                invocation.id(),
                invocation.failure()
            );
            if let Err(error) = self.failure.invoke(&mut invocation).await {
                warn!(
                    "Failure pipeline reported {} error(s) for invocation '{}', last: {}",
                    invocation.failures().len(),
                    invocation.id(),
                    error
                );
            }
        }

        invocation.into_result()
    }
}
