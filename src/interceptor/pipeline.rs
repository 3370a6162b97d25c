//! Ordered stage lists with fail-fast or collect-all semantics.

use super::Stage;
use super::invocation::Invocation;
use crate::error::{DirectoryError, DirectoryResult, InterceptorFailure};
use log::{trace, warn};
use std::fmt;
use std::sync::Arc;

/// How a pipeline reacts to a failing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop at the first error and raise it
    FailFast,
    /// Run every stage, record every error on the invocation, raise the last
    CollectAll,
}

/// Stages run in registration order around a target operation.
#[derive(Clone)]
pub struct Pipeline {
    name: String,
    policy: FailurePolicy,
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new(name: impl Into<String>, policy: FailurePolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            stages: Vec::new(),
        }
    }

    pub fn fail_fast(name: impl Into<String>) -> Self {
        Self::new(name, FailurePolicy::FailFast)
    }

    pub fn collect_all(name: impl Into<String>) -> Self {
        Self::new(name, FailurePolicy::CollectAll)
    }

    /// Builder-style helper appending a stage.
    pub fn with_stage<S: Stage + 'static>(mut self, stage: S) -> Self {
        self.push(Arc::new(stage));
        self
    }

    pub fn push(&mut self, stage: Arc<dyn Stage>) {
        self.stages.push(stage);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run the stages against `invocation`.
    pub async fn invoke(&self, invocation: &mut Invocation) -> DirectoryResult<()> {
        let mut last_error = None;

        for stage in &self.stages {
            trace!(
                "Pipeline '{}' invoking stage '{}' (invocation: '{}')",
                self.name,
                stage.name(),
                invocation.id()
            );
            let Err(error) = stage.invoke(invocation).await else {
                continue;
            };

            let error = wrap(stage.name(), invocation, error);
            warn!(
                "Stage '{}' of pipeline '{}' failed: {} (invocation: '{}')",
                stage.name(),
                self.name,
                error,
                invocation.id()
            );
            match self.policy {
                FailurePolicy::FailFast => return Err(error),
                FailurePolicy::CollectAll => {
                    invocation.record_failure(error.clone());
                    last_error = Some(error);
                }
            }
        }

        match last_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("stages", &self.stage_names())
            .finish()
    }
}

/// Domain errors and already wrapped failures pass through unchanged.
fn wrap(stage: &str, invocation: &Invocation, error: DirectoryError) -> DirectoryError {
    if error.is_domain() || matches!(error, DirectoryError::Interceptor(_)) {
        return error;
    }
    DirectoryError::Interceptor(InterceptorFailure {
        stage: stage.to_string(),
        operation: invocation.kind().to_string(),
        invocation_id: invocation.id().to_string(),
        source: Arc::new(error),
    })
}
