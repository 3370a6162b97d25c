//! Per-call invocation state.
//!
//! An [`Invocation`] is created when an operation enters the core and dropped
//! when the call returns. The pipelines and the target dispatch move it through
//! its states:
//!
//! ```text
//! PreInvocation --before ok, target ok--> PostInvocation --after ok--> (return value)
//!       |                                       |
//!       +--before or target failed--+           +--after failed--+
//!                                   v                            v
//!                              FailureHandling <-----------------+
//! ```
//!
//! Each phase records its own [`Outcome`], so a failed invocation always has
//! exactly one phase holding the error that is re-raised.

use crate::error::{DirectoryError, DirectoryResult};
use crate::operation::{Operation, OperationKind, OperationResult, RequestContext};
use uuid::Uuid;

/// Lifecycle state of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    /// Before stages and the target call have not both succeeded yet
    PreInvocation,
    /// The target call succeeded; after stages run in this state
    PostInvocation,
    /// Something failed; the failure pipeline runs in this state
    FailureHandling,
}

/// Result of one phase of an invocation.
#[derive(Debug, Default)]
pub enum Outcome<T> {
    #[default]
    Pending,
    Succeeded(T),
    Failed(DirectoryError),
}

impl<T> Outcome<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    pub fn failure(&self) -> Option<&DirectoryError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// One logical operation call moving through the pipelines.
#[derive(Debug)]
pub struct Invocation {
    id: Uuid,
    request: RequestContext,
    operation: Operation,
    state: InvocationState,
    complete: bool,
    before: Outcome<()>,
    target: Outcome<OperationResult>,
    after: Outcome<()>,
    failures: Vec<DirectoryError>,
}

impl Invocation {
    pub fn new(request: RequestContext, operation: Operation) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            operation,
            state: InvocationState::PreInvocation,
            complete: false,
            before: Outcome::Pending,
            target: Outcome::Pending,
            after: Outcome::Pending,
            failures: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Stages may rewrite the operation context, e.g. to store a normalized entry.
    pub fn operation_mut(&mut self) -> &mut Operation {
        &mut self.operation
    }

    pub fn kind(&self) -> OperationKind {
        self.operation.kind()
    }

    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Whether the target call completed successfully.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn before(&self) -> &Outcome<()> {
        &self.before
    }

    pub fn target(&self) -> &Outcome<OperationResult> {
        &self.target
    }

    pub fn after(&self) -> &Outcome<()> {
        &self.after
    }

    /// Errors raised by stages of collect-all pipelines, in order.
    pub fn failures(&self) -> &[DirectoryError] {
        &self.failures
    }

    /// The error that put the invocation into failure handling.
    pub fn failure(&self) -> Option<&DirectoryError> {
        self.before
            .failure()
            .or_else(|| self.target.failure())
            .or_else(|| self.after.failure())
    }

    pub(crate) fn record_failure(&mut self, error: DirectoryError) {
        self.failures.push(error);
    }

    pub(crate) fn before_succeeded(&mut self) {
        self.before = Outcome::Succeeded(());
    }

    pub(crate) fn before_failed(&mut self, error: DirectoryError) {
        self.before = Outcome::Failed(error);
        self.state = InvocationState::FailureHandling;
    }

    pub(crate) fn target_succeeded(&mut self, result: OperationResult) {
        self.target = Outcome::Succeeded(result);
        self.state = InvocationState::PostInvocation;
        self.complete = true;
    }

    pub(crate) fn target_failed(&mut self, error: DirectoryError) {
        self.target = Outcome::Failed(error);
        self.state = InvocationState::FailureHandling;
    }

    pub(crate) fn after_succeeded(&mut self) {
        self.after = Outcome::Succeeded(());
    }

    pub(crate) fn after_failed(&mut self, error: DirectoryError) {
        self.after = Outcome::Failed(error);
        self.state = InvocationState::FailureHandling;
    }

    /// Hand back the target's return value or the recorded failure.
    ///
    /// Failing without any phase holding an error is an internal consistency
    /// error, never a silent success.
    pub fn into_result(self) -> DirectoryResult<OperationResult> {
        match self.state {
            InvocationState::FailureHandling => Err(match (self.before, self.target, self.after) {
                (Outcome::Failed(error), _, _)
                | (_, Outcome::Failed(error), _)
                | (_, _, Outcome::Failed(error)) => error,
                _ => DirectoryError::internal(format!(
                    "invocation {} failed without a recorded failure",
                    self.id
                )),
            }),
            InvocationState::PostInvocation => match (self.target, self.after) {
                (Outcome::Succeeded(result), Outcome::Succeeded(())) => Ok(result),
                _ => Err(DirectoryError::internal(format!(
                    "invocation {} finished without running its after stages",
                    self.id
                ))),
            },
            InvocationState::PreInvocation => Err(DirectoryError::internal(format!(
                "invocation {} never reached its target",
                self.id
            ))),
        }
    }
}
