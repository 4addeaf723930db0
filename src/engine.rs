//! Flow transition logic
//!
//! The engine starts and advances sessions against a locked [`SessionTable`].
//! It never performs I/O: completions that need outside work (lookups, media
//! embeds) are returned as data for the caller to act on after the lock is
//! released.

#[cfg(test)]
mod proptests;

use crate::flow::{is_cancel, Completion, FlowCatalog, FlowKind, Verdict};
use crate::session::{Session, SessionId, SessionTable, StepState};
use thiserror::Error;

/// Result of feeding one message to a flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Session is live and waiting on the step this prompt asks for
    Prompt(String),
    /// Input failed validation; the same step is asked again
    Rejected(String),
    /// All steps passed; the session is gone
    Completed(Completion),
    /// The flow ended early; the session is gone
    Cancelled(String),
}

/// Errors that can occur during a transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("No active {0} flow for this conversation")]
    NotActive(FlowKind),
}

/// Drives sessions through the flows of a catalog
#[derive(Debug, Clone, Default)]
pub struct FlowEngine {
    catalog: FlowCatalog,
}

impl FlowEngine {
    pub fn new(catalog: FlowCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    /// Open a session if the message is one of the flow's triggers.
    ///
    /// Returns `None` when the flow does not claim the message. An existing
    /// session for the same key is replaced by a fresh one.
    pub fn try_start(
        &self,
        table: &mut SessionTable,
        kind: FlowKind,
        message: &str,
        id: &SessionId,
    ) -> Option<Transition> {
        let definition = self.catalog.get(kind);
        if !definition.admits(message) {
            return None;
        }

        let mut session = Session::new(kind, id.clone());
        session.step = session.step.next(definition.step_count());
        table.put(session);
        tracing::info!(flow = %kind, session_id = %id, "Flow started");
        Some(Transition::Prompt(definition.opening().to_string()))
    }

    /// Feed one message to the live session for `(kind, id)`
    pub fn advance(
        &self,
        table: &mut SessionTable,
        kind: FlowKind,
        message: &str,
        id: &SessionId,
    ) -> Result<Transition, TransitionError> {
        let definition = self.catalog.get(kind);
        let mut session = table
            .remove(kind, id)
            .ok_or(TransitionError::NotActive(kind))?;
        // Index past the end can only come from a foreign session; it stays dropped
        let step = session
            .step_index()
            .and_then(|index| definition.step(index))
            .ok_or(TransitionError::NotActive(kind))?;

        let transition = if is_cancel(message) {
            session.step = StepState::Cancelled;
            tracing::info!(flow = %kind, session_id = %id, "Flow cancelled");
            Transition::Cancelled(definition.cancel_message().to_string())
        } else {
            match step.validator.check(message) {
                Verdict::Reject(reason) => {
                    tracing::debug!(flow = %kind, step = step.key, %reason, "Step input rejected");
                    Transition::Rejected(format!("{reason} {}", step.prompt))
                }
                Verdict::Abort(reason) => {
                    session.step = StepState::Cancelled;
                    tracing::info!(flow = %kind, session_id = %id, step = step.key, "Flow aborted");
                    Transition::Cancelled(reason)
                }
                Verdict::Accept(value) => {
                    session.data.insert(step.key, value);
                    session.step = session.step.next(definition.step_count());
                    match session.step_index().and_then(|index| definition.step(index)) {
                        Some(next_step) => Transition::Prompt(next_step.prompt.to_string()),
                        None => {
                            tracing::info!(flow = %kind, session_id = %id, "Flow completed");
                            Transition::Completed(definition.finalize(&session.data))
                        }
                    }
                }
            }
        };

        // Cancelled and completed sessions are not kept
        table.put(session);
        Ok(transition)
    }
}
