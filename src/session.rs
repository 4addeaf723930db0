//! In-progress dialogue instances
//!
//! Sessions live only in memory and have no expiry: a conversation abandoned
//! mid-flow keeps its slot until the same id cancels or completes it.

mod store;

pub use store::{SessionStore, SessionTable};

use crate::flow::{FlowData, FlowKind};
use std::fmt;

/// Caller-supplied conversation identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for a caller that did not present one
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Position of a session within its flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepState {
    NotStarted,
    /// Waiting for input to the step at this index
    At { index: usize },
    Completed,
    Cancelled,
}

impl StepState {
    #[cfg(test)]
    pub fn is_terminal(self) -> bool {
        matches!(self, StepState::Completed | StepState::Cancelled)
    }

    /// Only sessions waiting on a step belong in the store
    pub fn is_live(self) -> bool {
        matches!(self, StepState::At { .. })
    }

    /// State once the pending input is accepted, in a flow of `len` steps
    pub fn next(self, len: usize) -> StepState {
        let index = match self {
            StepState::NotStarted => 0,
            StepState::At { index } => index + 1,
            terminal @ (StepState::Completed | StepState::Cancelled) => return terminal,
        };
        if index < len {
            StepState::At { index }
        } else {
            StepState::Completed
        }
    }
}

/// One in-progress flow for one conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub kind: FlowKind,
    pub id: SessionId,
    pub step: StepState,
    /// Answers to the steps already passed
    pub data: FlowData,
}

impl Session {
    pub fn new(kind: FlowKind, id: SessionId) -> Self {
        Self {
            kind,
            id,
            step: StepState::NotStarted,
            data: FlowData::new(),
        }
    }

    /// A session waiting on the first step
    #[cfg(test)]
    pub fn start(kind: FlowKind, id: SessionId) -> Self {
        Self {
            step: StepState::At { index: 0 },
            ..Self::new(kind, id)
        }
    }

    pub fn step_index(&self) -> Option<usize> {
        match self.step {
            StepState::At { index } => Some(index),
            _ => None,
        }
    }
}
