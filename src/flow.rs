//! Guided dialogue definitions
//!
//! A flow is a fixed, ordered list of steps plus a finalizer. Definitions are
//! built once at startup and shared read-only by every session.

mod catalog;
mod validate;

pub use catalog::FlowCatalog;
pub use validate::{Validator, Verdict};

use std::collections::BTreeMap;
use std::fmt;

/// Words that cancel whatever flow is active
pub const CANCEL_WORDS: [&str; 3] = ["cancel", "exit", "stop"];

/// Registered flow kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlowKind {
    Registration,
    Verification,
    DeedSearch,
    Search,
    /// Single-step song request
    Play,
}

impl FlowKind {
    /// Dispatch order, highest priority first
    pub const PRIORITY: [FlowKind; 5] = [
        FlowKind::Registration,
        FlowKind::Verification,
        FlowKind::DeedSearch,
        FlowKind::Search,
        FlowKind::Play,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FlowKind::Registration => "registration",
            FlowKind::Verification => "verification",
            FlowKind::DeedSearch => "deed_search",
            FlowKind::Search => "search",
            FlowKind::Play => "play",
        }
    }

    /// Position in `PRIORITY`
    pub(crate) fn index(self) -> usize {
        match self {
            FlowKind::Registration => 0,
            FlowKind::Verification => 1,
            FlowKind::DeedSearch => 2,
            FlowKind::Search => 3,
            FlowKind::Play => 4,
        }
    }
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated answers keyed by step key.
///
/// A `None` value records an optional step the user skipped.
pub type FlowData = BTreeMap<&'static str, Option<String>>;

/// Case-insensitive, whitespace-trimmed form used for every phrase comparison
pub fn normalize(message: &str) -> String {
    message.trim().to_lowercase()
}

pub fn is_cancel(message: &str) -> bool {
    let normalized = normalize(message);
    CANCEL_WORDS.contains(&normalized.as_str())
}

/// One step of a flow
#[derive(Debug, Clone)]
pub struct StepSpec {
    /// Key the validated value is stored under
    pub key: &'static str,
    pub prompt: &'static str,
    pub validator: Validator,
}

impl StepSpec {
    pub const fn new(key: &'static str, prompt: &'static str, validator: Validator) -> Self {
        Self {
            key,
            prompt,
            validator,
        }
    }
}

/// What a finished flow hands back to the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// Canned completion text
    Message(String),
    /// Forward the query to the lookup collaborator
    Lookup { query: String },
    /// Build a media embed for the song
    PlaySong { song: String },
}

pub type Finalizer = fn(&FlowData) -> Completion;

/// Static description of one flow
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    kind: FlowKind,
    triggers: &'static [&'static str],
    /// When false, `try_start` accepts any message
    gated: bool,
    /// Reply to the trigger when it differs from the first step's prompt
    intro: Option<&'static str>,
    steps: Vec<StepSpec>,
    cancel_message: &'static str,
    finalize: Finalizer,
}

impl FlowDefinition {
    pub fn new(
        kind: FlowKind,
        triggers: &'static [&'static str],
        steps: Vec<StepSpec>,
        cancel_message: &'static str,
        finalize: Finalizer,
    ) -> Self {
        Self {
            kind,
            triggers,
            gated: true,
            intro: None,
            steps,
            cancel_message,
            finalize,
        }
    }

    /// Start on any message; triggers are then only used for routing
    pub fn ungated(mut self) -> Self {
        self.gated = false;
        self
    }

    pub fn with_intro(mut self, intro: &'static str) -> Self {
        self.intro = Some(intro);
        self
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    #[cfg(test)]
    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        self.steps.get(index)
    }

    /// Whether the message is one of this flow's trigger phrases
    pub fn matches_trigger(&self, message: &str) -> bool {
        let normalized = normalize(message);
        self.triggers.iter().any(|t| *t == normalized)
    }

    /// Whether `try_start` may open a session for this message
    pub fn admits(&self, message: &str) -> bool {
        !self.gated || self.matches_trigger(message)
    }

    /// Reply sent when the flow opens
    pub fn opening(&self) -> &'static str {
        self.intro
            .or_else(|| self.steps.first().map(|s| s.prompt))
            .unwrap_or_default()
    }

    pub fn cancel_message(&self) -> &'static str {
        self.cancel_message
    }

    pub fn finalize(&self, data: &FlowData) -> Completion {
        (self.finalize)(data)
    }
}
