//! Per-request routing
//!
//! One inbound message goes through, in order: global cancel, the live flow
//! of highest priority, flows whose trigger phrases match, then the fallback
//! responder. Session bookkeeping happens under a single store lock; lookups
//! and other async work run after it is released.

#[cfg(test)]
pub mod testing;

use crate::engine::{FlowEngine, Transition};
use crate::flow::{is_cancel, Completion, FlowKind};
use crate::responder::{play_song, ChatReply, FallbackResponder, Lookup, ProfileStore};
use crate::session::{SessionId, SessionStore};
use std::sync::Arc;

pub const GLOBAL_CANCEL_REPLY: &str = "All clear 👍🏻";

/// Outcome of the synchronous routing step
#[derive(Debug)]
enum Routed {
    /// Reply is final
    Reply(ChatReply),
    /// A flow consumed the message
    Flow(FlowKind, Transition),
    /// No flow claimed the message
    Unclaimed,
}

pub struct Dispatcher {
    engine: FlowEngine,
    sessions: Arc<SessionStore>,
    lookup: Arc<dyn Lookup>,
    fallback: Arc<dyn FallbackResponder>,
    profiles: Arc<ProfileStore>,
}

impl Dispatcher {
    pub fn new(
        engine: FlowEngine,
        sessions: Arc<SessionStore>,
        lookup: Arc<dyn Lookup>,
        fallback: Arc<dyn FallbackResponder>,
        profiles: Arc<ProfileStore>,
    ) -> Self {
        Self {
            engine,
            sessions,
            lookup,
            fallback,
            profiles,
        }
    }

    /// Answer one message for one conversation
    pub async fn handle(&self, id: &SessionId, message: &str) -> ChatReply {
        match self.route(id, message) {
            Routed::Reply(reply) => reply,
            Routed::Flow(kind, transition) => self.render(kind, transition).await,
            Routed::Unclaimed => {
                tracing::debug!(session_id = %id, "No flow claimed message");
                self.fallback.respond(message).await
            }
        }
    }

    fn route(&self, id: &SessionId, message: &str) -> Routed {
        let mut table = self.sessions.lock();

        if is_cancel(message) {
            let cleared = table.clear_conversation(id);
            tracing::info!(session_id = %id, cleared, "Global cancel");
            return Routed::Reply(ChatReply::text(GLOBAL_CANCEL_REPLY));
        }

        if let Some(kind) = table.active_kind(id) {
            return match self.engine.advance(&mut table, kind, message, id) {
                Ok(transition) => Routed::Flow(kind, transition),
                Err(e) => {
                    tracing::warn!(session_id = %id, error = %e, "Advance without live session");
                    Routed::Reply(ChatReply::text(e.to_string()))
                }
            };
        }

        for definition in self.engine.catalog().iter() {
            if !definition.matches_trigger(message) {
                continue;
            }
            let kind = definition.kind();
            if let Some(transition) = self.engine.try_start(&mut table, kind, message, id) {
                return Routed::Flow(kind, transition);
            }
        }

        Routed::Unclaimed
    }

    async fn render(&self, kind: FlowKind, transition: Transition) -> ChatReply {
        match transition {
            Transition::Prompt(text)
            | Transition::Rejected(text)
            | Transition::Cancelled(text)
            | Transition::Completed(Completion::Message(text)) => ChatReply::text(text),
            Transition::Completed(Completion::Lookup { query }) => {
                tracing::debug!(flow = %kind, %query, "Forwarding query to lookup");
                let profile = self.profiles.load().await;
                ChatReply::text(self.lookup.lookup(&query, &profile).await)
            }
            Transition::Completed(Completion::PlaySong { song }) => play_song(&song),
        }
    }
}
