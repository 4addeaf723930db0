//! In-memory collaborators for dispatcher and responder tests

use crate::responder::{
    ChatReply, CombinedLookup, FallbackResponder, Lookup, LookupError, LookupSource, Profile,
    ProfileStore, SourceKind,
};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ============================================================================
// Lookup
// ============================================================================

/// Lookup that records every query and answers `found: <query>`
#[derive(Default)]
pub struct RecordingLookup {
    queries: Mutex<Vec<String>>,
}

impl RecordingLookup {
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Lookup for RecordingLookup {
    async fn lookup(&self, query: &str, _profile: &Profile) -> String {
        self.queries.lock().unwrap().push(query.to_string());
        format!("found: {query}")
    }
}

/// Source that answers `<kind> says <query>`
pub struct EchoSource(pub SourceKind);

#[async_trait]
impl LookupSource for EchoSource {
    fn kind(&self) -> SourceKind {
        self.0
    }

    async fn fetch(&self, query: &str) -> Result<Option<String>, LookupError> {
        let name = match self.0 {
            SourceKind::Web => "web",
            SourceKind::Wikipedia => "wiki",
        };
        Ok(Some(format!("{name} says {query}")))
    }
}

/// Combined lookup over one echo source per kind
pub fn stub_lookup() -> Arc<CombinedLookup> {
    Arc::new(CombinedLookup::new(vec![
        Arc::new(EchoSource(SourceKind::Web)),
        Arc::new(EchoSource(SourceKind::Wikipedia)),
    ]))
}

// ============================================================================
// Fallback
// ============================================================================

/// Fallback that records messages and answers `fallback: <message>`
#[derive(Default)]
pub struct RecordingFallback {
    messages: Mutex<Vec<String>>,
}

impl RecordingFallback {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl FallbackResponder for RecordingFallback {
    async fn respond(&self, message: &str) -> ChatReply {
        self.messages.lock().unwrap().push(message.to_string());
        ChatReply::text(format!("fallback: {message}"))
    }
}

// ============================================================================
// Profile
// ============================================================================

/// Profile store in a fresh temp dir; keep the dir alive for the test
pub fn temp_profiles() -> (TempDir, Arc<ProfileStore>) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(ProfileStore::new(dir.path().join("user_profile.json")));
    (dir, store)
}
