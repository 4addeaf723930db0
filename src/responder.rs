//! Stateless collaborators behind the dispatcher
//!
//! Everything here answers a message without touching flow state: the
//! combined web/encyclopedia lookup, small talk and utility commands, the tone
//! profile, and media embeds.

mod fallback;
mod lookup;
mod media;
mod profile;

pub use fallback::{FallbackResponder, SmallTalkResponder};
pub use lookup::{CombinedLookup, Lookup};
#[cfg(test)]
pub use lookup::{LookupError, LookupSource, SourceKind};
pub use media::play_song;
#[cfg(test)]
pub use profile::Profile;
pub use profile::ProfileStore;

use serde::Serialize;

/// Reply body returned to the chat client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatReply {
    Text { message: String },
    Video { message: String, url: String },
}

impl ChatReply {
    pub fn text(message: impl Into<String>) -> Self {
        ChatReply::Text {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ChatReply::Text { message } | ChatReply::Video { message, .. } => message,
        }
    }
}
