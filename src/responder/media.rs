//! Song requests as embeddable video search URLs

use super::ChatReply;
use reqwest::Url;

const EMBED_BASE: &str = "https://www.youtube.com/embed";

/// Embed reply for a song title; blank titles ask again
pub fn play_song(song: &str) -> ChatReply {
    let song = song.trim();
    if song.is_empty() {
        return ChatReply::text("Please tell me the name of the song to play.");
    }

    match Url::parse_with_params(
        EMBED_BASE,
        &[("listType", "search"), ("list", song), ("autoplay", "1")],
    ) {
        Ok(url) => ChatReply::Video {
            message: format!("Playing '{song}' 🎵"),
            url: url.into(),
        },
        Err(e) => {
            tracing::error!(error = %e, "Failed to build embed URL");
            ChatReply::text(format!("Couldn't play '{song}' right now."))
        }
    }
}
