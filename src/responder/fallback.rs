//! Replies for messages no flow claims: small talk and utility commands

use super::lookup::{CombinedLookup, SourceKind};
use super::profile::{Profile, ProfileStore, Tone};
use super::ChatReply;
use async_trait::async_trait;
use chrono::Local;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Minimum similarity for a fuzzy small-talk match
const FUZZY_CUTOFF: f32 = 0.6;

const UNKNOWN_REPLY: &str = "Hmm 🤔 I’m still learning. Try a command like 'time', 'date', 'register property', 'verify land', 'deed search', 'play'.";

const SMALL_TALK: &[(&str, &[&str])] = &[
    ("hello", &["Hi there 👋🏽", "Hello! How’s your day going?", "Hey! 🙂", "Yo! What’s up?", "Greetings 🌿", "Hi hi 😁"]),
    ("hii", &["Whats Up 😃", "Hello! How’s your day going? 😎", "Hey! 🙂"]),
    ("i am", &["That’s Great😃", "Really 😃"]),
    ("how are you", &["I’m doing great, thanks for asking! 💫", "All good here 😄", "Feeling awesome today 🚀"]),
    ("what is your name", &["I’m Mini magna 🤎", "They call me Mini magna 🌿"]),
    ("who are you", &["I'm Zana your Property process assistant 🙂", "I’m Zana 🪴 Nice to meet you"]),
    ("who created you", &["🥳 Hamilton Mwangi 🎊"]),
    ("who is your creator", &["🥳 Hamilton Mwangi 🎊"]),
    ("what can you do", &["Tell time ⏰, date 📅, search videos on YouTube 🎵, help with property registration 🏡 and verification 📝"]),
    ("thank you", &["Anytime 🤗", "You’re most welcome 💯", "No worries! 😎", "Happy to help 🌸", "Glad I could assist 😄"]),
    ("good morning", &["Morning 🌞", "Rise and shine ✨", "Top of the morning to you ☕", "Good vibes only today 😁"]),
    ("good night", &["Good night 🌙", "Sweet dreams ✨", "Sleep well 😴", "Catch you tomorrow 🌌"]),
    ("bye", &["See you later 👋🏽", "Take care 🌿", "Goodbye for now ✨", "Catch you soon 🚀"]),
    ("lol", &["😂", "🤣 You got me", "That’s funny 😅", "Haha, true one!"]),
    ("bored", &["Want me to tell you something random? 🤔", "We could play 20 questions 🎲", "How about a fun fact? 📚"]),
    ("fun fact", &["Did you know? Honey never spoils 🍯", "Octopuses have three hearts 🐙", "Bananas are berries, but strawberries aren’t 🍌🍓"]),
    ("weather", &["I’m not a weather app, but I bet it’s sunny somewhere 🌞", "Rain or shine, I’m here 🌧🌞"]),
    ("joke", &[
        "Why don’t skeletons fight? They don’t have the guts 😂",
        "Parallel lines have so much in common… too bad they’ll never meet 😅",
        "Why did the computer go to the doctor? It caught a virus 🤖🤒",
    ]),
];

/// Stateless responder used when no flow claims a message
#[async_trait]
pub trait FallbackResponder: Send + Sync {
    async fn respond(&self, message: &str) -> ChatReply;
}

/// Canned small talk, clock/system utilities and quick lookups
pub struct SmallTalkResponder {
    profiles: Arc<ProfileStore>,
    lookup: Arc<CombinedLookup>,
}

impl SmallTalkResponder {
    pub fn new(profiles: Arc<ProfileStore>, lookup: Arc<CombinedLookup>) -> Self {
        Self { profiles, lookup }
    }

    /// Canned reply for an exact or close phrase match
    fn small_talk(message: &str) -> Option<&'static str> {
        let key = message.trim().to_lowercase();
        let replies = SMALL_TALK
            .iter()
            .find(|(phrase, _)| *phrase == key)
            .or_else(|| closest_phrase(&key))
            .map(|(_, replies)| *replies)?;
        replies.choose(&mut rand::thread_rng()).copied()
    }

    fn utility(message: &str, profile: &Profile) -> Option<String> {
        let lower = message.to_lowercase();
        if lower.contains("time") {
            Some(time_reply(profile))
        } else if lower.contains("date") {
            Some(date_reply(profile))
        } else if lower.contains("system info") {
            Some(system_info())
        } else {
            None
        }
    }
}

#[async_trait]
impl FallbackResponder for SmallTalkResponder {
    async fn respond(&self, message: &str) -> ChatReply {
        let profile = self.profiles.update_from(message).await;

        if let Some(reply) = Self::small_talk(message) {
            return ChatReply::text(reply);
        }
        if let Some(reply) = Self::utility(message, &profile) {
            return ChatReply::text(reply);
        }

        let lower = message.trim().to_lowercase();
        if let Some(query) = lower.strip_prefix("wiki") {
            let text = self
                .lookup
                .lookup_from(SourceKind::Wikipedia, query.trim(), &profile)
                .await;
            return ChatReply::text(text);
        }
        if let Some(query) = lower.strip_prefix("google") {
            let text = self
                .lookup
                .lookup_from(SourceKind::Web, query.trim(), &profile)
                .await;
            return ChatReply::text(text);
        }

        ChatReply::text(UNKNOWN_REPLY)
    }
}

/// Best phrase at or above the similarity cutoff
fn closest_phrase(key: &str) -> Option<&'static (&'static str, &'static [&'static str])> {
    SMALL_TALK
        .iter()
        .map(|entry| (entry, similar::TextDiff::from_chars(key, entry.0).ratio()))
        .filter(|(_, score)| *score >= FUZZY_CUTOFF)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(entry, _)| entry)
}

fn time_reply(profile: &Profile) -> String {
    let now = Local::now().format("%H:%M:%S");
    match profile.tone {
        Tone::Friendly => format!("⏰ It’s {now}, hope you’re doing great 😄"),
        Tone::Analytical => format!("System time: {now}"),
        Tone::Playful => format!("Tick-tock ⏰—it’s {now} 😏"),
    }
}

fn date_reply(profile: &Profile) -> String {
    let today = Local::now().format("%A, %d %B %Y");
    match (profile.tone, profile.likes_emojis) {
        (Tone::Playful, true) => format!("📅 Drum roll… it’s {today}! 🎉"),
        (Tone::Playful, false) => format!("It’s {today}!"),
        (Tone::Analytical, _) => format!("Date: {today}"),
        (Tone::Friendly, true) => format!("📅 Today is {today}"),
        (Tone::Friendly, false) => format!("Today is {today}"),
    }
}

fn system_info() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    format!(
        "System: {} {} | User: {user}",
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
