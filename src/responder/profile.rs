//! Tone and emoji preferences, persisted as a small JSON file

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;

#[derive(Error, Debug)]
pub enum ProfileError {
    #[error("Profile I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Profile is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Friendly,
    Analytical,
    Playful,
}

/// User preferences that shape reply wording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "default_depth")]
    pub depth: String,
    #[serde(default = "default_true")]
    pub likes_emojis: bool,
    #[serde(default)]
    pub topics: BTreeMap<String, Value>,
}

fn default_depth() -> String {
    "detailed".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            tone: Tone::default(),
            depth: default_depth(),
            likes_emojis: true,
            topics: BTreeMap::new(),
        }
    }
}

impl Profile {
    /// Pick up preference keywords from a message. Returns whether anything changed.
    pub fn apply_message(&mut self, message: &str) -> bool {
        let before = self.clone();
        let lower = message.to_lowercase();

        if lower.contains("analytical") {
            self.tone = Tone::Analytical;
        } else if lower.contains("friendly") {
            self.tone = Tone::Friendly;
        } else if lower.contains("playful") {
            self.tone = Tone::Playful;
        }

        if lower.contains("no emoji") {
            self.likes_emojis = false;
        } else if lower.contains("use emoji") {
            self.likes_emojis = true;
        }

        *self != before
    }
}

/// File-backed profile shared by every conversation
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles on the file
    write_lock: Mutex<()>,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current profile; a missing or unreadable file yields the default
    pub async fn load(&self) -> Profile {
        match self.read().await {
            Ok(Some(profile)) => profile,
            Ok(None) => Profile::default(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable profile");
                Profile::default()
            }
        }
    }

    pub async fn save(&self, profile: &Profile) -> Result<(), ProfileError> {
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Apply preference keywords from a message and persist the result
    pub async fn update_from(&self, message: &str) -> Profile {
        let _guard = self.write_lock.lock().await;
        let mut profile = self.load().await;
        if profile.apply_message(message) {
            tracing::info!(tone = ?profile.tone, likes_emojis = profile.likes_emojis, "Profile updated");
        }
        if let Err(e) = self.save(&profile).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to save profile");
        }
        profile
    }

    async fn read(&self) -> Result<Option<Profile>, ProfileError> {
        match fs::read_to_string(&self.path).await {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
