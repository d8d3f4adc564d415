//! Lanyard API type definitions
//!
//! These types mirror the Lanyard `/v1/users/{id}` response and are used for
//! deserialization. Only the fields the formatters need are modelled; the
//! rest of the payload is ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Response envelope returned by every Lanyard REST endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct LanyardResponse {
    /// Whether the lookup succeeded
    #[serde(default)]
    pub success: bool,

    /// Presence data (only on success)
    #[serde(default)]
    pub data: Option<Presence>,

    /// Error details (only on failure)
    #[serde(default)]
    pub error: Option<LanyardErrorBody>,
}

/// Error object attached to unsuccessful responses
#[derive(Debug, Clone, Deserialize)]
pub struct LanyardErrorBody {
    /// Machine-readable code, e.g. `user_not_monitored`
    #[serde(default)]
    pub code: Option<String>,

    /// Human-readable message
    #[serde(default)]
    pub message: Option<String>,
}

/// A Discord user's presence snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presence {
    /// Discord account details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_user: Option<DiscordUser>,

    /// Online status
    pub discord_status: DiscordStatus,

    #[serde(default)]
    pub active_on_discord_desktop: bool,

    #[serde(default)]
    pub active_on_discord_mobile: bool,

    #[serde(default)]
    pub active_on_discord_web: bool,

    /// Explicit Spotify flag; absent on some payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listening_to_spotify: Option<bool>,

    /// Current Spotify track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spotify: Option<Spotify>,

    /// Activities in the order Discord reports them
    #[serde(default)]
    pub activities: Vec<Activity>,

    /// User-defined key/value pairs, in upstream order
    #[serde(default)]
    pub kv: IndexMap<String, String>,
}

impl Presence {
    /// Spotify state, unless upstream explicitly says the user stopped listening
    pub fn active_spotify(&self) -> Option<&Spotify> {
        match self.listening_to_spotify {
            Some(false) => None,
            _ => self.spotify.as_ref(),
        }
    }

    /// Handle used in headings: `@name`, legacy `name#1234`, or the raw ID
    pub fn display_name(&self, fallback_id: &str) -> String {
        match &self.discord_user {
            Some(user) => user.handle().unwrap_or_else(|| fallback_id.to_string()),
            None => fallback_id.to_string(),
        }
    }

    /// Platforms the user is currently active on
    pub fn platforms(&self) -> Vec<&'static str> {
        let mut platforms = Vec::new();
        if self.active_on_discord_desktop {
            platforms.push("Desktop");
        }
        if self.active_on_discord_mobile {
            platforms.push("Mobile");
        }
        if self.active_on_discord_web {
            platforms.push("Web");
        }
        platforms
    }
}

/// Discord account details
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscordUser {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    /// `"0"` for accounts migrated to unique usernames
    #[serde(default)]
    pub discriminator: Option<String>,

    #[serde(default)]
    pub global_name: Option<String>,
}

impl DiscordUser {
    /// `@username` or `username#discriminator`
    pub fn handle(&self) -> Option<String> {
        let username = self.username.as_deref().filter(|name| !name.is_empty())?;
        match self.discriminator.as_deref() {
            Some(disc) if !disc.is_empty() && disc != "0" => Some(format!("{}#{}", username, disc)),
            _ => Some(format!("@{}", username)),
        }
    }
}

/// Discord online status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscordStatus {
    Online,
    Idle,
    Dnd,
    Offline,
}

impl DiscordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscordStatus::Online => "online",
            DiscordStatus::Idle => "idle",
            DiscordStatus::Dnd => "dnd",
            DiscordStatus::Offline => "offline",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            DiscordStatus::Online => "🟢",
            DiscordStatus::Idle => "🟡",
            DiscordStatus::Dnd => "🔴",
            DiscordStatus::Offline => "⚫",
        }
    }
}

/// A Discord activity (game, stream, custom status, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub kind: ActivityType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamps: Option<Timestamps>,
}

/// Discord activity type, encoded upstream as an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum ActivityType {
    #[default]
    Game,
    Streaming,
    Listening,
    Watching,
    Custom,
    Competing,
    /// A code Discord added after this was written
    Other(u8),
}

impl From<u8> for ActivityType {
    fn from(code: u8) -> Self {
        match code {
            0 => ActivityType::Game,
            1 => ActivityType::Streaming,
            2 => ActivityType::Listening,
            3 => ActivityType::Watching,
            4 => ActivityType::Custom,
            5 => ActivityType::Competing,
            other => ActivityType::Other(other),
        }
    }
}

impl From<ActivityType> for u8 {
    fn from(kind: ActivityType) -> Self {
        match kind {
            ActivityType::Game => 0,
            ActivityType::Streaming => 1,
            ActivityType::Listening => 2,
            ActivityType::Watching => 3,
            ActivityType::Custom => 4,
            ActivityType::Competing => 5,
            ActivityType::Other(code) => code,
        }
    }
}

impl ActivityType {
    /// Verb used in front of the activity name
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::Game => "Playing",
            ActivityType::Streaming => "Streaming",
            ActivityType::Listening => "Listening to",
            ActivityType::Watching => "Watching",
            ActivityType::Custom => "Custom Status",
            ActivityType::Competing => "Competing in",
            ActivityType::Other(_) => "Activity",
        }
    }
}

/// Start/end pair in epoch milliseconds
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Timestamps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

/// Spotify listening state
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Spotify {
    /// Null for local files
    #[serde(default)]
    pub track_id: Option<String>,

    #[serde(default)]
    pub song: Option<String>,

    #[serde(default)]
    pub artist: Option<String>,

    #[serde(default)]
    pub album: Option<String>,

    #[serde(default)]
    pub album_art_url: Option<String>,

    #[serde(default)]
    pub timestamps: Option<Timestamps>,
}
