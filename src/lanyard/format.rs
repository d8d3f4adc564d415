//! Text renderings of a presence record
//!
//! Each function is pure and total: every optional field may be missing and
//! the output simply says so.

use crate::config::lanyard::SPOTIFY_TRACK_URL;
use crate::lanyard::types::{Activity, ActivityType, Presence, Spotify};
use crate::lanyard::utils::{format_duration, format_timestamp};

/// Full presence overview
pub fn format_presence(user_id: &str, presence: &Presence) -> String {
    let mut text = format!(
        "✅ Discord Presence for {} ({})\n\n",
        presence.display_name(user_id),
        user_id
    );

    text.push_str(&format!(
        "Status: {} {}\n",
        presence.discord_status.emoji(),
        presence.discord_status.as_str().to_uppercase()
    ));

    let platforms = presence.platforms();
    if platforms.is_empty() {
        text.push_str("Platforms: none\n");
    } else {
        text.push_str(&format!("Platforms: {}\n", platforms.join(", ")));
    }

    match presence.active_spotify() {
        Some(spotify) => text.push_str(&format!(
            "Spotify: listening to {} by {}\n",
            or_unknown(&spotify.song),
            or_unknown(&spotify.artist)
        )),
        None => text.push_str("Spotify: not listening\n"),
    }

    if presence.kv.is_empty() {
        text.push_str("Custom data: not set\n");
    } else {
        let noun = if presence.kv.len() == 1 { "key" } else { "keys" };
        text.push_str(&format!(
            "Custom data: {} {} (use get_user_kv to view)\n",
            presence.kv.len(),
            noun
        ));
    }

    if presence.activities.is_empty() {
        text.push_str("\nActivities: none\n");
    } else {
        text.push_str("\n🎮 Activities:\n");
        for (i, activity) in presence.activities.iter().enumerate() {
            text.push_str(&format_activity(i + 1, activity));
        }
    }

    text.trim_end().to_string()
}

fn format_activity(position: usize, activity: &Activity) -> String {
    let name = if activity.name.is_empty() {
        "Unknown"
    } else {
        activity.name.as_str()
    };

    let mut text = match activity.kind {
        ActivityType::Custom => format!("{}. Custom Status", position),
        kind => format!("{}. {} {}", position, kind.label(), name),
    };
    text.push('\n');

    if let Some(details) = non_empty(&activity.details) {
        text.push_str(&format!("   Details: {}\n", details));
    }
    if let Some(state) = non_empty(&activity.state) {
        text.push_str(&format!("   State: {}\n", state));
    }
    if let Some(timestamps) = activity.timestamps {
        if let Some(start) = timestamps.start {
            text.push_str(&format!("   Started: {}\n", format_timestamp(start)));
        }
        if let Some(end) = timestamps.end {
            text.push_str(&format!("   Ends: {}\n", format_timestamp(end)));
        }
    }

    text
}

/// Spotify view; `now_ms` is the current time in epoch milliseconds
pub fn format_spotify(user_id: &str, presence: &Presence, now_ms: i64) -> String {
    let name = presence.display_name(user_id);

    let spotify = match presence.active_spotify() {
        Some(spotify) => spotify,
        None => return format!("🎵 {} is not currently listening to Spotify", name),
    };

    let mut text = format!("✅ Spotify Status for {}\n\n🎵 Spotify Activity:\n", name);
    text.push_str(&format!("  Song: {}\n", or_unknown(&spotify.song)));
    text.push_str(&format!("  Artist: {}\n", or_unknown(&spotify.artist)));
    text.push_str(&format!("  Album: {}\n", or_unknown(&spotify.album)));

    let timestamps = spotify.timestamps.unwrap_or_default();
    if let Some(start) = timestamps.start {
        text.push_str(&format!("  Started: {}\n", format_timestamp(start)));
    }
    if let Some(end) = timestamps.end {
        text.push_str(&format!("  Ends: {}\n", format_timestamp(end)));
    }
    if let Some(progress) = format_progress(spotify, now_ms) {
        text.push_str(&format!("  {}\n", progress));
    }

    if let Some(art) = non_empty(&spotify.album_art_url) {
        text.push_str(&format!("  Album Art: {}\n", art));
    }
    if let Some(track_id) = non_empty(&spotify.track_id) {
        text.push_str(&format!("  Track URL: {}{}\n", SPOTIFY_TRACK_URL, track_id));
    }

    text.trim_end().to_string()
}

fn format_progress(spotify: &Spotify, now_ms: i64) -> Option<String> {
    let timestamps = spotify.timestamps?;
    let start = timestamps.start?;

    match timestamps.end.and_then(|end| end.checked_sub(start)) {
        Some(total) if total > 0 => {
            let elapsed = now_ms.saturating_sub(start).clamp(0, total);
            Some(format!(
                "Progress: {} / {} ({} remaining)",
                format_duration(elapsed),
                format_duration(total),
                format_duration(total - elapsed)
            ))
        }
        _ => Some(format!("Elapsed: {}", format_duration(now_ms.saturating_sub(start)))),
    }
}

/// Custom KV data, one pair per line in upstream order
pub fn format_kv(user_id: &str, presence: &Presence) -> String {
    let name = presence.display_name(user_id);

    if presence.kv.is_empty() {
        return format!("📝 {} has no custom data set", name);
    }

    let mut text = format!("✅ KV Data for {}\n\n📝 Custom KV Data:\n", name);
    for (key, value) in &presence.kv {
        text.push_str(&format!("  {}: {}\n", key, value));
    }

    text.trim_end().to_string()
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

fn or_unknown(value: &Option<String>) -> &str {
    non_empty(value).unwrap_or("Unknown")
}
